//! Find logo candidates in raw HTML.
//!
//! Three independent passes over the parsed document, each producing
//! candidates in document order:
//!
//! 1. `<img>` elements whose `src`, `alt`, class list or `id` mention a logo.
//! 2. `<link>` elements whose `rel` names an icon.
//! 3. Inline `<svg>` elements whose class list or `id` mention a logo.
//!
//! The passes are concatenated in that order. Parsing uses `scraper`, which
//! recovers from malformed markup instead of failing.

use std::sync::Arc;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::domain;
use crate::http::HttpFetch;
use crate::types::{ExtractError, ExtractResult, LogoCandidate};

/// Substrings that mark an `<img>` as a logo.
const IMG_TERMS: &[&str] = &["logo", "brand", "header-image"];

/// Substrings of `rel` that mark a `<link>` as an icon.
const ICON_TERMS: &[&str] = &["icon", "shortcut icon", "apple-touch-icon"];

/// Substrings that mark an inline `<svg>` as a logo.
const SVG_TERMS: &[&str] = &["logo", "brand"];

/// Fetches a site's landing page and extracts logo candidates from it.
pub struct Scanner {
    http: Arc<dyn HttpFetch>,
}

impl Scanner {
    pub fn new(http: Arc<dyn HttpFetch>) -> Self {
        Self { http }
    }

    /// Scan a site. Fetch failures are logged and produce no candidates.
    pub async fn scan(&self, site: &str) -> Vec<LogoCandidate> {
        match self.try_scan(site).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {e}", domain::normalize(site));
                Vec::new()
            }
        }
    }

    async fn try_scan(&self, site: &str) -> ExtractResult<Vec<LogoCandidate>> {
        let url = domain::normalize(site);
        let resp = self.http.get(&url).await?;
        if !resp.is_ok() {
            return Err(ExtractError::Status {
                url,
                status: resp.status,
            });
        }

        // References resolve against the requested URL, not the post-redirect one.
        let page_url = domain::normalized_url(site)?;
        Ok(scan_html(&resp.text(), &page_url))
    }
}

/// Extract logo candidates from an HTML document.
pub fn scan_html(html: &str, page_url: &Url) -> Vec<LogoCandidate> {
    let document = Html::parse_document(html);

    let mut candidates = Vec::new();
    candidates.extend(scan_images(&document, page_url));
    candidates.extend(scan_icon_links(&document, page_url));
    candidates.extend(scan_inline_svgs(&document));
    candidates
}

fn scan_images(document: &Html, page_url: &Url) -> Vec<LogoCandidate> {
    let Ok(sel) = Selector::parse("img") else {
        return Vec::new();
    };

    document
        .select(&sel)
        .filter_map(|img| {
            let src = img.value().attr("src").unwrap_or("");
            let haystacks = [
                src.to_lowercase(),
                attr_lower(&img, "alt"),
                class_list(&img),
                attr_lower(&img, "id"),
            ];
            let matched = haystacks
                .iter()
                .any(|attr| IMG_TERMS.iter().any(|term| attr.contains(term)));

            if matched {
                resolve(page_url, src)
            } else {
                None
            }
        })
        .collect()
}

fn scan_icon_links(document: &Html, page_url: &Url) -> Vec<LogoCandidate> {
    let Ok(sel) = Selector::parse("link") else {
        return Vec::new();
    };

    document
        .select(&sel)
        .filter_map(|link| {
            // `rel` is a token list; collapse whitespace so "shortcut  icon"
            // still matches.
            let rel = link
                .value()
                .attr("rel")
                .unwrap_or("")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase();
            if !ICON_TERMS.iter().any(|term| rel.contains(term)) {
                return None;
            }

            match link.value().attr("href") {
                Some(href) if !href.is_empty() => resolve(page_url, href),
                _ => None,
            }
        })
        .collect()
}

fn scan_inline_svgs(document: &Html) -> Vec<LogoCandidate> {
    let Ok(sel) = Selector::parse("svg") else {
        return Vec::new();
    };

    document
        .select(&sel)
        .filter(|svg| {
            let class = class_list(svg);
            let id = attr_lower(svg, "id");
            SVG_TERMS
                .iter()
                .any(|term| class.contains(term) || id.contains(term))
        })
        .map(|svg| LogoCandidate::inline_svg(&svg.html()))
        .collect()
}

fn attr_lower(el: &ElementRef<'_>, name: &str) -> String {
    el.value().attr(name).unwrap_or("").to_lowercase()
}

fn class_list(el: &ElementRef<'_>) -> String {
    el.value()
        .classes()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Resolve a possibly relative reference against the page URL.
fn resolve(page_url: &Url, reference: &str) -> Option<LogoCandidate> {
    match page_url.join(reference.trim()) {
        Ok(url) => Some(LogoCandidate::Url(url)),
        Err(e) => {
            tracing::debug!("Skipping unresolvable reference {reference:?}: {e}");
            None
        }
    }
}
