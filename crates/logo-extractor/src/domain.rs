//! Site string normalization.

use url::Url;

use crate::types::{ExtractError, ExtractResult};

/// Prepend `https://` unless the site already carries an http(s) scheme.
pub fn normalize(site: &str) -> String {
    if site.starts_with("http://") || site.starts_with("https://") {
        site.to_string()
    } else {
        format!("https://{site}")
    }
}

/// Parse the normalized form of `site` into a URL.
pub fn normalized_url(site: &str) -> ExtractResult<Url> {
    Url::parse(&normalize(site)).map_err(|e| ExtractError::InvalidSite {
        site: site.to_string(),
        reason: e.to_string(),
    })
}

/// Network location of the normalized site, used as the output file stem.
///
/// Taken verbatim from the text between the scheme and the first `/`, `?`
/// or `#`: case, ports and non-ASCII hosts are kept as written. Malformed
/// hosts are not rejected here; they fail when fetched.
pub fn domain_of(site: &str) -> String {
    let normalized = normalize(site);
    let rest = normalized
        .split_once("://")
        .map_or(normalized.as_str(), |(_, rest)| rest);
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    rest[..end].to_string()
}
