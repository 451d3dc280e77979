//! Per-site pipeline: scan the page, then try candidates until one sticks.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ExtractorConfig;
use crate::domain;
use crate::fetcher::LogoFetcher;
use crate::http::{HttpClient, HttpFetch};
use crate::scanner::Scanner;
use crate::types::{ExtractResult, SiteOutcome};
use crate::validator::LogoValidator;

/// Processes one site end to end. Implementations report problems through
/// the returned outcome and logs; they never fail.
#[async_trait]
pub trait ProcessSite: Send + Sync + 'static {
    async fn process(&self, site: &str, output_dir: &Path) -> SiteOutcome;
}

/// Scanner and fetcher wired to one shared HTTP client.
pub struct LogoPipeline {
    scanner: Scanner,
    fetcher: LogoFetcher,
}

impl LogoPipeline {
    /// Build a pipeline backed by a real HTTP client.
    pub fn new(config: &ExtractorConfig) -> ExtractResult<Self> {
        let http: Arc<dyn HttpFetch> = Arc::new(HttpClient::new(config)?);
        Ok(Self::with_http(http, config))
    }

    /// Build a pipeline around any [`HttpFetch`] implementation.
    pub fn with_http(http: Arc<dyn HttpFetch>, config: &ExtractorConfig) -> Self {
        Self {
            scanner: Scanner::new(Arc::clone(&http)),
            fetcher: LogoFetcher::new(http, LogoValidator::new(config)),
        }
    }
}

#[async_trait]
impl ProcessSite for LogoPipeline {
    async fn process(&self, site: &str, output_dir: &Path) -> SiteOutcome {
        let domain = domain::domain_of(site);
        tracing::info!("Processing {domain}...");

        let candidates = self.scanner.scan(site).await;
        if candidates.is_empty() {
            tracing::warn!("No potential logos found for {domain}");
            return SiteOutcome::NoCandidates;
        }
        tracing::debug!("{} candidates for {domain}", candidates.len());

        for (attempted, candidate) in candidates.iter().enumerate() {
            if let Some(path) = self.fetcher.download(candidate, &domain, output_dir).await {
                tracing::info!(
                    "Logo downloaded for {domain}: {} (candidate {} of {})",
                    path.display(),
                    attempted + 1,
                    candidates.len()
                );
                return SiteOutcome::Downloaded(path);
            }
        }

        tracing::warn!("Failed to download any valid logos for {domain}");
        SiteOutcome::Exhausted {
            attempted: candidates.len(),
        }
    }
}
