//! Immutable settings shared by every pipeline component.

use std::time::Duration;

/// Desktop Chrome user-agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                                      AppleWebKit/537.36 (KHTML, like Gecko) \
                                      Chrome/91.0.4472.124 Safari/537.36";

/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default input column holding site identifiers.
pub const DEFAULT_COLUMN: &str = "domain";

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "logo";

/// Settings for scanning, validation, download and scheduling.
///
/// Built once and handed to each component at construction; nothing
/// mutates it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorConfig {
    pub user_agent: String,
    pub request_timeout: Duration,
    pub max_redirects: usize,
    /// Smallest accepted width or height, in pixels.
    pub min_size: u32,
    /// Largest accepted width or height, in pixels.
    pub max_size: u32,
    /// Largest accepted ratio of longer to shorter side.
    pub max_aspect_ratio: f64,
    /// Square sizes accepted outright once within bounds.
    pub favicon_sizes: Vec<u32>,
    /// Sites processed concurrently.
    pub max_workers: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            max_redirects: 10,
            min_size: 16,
            max_size: 500,
            max_aspect_ratio: 4.0,
            favicon_sizes: vec![16, 32],
            max_workers: 5,
        }
    }
}
