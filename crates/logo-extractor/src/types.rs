//! Core data types for logo candidates, outcomes and errors.

use std::fmt;
use std::path::PathBuf;

use base64::Engine;

/// Prefix of the data URL used to describe inline SVG candidates.
pub const SVG_DATA_URL_PREFIX: &str = "data:image/svg+xml;base64,";

/// A possible logo location discovered on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoCandidate {
    /// Absolute URL of an image to download.
    Url(url::Url),
    /// Inline `<svg>` markup lifted from the page.
    InlineSvg(SvgPayload),
}

impl LogoCandidate {
    /// Build an inline SVG candidate from serialized markup.
    pub fn inline_svg(markup: &str) -> Self {
        Self::InlineSvg(SvgPayload::encode(markup))
    }

    pub fn is_inline_svg(&self) -> bool {
        matches!(self, Self::InlineSvg(_))
    }
}

impl fmt::Display for LogoCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::InlineSvg(payload) => write!(f, "{}", payload.data_url()),
        }
    }
}

/// Base64-encoded SVG markup.
///
/// The markup is encoded when the candidate is created and decoded again
/// when it is written, so the saved file holds the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgPayload {
    encoded: String,
}

impl SvgPayload {
    pub fn encode(markup: &str) -> Self {
        Self {
            encoded: base64::engine::general_purpose::STANDARD.encode(markup.as_bytes()),
        }
    }

    /// Render as a `data:image/svg+xml;base64,...` URL.
    pub fn data_url(&self) -> String {
        format!("{SVG_DATA_URL_PREFIX}{}", self.encoded)
    }

    /// Decode back to the raw markup bytes.
    pub fn decode(&self) -> ExtractResult<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.encoded)
            .map_err(|e| ExtractError::InlineSvg(format!("invalid base64 payload: {e}")))
    }
}

/// Outcome of validating a fetched image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationResult {
    pub accepted: bool,
    pub width: u32,
    pub height: u32,
    pub reason: Option<RejectReason>,
}

/// Why the validator turned an image down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Undecodable,
    TooSmall,
    TooLarge,
    AspectRatio,
}

/// File extension chosen for a downloaded logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoExtension {
    Png,
    Jpg,
    Svg,
    Ico,
}

impl LogoExtension {
    /// Extension including the leading dot.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => ".png",
            Self::Jpg => ".jpg",
            Self::Svg => ".svg",
            Self::Ico => ".ico",
        }
    }

    /// Match a `Content-Type` header by substring, in png/jpg/svg/ico order.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let ct = content_type.to_lowercase();
        if ct.contains("png") {
            Some(Self::Png)
        } else if ct.contains("jpg") || ct.contains("jpeg") {
            Some(Self::Jpg)
        } else if ct.contains("svg") {
            Some(Self::Svg)
        } else if ct.contains("ico") {
            Some(Self::Ico)
        } else {
            None
        }
    }

    /// Match the suffix of a URL path.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.to_lowercase();
        if path.ends_with(".png") {
            Some(Self::Png)
        } else if path.ends_with(".jpg") || path.ends_with(".jpeg") {
            Some(Self::Jpg)
        } else if path.ends_with(".svg") {
            Some(Self::Svg)
        } else if path.ends_with(".ico") {
            Some(Self::Ico)
        } else {
            None
        }
    }
}

impl fmt::Display for LogoExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logo that has been written to disk.
#[derive(Debug, Clone)]
pub struct DownloadedLogo {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub extension: LogoExtension,
}

/// What happened to a single site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteOutcome {
    Downloaded(PathBuf),
    NoCandidates,
    Exhausted { attempted: usize },
}

/// Tally of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub downloaded: usize,
    pub no_candidates: usize,
    pub exhausted: usize,
    pub aborted: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &SiteOutcome) {
        match outcome {
            SiteOutcome::Downloaded(_) => self.downloaded += 1,
            SiteOutcome::NoCandidates => self.no_candidates += 1,
            SiteOutcome::Exhausted { .. } => self.exhausted += 1,
        }
    }

    pub fn failed(&self) -> usize {
        self.no_candidates + self.exhausted + self.aborted
    }
}

/// Errors that can occur while extracting logos.
#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    #[error("Request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid site '{site}': {reason}")]
    InvalidSite { site: String, reason: String },

    #[error("Invalid inline SVG: {0}")]
    InlineSvg(String),

    #[error("Failed to load sites from {path}: {reason}")]
    SourceLoad { path: String, reason: String },

    #[error("Column '{column}' not found in {path}. Available columns: {available:?}")]
    MissingColumn {
        path: String,
        column: String,
        available: Vec<String>,
    },
}

/// Convenience result type.
pub type ExtractResult<T> = Result<T, ExtractError>;
