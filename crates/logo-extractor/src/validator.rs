//! Dimension checks that decide whether an image looks like a logo.

use std::io::Cursor;

use image::ImageReader;

use crate::config::ExtractorConfig;
use crate::types::{ExtractResult, RejectReason, ValidationResult};

/// Judges downloaded images by size and aspect ratio.
#[derive(Debug, Clone)]
pub struct LogoValidator {
    min_size: u32,
    max_size: u32,
    max_aspect_ratio: f64,
    favicon_sizes: Vec<u32>,
}

impl LogoValidator {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            min_size: config.min_size,
            max_size: config.max_size,
            max_aspect_ratio: config.max_aspect_ratio,
            favicon_sizes: config.favicon_sizes.clone(),
        }
    }

    /// Shorthand for `validate(bytes).accepted`.
    pub fn is_likely_logo(&self, bytes: &[u8]) -> bool {
        self.validate(bytes).accepted
    }

    /// Validate raw image bytes. Undecodable input is rejected.
    pub fn validate(&self, bytes: &[u8]) -> ValidationResult {
        match image_dimensions(bytes) {
            Ok((width, height)) => self.check_dimensions(width, height),
            Err(e) => {
                tracing::debug!("Image decode failed: {e}");
                ValidationResult {
                    accepted: false,
                    width: 0,
                    height: 0,
                    reason: Some(RejectReason::Undecodable),
                }
            }
        }
    }

    /// Apply the bound, favicon and aspect-ratio rules, in that order.
    pub fn check_dimensions(&self, width: u32, height: u32) -> ValidationResult {
        let verdict = |reason: Option<RejectReason>| ValidationResult {
            accepted: reason.is_none(),
            width,
            height,
            reason,
        };

        if width < self.min_size || height < self.min_size {
            return verdict(Some(RejectReason::TooSmall));
        }
        if width > self.max_size || height > self.max_size {
            return verdict(Some(RejectReason::TooLarge));
        }
        if width == height && self.favicon_sizes.contains(&width) {
            return verdict(None);
        }

        let ratio = f64::from(width.max(height)) / f64::from(width.min(height));
        if ratio > self.max_aspect_ratio {
            return verdict(Some(RejectReason::AspectRatio));
        }

        verdict(None)
    }
}

/// Read width and height from the image header.
fn image_dimensions(bytes: &[u8]) -> ExtractResult<(u32, u32)> {
    let dims = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()?;
    Ok(dims)
}
