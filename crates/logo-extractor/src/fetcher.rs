//! Download, validate and persist a single logo candidate.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::http::HttpFetch;
use crate::types::{
    DownloadedLogo, ExtractError, ExtractResult, LogoCandidate, LogoExtension, SvgPayload,
};
use crate::validator::LogoValidator;

/// Output file name for a domain's logo.
pub fn logo_file_name(domain: &str, extension: LogoExtension) -> String {
    format!("{domain} - logo{}", extension.as_str())
}

/// Pick an extension from the Content-Type, then the URL path, then `.png`.
pub fn infer_extension(content_type: Option<&str>, url: &url::Url) -> LogoExtension {
    content_type
        .and_then(LogoExtension::from_content_type)
        .or_else(|| LogoExtension::from_path(url.path()))
        .unwrap_or(LogoExtension::Png)
}

/// Downloads candidates and writes the first acceptable one to disk.
pub struct LogoFetcher {
    http: Arc<dyn HttpFetch>,
    validator: LogoValidator,
}

impl LogoFetcher {
    pub fn new(http: Arc<dyn HttpFetch>, validator: LogoValidator) -> Self {
        Self { http, validator }
    }

    /// Try one candidate. Returns the written path, or `None` on any failure.
    pub async fn download(
        &self,
        candidate: &LogoCandidate,
        domain: &str,
        output_dir: &Path,
    ) -> Option<PathBuf> {
        match self.try_download(candidate, domain, output_dir).await {
            Ok(Some(logo)) => Some(logo.path),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Error downloading logo from {candidate}: {e}");
                None
            }
        }
    }

    /// Like [`download`](Self::download) but surfaces errors and the saved
    /// bytes. `Ok(None)` means the image was fetched but rejected.
    pub async fn try_download(
        &self,
        candidate: &LogoCandidate,
        domain: &str,
        output_dir: &Path,
    ) -> ExtractResult<Option<DownloadedLogo>> {
        match candidate {
            LogoCandidate::InlineSvg(payload) => {
                write_inline_svg(payload, domain, output_dir).await.map(Some)
            }
            LogoCandidate::Url(url) => {
                let resp = self.http.get(url.as_str()).await?;
                if !resp.is_ok() {
                    return Err(ExtractError::Status {
                        url: url.to_string(),
                        status: resp.status,
                    });
                }

                let verdict = self.validator.validate(&resp.body);
                if !verdict.accepted {
                    tracing::debug!(
                        "Rejected {url} ({}x{}): {:?}",
                        verdict.width,
                        verdict.height,
                        verdict.reason
                    );
                    return Ok(None);
                }

                let extension = infer_extension(resp.content_type.as_deref(), url);
                let path = output_dir.join(logo_file_name(domain, extension));
                tokio::fs::write(&path, &resp.body).await?;

                Ok(Some(DownloadedLogo {
                    path,
                    bytes: resp.body,
                    extension,
                }))
            }
        }
    }
}

/// Inline SVGs are written as-is, without validation.
async fn write_inline_svg(
    payload: &SvgPayload,
    domain: &str,
    output_dir: &Path,
) -> ExtractResult<DownloadedLogo> {
    let bytes = payload.decode()?;
    let path = output_dir.join(logo_file_name(domain, LogoExtension::Svg));
    tokio::fs::write(&path, &bytes).await?;

    Ok(DownloadedLogo {
        path,
        bytes,
        extension: LogoExtension::Svg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractorConfig;
    use crate::http::FetchedResponse;
    use async_trait::async_trait;

    /// Serves one canned response for every URL.
    struct StaticFetch {
        status: u16,
        content_type: Option<&'static str>,
        body: Vec<u8>,
    }

    #[async_trait]
    impl HttpFetch for StaticFetch {
        async fn get(&self, _url: &str) -> ExtractResult<FetchedResponse> {
            Ok(FetchedResponse {
                status: self.status,
                content_type: self.content_type.map(str::to_string),
                body: self.body.clone(),
            })
        }
    }

    fn make_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::DynamicImage::new_rgb8(width, height);
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        img.write_with_encoder(encoder).unwrap();
        buf
    }

    fn fetcher(status: u16, content_type: Option<&'static str>, body: Vec<u8>) -> LogoFetcher {
        let http = Arc::new(StaticFetch {
            status,
            content_type,
            body,
        });
        LogoFetcher::new(http, LogoValidator::new(&ExtractorConfig::default()))
    }

    fn candidate(url: &str) -> LogoCandidate {
        LogoCandidate::Url(url::Url::parse(url).unwrap())
    }

    #[test]
    fn test_infer_extension_priority() {
        let url = url::Url::parse("https://example.com/logo.svg").unwrap();
        assert_eq!(infer_extension(Some("image/png"), &url), LogoExtension::Png);
        assert_eq!(
            infer_extension(Some("application/octet-stream"), &url),
            LogoExtension::Svg
        );
        assert_eq!(infer_extension(None, &url), LogoExtension::Svg);

        let bare = url::Url::parse("https://example.com/logo?v=2").unwrap();
        assert_eq!(infer_extension(None, &bare), LogoExtension::Png);
    }

    #[test]
    fn test_logo_file_name() {
        assert_eq!(
            logo_file_name("example.com", LogoExtension::Ico),
            "example.com - logo.ico"
        );
    }

    #[tokio::test]
    async fn test_download_writes_valid_png() {
        let dir = tempfile::tempdir().unwrap();
        let png = make_png(64, 64);
        let f = fetcher(200, Some("image/png"), png.clone());

        let path = f
            .download(&candidate("https://example.com/logo"), "example.com", dir.path())
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("example.com - logo.png"));
        assert_eq!(std::fs::read(&path).unwrap(), png);
    }

    #[tokio::test]
    async fn test_download_uses_url_suffix_for_unknown_content_type() {
        let dir = tempfile::tempdir().unwrap();
        let f = fetcher(200, Some("application/octet-stream"), make_png(32, 32));

        let path = f
            .download(&candidate("https://example.com/f.ICO"), "example.com", dir.path())
            .await
            .unwrap();
        assert!(path.ends_with("example.com - logo.ico"));
    }

    #[tokio::test]
    async fn test_rejected_image_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let f = fetcher(200, Some("image/png"), make_png(600, 600));

        let result = f
            .download(&candidate("https://example.com/big.png"), "example.com", dir.path())
            .await;
        assert!(result.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_non_200_is_no_result() {
        let dir = tempfile::tempdir().unwrap();
        let f = fetcher(404, Some("image/png"), make_png(64, 64));

        let err = f
            .try_download(&candidate("https://example.com/logo.png"), "example.com", dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Status { status: 404, .. }));
        assert!(f
            .download(&candidate("https://example.com/logo.png"), "example.com", dir.path())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_inline_svg_written_decoded_without_fetch() {
        let dir = tempfile::tempdir().unwrap();
        // Any request would return a 500; inline SVGs must not hit the network.
        let f = fetcher(500, None, Vec::new());
        let markup = r#"<svg class="logo"><rect width="1" height="1"></rect></svg>"#;

        let path = f
            .download(&LogoCandidate::inline_svg(markup), "example.com", dir.path())
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("example.com - logo.svg"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), markup);
    }

    #[tokio::test]
    async fn test_missing_output_dir_is_no_result() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let f = fetcher(200, Some("image/png"), make_png(64, 64));

        let result = f
            .download(&candidate("https://example.com/logo.png"), "example.com", &missing)
            .await;
        assert!(result.is_none());
    }
}
