//! Async HTTP client wrapping reqwest.
//!
//! One GET per call, no retries. Redirects and timeouts are handled by the
//! underlying client.

use async_trait::async_trait;

use crate::config::ExtractorConfig;
use crate::types::{ExtractError, ExtractResult};

/// Response from an HTTP GET request.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    /// HTTP status code.
    pub status: u16,
    /// Content-Type header, if present.
    pub content_type: Option<String>,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl FetchedResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Something that can perform a GET.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn get(&self, url: &str) -> ExtractResult<FetchedResponse>;
}

/// HTTP client shared by the scanner and fetcher.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a client with the configured user-agent, timeout and
    /// redirect limit.
    pub fn new(config: &ExtractorConfig) -> ExtractResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|source| ExtractError::Fetch {
                url: String::new(),
                source,
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetch for HttpClient {
    async fn get(&self, url: &str) -> ExtractResult<FetchedResponse> {
        let fetch_err = |source| ExtractError::Fetch {
            url: url.to_string(),
            source,
        };

        let r = self.client.get(url).send().await.map_err(fetch_err)?;
        let status = r.status().as_u16();
        let content_type = r
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = r.bytes().await.map_err(fetch_err)?.to_vec();

        Ok(FetchedResponse {
            status,
            content_type,
            body,
        })
    }
}
