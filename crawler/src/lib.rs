use bookworm_core::{Fetch, TransportError};
use reqwest::{header, Client, Url};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_USER_AGENT: &str = "bookworm-crawler/0.1 (+https://github.com/bookworm/bookworm)";

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_redirects: usize,
    /// Bodies larger than this are rejected instead of buffered.
    pub max_body_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            max_redirects: 5,
            max_body_bytes: 32 * 1024 * 1024,
        }
    }
}

/// [`Fetch`] over HTTP(S) with reqwest.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, max_body_bytes: config.max_body_bytes })
    }

    fn too_large(&self, url: &str) -> TransportError {
        TransportError::TooLarge { url: url.to_string(), limit: self.max_body_bytes }
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let parsed = Url::parse(url)
            .map_err(|e| TransportError::InvalidUrl { url: url.to_string(), message: e.to_string() })?;
        if !parsed.scheme().starts_with("http") {
            return Err(TransportError::InvalidUrl {
                url: url.to_string(),
                message: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let mut resp = self.client.get(parsed).send().await.map_err(|e| request_error(url, &e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status { url: url.to_string(), status: status.as_u16() });
        }
        if resp.content_length().is_some_and(|len| len > self.max_body_bytes as u64) {
            return Err(self.too_large(url));
        }

        let mut body = Vec::new();
        while let Some(chunk) = resp.chunk().await.map_err(|e| request_error(url, &e))? {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(self.too_large(url));
            }
            body.extend_from_slice(&chunk);
        }
        let content_type = resp.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()).unwrap_or("");
        debug!(url, status = status.as_u16(), bytes = body.len(), content_type, "fetched");
        Ok(body)
    }
}

/// reqwest's own message hides the interesting part in the source chain.
fn request_error(url: &str, err: &reqwest::Error) -> TransportError {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    TransportError::Request { url: url.to_string(), message }
}
