use crate::error::TransportError;
use std::future::Future;

/// Retrieves the raw bytes behind a URL.
///
/// Redirects, TLS, timeouts and retries are the implementation's business; callers only
/// distinguish success from a [`TransportError`].
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;
}
