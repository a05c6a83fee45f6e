//! Page fetcher trait - the network seam of the probe worker.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::ProbeResult;

/// Status code and body of one plain GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 200 with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// 404 with an empty body.
    pub fn not_found() -> Self {
        Self::new(404, "")
    }

    /// True when the server explicitly says the resource does not exist.
    pub fn is_absent(&self) -> bool {
        matches!(self.status, 404 | 410)
    }
}

/// Fetches one URL. No auth, no custom headers, no size cap.
///
/// Implementations:
/// - `HttpFetcher` - reqwest transport
/// - `RateLimitedFetcher` - wrapper adding a global request rate
/// - `MockFetcher` - canned responses for tests
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Perform exactly one GET of `url`.
    async fn get(&self, url: &str) -> ProbeResult<FetchResponse>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Box<T> {
    async fn get(&self, url: &str) -> ProbeResult<FetchResponse> {
        (**self).get(url).await
    }
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn get(&self, url: &str) -> ProbeResult<FetchResponse> {
        (**self).get(url).await
    }
}
