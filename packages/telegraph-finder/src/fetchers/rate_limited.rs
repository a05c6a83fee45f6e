//! Global request-rate cap for page fetchers, backed by `governor`.

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

use crate::error::ProbeResult;
use crate::traits::fetcher::{FetchResponse, PageFetcher};

type DefaultRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// A fetcher wrapper that enforces a global request rate.
///
/// Every probe of a run waits for a permit before its GET, on top of the
/// per-index stagger.
pub struct RateLimitedFetcher<F: PageFetcher> {
    inner: F,
    limiter: Arc<DefaultRateLimiter>,
}

impl<F: PageFetcher> RateLimitedFetcher<F> {
    /// Allow `requests_per_second` GETs, no burst.
    pub fn new(fetcher: F, requests_per_second: NonZeroU32) -> Self {
        Self::with_quota(fetcher, Quota::per_second(requests_per_second))
    }

    /// Create with a custom quota.
    pub fn with_quota(fetcher: F, quota: Quota) -> Self {
        Self {
            inner: fetcher,
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Create with burst support.
    pub fn with_burst(fetcher: F, requests_per_second: NonZeroU32, burst: NonZeroU32) -> Self {
        Self::with_quota(fetcher, Quota::per_second(requests_per_second).allow_burst(burst))
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }
}

#[async_trait]
impl<F: PageFetcher> PageFetcher for RateLimitedFetcher<F> {
    async fn get(&self, url: &str) -> ProbeResult<FetchResponse> {
        self.limiter.until_ready().await;
        self.inner.get(url).await
    }
}

/// Adds `.rate_limited(..)` to every fetcher.
pub trait FetcherExt: PageFetcher + Sized {
    /// Wrap this fetcher with rate limiting.
    fn rate_limited(self, requests_per_second: NonZeroU32) -> RateLimitedFetcher<Self> {
        RateLimitedFetcher::new(self, requests_per_second)
    }

    /// Wrap with rate limiting and burst support.
    fn rate_limited_with_burst(
        self,
        requests_per_second: NonZeroU32,
        burst: NonZeroU32,
    ) -> RateLimitedFetcher<Self> {
        RateLimitedFetcher::with_burst(self, requests_per_second, burst)
    }
}

impl<F: PageFetcher + Sized> FetcherExt for F {}
