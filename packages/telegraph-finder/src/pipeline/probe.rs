//! Probe worker - one candidate in, one verdict out.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::filter::ContentFilter;
use crate::traits::fetcher::{FetchResponse, PageFetcher};
use crate::types::{candidate::CandidateUrl, verdict::ProbeVerdict};

/// Classify a response for `url`.
///
/// 404/410 is `NotFound`; anything else goes through the filter.
pub fn classify(url: &str, response: &FetchResponse, filter: &ContentFilter) -> ProbeVerdict {
    if response.is_absent() {
        return ProbeVerdict::NotFound;
    }

    if let Some(entry) = filter.matching(&response.body) {
        debug!(url = %url, entry = %entry, "page matched denylist");
        return ProbeVerdict::Filtered;
    }

    ProbeVerdict::Found(url.to_string())
}

/// Stateless probe worker. Cheap to clone into spawned tasks.
pub struct ProbeWorker<F> {
    fetcher: Arc<F>,
    filter: Arc<ContentFilter>,
    in_flight: Option<Arc<Semaphore>>,
}

impl<F> Clone for ProbeWorker<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            filter: Arc::clone(&self.filter),
            in_flight: self.in_flight.clone(),
        }
    }
}

impl<F: PageFetcher> ProbeWorker<F> {
    pub fn new(fetcher: Arc<F>, filter: Arc<ContentFilter>) -> Self {
        Self {
            fetcher,
            filter,
            in_flight: None,
        }
    }

    /// Cap simultaneously running fetches across every clone of this worker.
    pub fn with_max_in_flight(mut self, max: usize) -> Self {
        self.in_flight = Some(Arc::new(Semaphore::new(max.max(1))));
        self
    }

    /// Sleep for `delay`, then fetch the candidate once and classify it.
    ///
    /// Network failures are not retried; they come back as `NotFound`.
    pub async fn probe(&self, candidate: &CandidateUrl, delay: Duration) -> ProbeVerdict {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        // Permit is held only around the fetch; the stagger is not throttled.
        let _permit = match &self.in_flight {
            Some(semaphore) => Arc::clone(semaphore).acquire_owned().await.ok(),
            None => None,
        };

        self.fetch_and_classify(candidate.url()).await
    }

    /// Fetch `url` immediately and classify it.
    pub async fn probe_url(&self, url: &str) -> ProbeVerdict {
        self.fetch_and_classify(url).await
    }

    async fn fetch_and_classify(&self, url: &str) -> ProbeVerdict {
        match self.fetcher.get(url).await {
            Ok(response) => classify(url, &response, &self.filter),
            Err(e) => {
                debug!(url = %url, error = %e, "probe failed, counting as not found");
                ProbeVerdict::NotFound
            }
        }
    }
}
