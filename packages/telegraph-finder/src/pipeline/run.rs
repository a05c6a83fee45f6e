//! The Finder - main entry point for a probe run.
//!
//! One run is: validate the query, fan out over the candidate grid, wait for
//! every verdict, then deliver the surviving URLs in chunks followed by a
//! count. The fetcher handed to a run is owned by that run and dropped when
//! it ends.

use std::sync::Arc;
use tracing::info;

use crate::candidates::CandidateSpace;
use crate::error::Result;
use crate::fetchers::{FetcherExt, HttpFetcher};
use crate::filter::ContentFilter;
use crate::pipeline::{
    aggregate::ResultAggregator,
    probe::ProbeWorker,
    schedule::ProbeScheduler,
};
use crate::traits::{
    chat::{BatchDelivery, ChatTarget, ProgressReporter},
    fetcher::PageFetcher,
};
use crate::types::{
    config::FinderConfig,
    query::Query,
    verdict::{ProbeVerdict, RunReport},
};

/// Runs probe jobs against a fixed configuration.
///
/// # Example
///
/// ```rust,ignore
/// let finder = Finder::new(FinderConfig::default())?;
/// let target = ChatTarget::new(chat_id, progress_message_id);
///
/// let report = finder.run_http("spring-sale", target, &reporter, &delivery).await?;
/// println!("{} links", report.found());
/// ```
pub struct Finder {
    config: FinderConfig,
    filter: Arc<ContentFilter>,
}

impl Finder {
    /// Create a finder. Fails if the configuration does not validate.
    pub fn new(config: FinderConfig) -> Result<Self> {
        config.validate()?;
        let filter = Arc::new(ContentFilter::new(config.denylist.iter().cloned()));
        Ok(Self { config, filter })
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    pub fn filter(&self) -> &ContentFilter {
        &self.filter
    }

    /// Run one job with the given fetcher.
    ///
    /// An invalid query is rejected before any request, progress update or
    /// message. After that nothing is fatal: the returned report is always
    /// `Ok`, even if every probe and every delivery failed.
    pub async fn run<F, R, D>(
        &self,
        raw_query: &str,
        fetcher: F,
        target: ChatTarget,
        reporter: &R,
        delivery: &D,
    ) -> Result<RunReport>
    where
        F: PageFetcher + 'static,
        R: ProgressReporter + ?Sized,
        D: BatchDelivery + ?Sized,
    {
        let query = Query::parse(raw_query)?;
        Ok(self.execute(query, fetcher, target, reporter, delivery).await)
    }

    /// Run one job over a fresh HTTP session built from the configuration.
    pub async fn run_http<R, D>(
        &self,
        raw_query: &str,
        target: ChatTarget,
        reporter: &R,
        delivery: &D,
    ) -> Result<RunReport>
    where
        R: ProgressReporter + ?Sized,
        D: BatchDelivery + ?Sized,
    {
        let query = Query::parse(raw_query)?;
        let fetcher = HttpFetcher::new(self.config.request_timeout)?;
        Ok(self.execute(query, fetcher, target, reporter, delivery).await)
    }

    /// Probe a single URL, with no delay, through the same worker a run uses.
    pub async fn check_url<F: PageFetcher>(&self, url: &str, fetcher: F) -> ProbeVerdict {
        ProbeWorker::new(Arc::new(fetcher), Arc::clone(&self.filter))
            .probe_url(url)
            .await
    }

    async fn execute<F, R, D>(
        &self,
        query: Query,
        fetcher: F,
        target: ChatTarget,
        reporter: &R,
        delivery: &D,
    ) -> RunReport
    where
        F: PageFetcher + 'static,
        R: ProgressReporter + ?Sized,
        D: BatchDelivery + ?Sized,
    {
        let space = CandidateSpace::new(
            self.config.base_url.as_str(),
            query.clone(),
            self.config.grid.clone(),
        );

        info!(
            query = %query,
            conversation = %target.conversation,
            candidates = space.len(),
            "starting run"
        );

        let fetcher: Box<dyn PageFetcher> = match self.config.requests_per_second {
            Some(rps) => Box::new(fetcher.rate_limited(rps)),
            None => Box::new(fetcher),
        };

        let mut worker = ProbeWorker::new(Arc::new(fetcher), Arc::clone(&self.filter));
        if let Some(max) = self.config.max_in_flight {
            worker = worker.with_max_in_flight(max);
        }

        let verdicts = ProbeScheduler::new(worker, self.config.stagger)
            .run(&space, target, reporter)
            .await;

        let probed = verdicts.len();
        let filtered = verdicts
            .iter()
            .filter(|v| matches!(v, ProbeVerdict::Filtered))
            .count();
        let not_found = verdicts
            .iter()
            .filter(|v| matches!(v, ProbeVerdict::NotFound))
            .count();
        let urls = ResultAggregator::collect(verdicts);

        let outcome = ResultAggregator::new(self.config.chunk_size)
            .deliver(&urls, target.conversation, delivery)
            .await;

        info!(
            query = %query,
            probed = probed,
            found = urls.len(),
            filtered = filtered,
            not_found = not_found,
            chunks_failed = outcome.chunks_failed,
            summary_delivered = outcome.summary_delivered,
            "run complete"
        );

        RunReport {
            query,
            probed,
            filtered,
            not_found,
            urls,
            chunks_delivered: outcome.chunks_delivered,
            chunks_failed: outcome.chunks_failed,
            summary_delivered: outcome.summary_delivered,
        }
    }
}
