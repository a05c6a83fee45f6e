//! Concurrent probe scheduler.
//!
//! Fans one probe task out per candidate, grouped month → day → index:
//!
//! - every month group is launched right away, all run concurrently
//! - each month spawns one task per day and waits for all of them
//! - each day spawns one task per index, index `i` delayed `(i - 1) * stagger`,
//!   and waits for all of them
//!
//! Verdicts fan in over an unbounded channel. The receiver is drained only
//! after every month group has joined, so the caller always sees exactly
//! one verdict per candidate.
//!
//! Progress goes out when a month is *launched*, not when it finishes:
//! "in progress: N/12" is a launch counter.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::candidates::CandidateSpace;
use crate::pipeline::probe::ProbeWorker;
use crate::traits::{
    chat::{ChatTarget, ProgressReporter},
    fetcher::PageFetcher,
};
use crate::types::verdict::ProbeVerdict;

/// Progress text sent once every month has been launched.
pub const SCANNING_TEXT: &str = "scanning links and preparing them…";

/// Progress text for the launch of month group `position` (1-based) of `total`.
pub fn progress_text(position: usize, total: usize) -> String {
    format!("in progress: {position}/{total}")
}

/// Start offset for the probe of `index` within its day group:
/// `(index - 1) * stagger`, so index 1 goes out immediately.
pub fn stagger_delay(stagger: Duration, index: u32) -> Duration {
    stagger * index.saturating_sub(1)
}

type VerdictSender = mpsc::UnboundedSender<ProbeVerdict>;

/// Walks a candidate space and probes every candidate exactly once.
pub struct ProbeScheduler<F> {
    worker: ProbeWorker<F>,
    stagger: Duration,
}

impl<F: PageFetcher + 'static> ProbeScheduler<F> {
    pub fn new(worker: ProbeWorker<F>, stagger: Duration) -> Self {
        Self { worker, stagger }
    }

    /// Probe the whole space and return the verdicts in completion order.
    ///
    /// Returns only after every spawned probe has produced a verdict.
    /// Progress failures are logged and ignored.
    pub async fn run<R>(
        &self,
        space: &CandidateSpace,
        target: ChatTarget,
        reporter: &R,
    ) -> Vec<ProbeVerdict>
    where
        R: ProgressReporter + ?Sized,
    {
        let space = Arc::new(space.clone());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let total = space.grid().months.len();
        let mut months = JoinSet::new();

        for (position, &month) in space.grid().months.iter().enumerate() {
            report_progress(reporter, target, &progress_text(position + 1, total)).await;

            months.spawn(probe_month(
                self.worker.clone(),
                Arc::clone(&space),
                month,
                self.stagger,
                tx.clone(),
            ));
            info!(query = %space.query(), month = month, "month group launched");
        }

        report_progress(reporter, target, SCANNING_TEXT).await;

        // Only the probe tasks hold senders from here on.
        drop(tx);

        while let Some(joined) = months.join_next().await {
            if let Err(e) = joined {
                error!(query = %space.query(), error = %e, "month group aborted");
            }
        }

        let mut verdicts = Vec::with_capacity(space.len());
        while let Some(verdict) = rx.recv().await {
            verdicts.push(verdict);
        }

        info!(
            query = %space.query(),
            verdicts = verdicts.len(),
            candidates = space.len(),
            "all month groups complete"
        );

        verdicts
    }
}

async fn report_progress<R>(reporter: &R, target: ChatTarget, text: &str)
where
    R: ProgressReporter + ?Sized,
{
    if let Err(e) = reporter
        .report(target.conversation, target.progress_message, text)
        .await
    {
        warn!(
            conversation = %target.conversation,
            message = %target.progress_message,
            error = %e,
            "progress update failed"
        );
    }
}

async fn probe_month<F: PageFetcher + 'static>(
    worker: ProbeWorker<F>,
    space: Arc<CandidateSpace>,
    month: u32,
    stagger: Duration,
    tx: VerdictSender,
) {
    let mut days = JoinSet::new();
    for day in space.days() {
        days.spawn(probe_day(
            worker.clone(),
            Arc::clone(&space),
            month,
            day,
            stagger,
            tx.clone(),
        ));
    }

    while let Some(joined) = days.join_next().await {
        if let Err(e) = joined {
            error!(month = month, error = %e, "day group aborted");
        }
    }

    debug!(month = month, "month group complete");
}

async fn probe_day<F: PageFetcher + 'static>(
    worker: ProbeWorker<F>,
    space: Arc<CandidateSpace>,
    month: u32,
    day: u32,
    stagger: Duration,
    tx: VerdictSender,
) {
    let mut probes = JoinSet::new();
    for candidate in space.day(month, day) {
        let delay = stagger_delay(stagger, candidate.slot().index);
        let worker = worker.clone();
        let tx = tx.clone();

        probes.spawn(async move {
            let verdict = worker.probe(&candidate, delay).await;
            // The receiver outlives every probe task.
            let _ = tx.send(verdict);
        });
    }

    while let Some(joined) = probes.join_next().await {
        if let Err(e) = joined {
            // A panicked probe still owes the run a verdict.
            warn!(month = month, day = day, error = %e, "probe task failed");
            let _ = tx.send(ProbeVerdict::NotFound);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ContentFilter;
    use crate::testing::{MockFetcher, RecordingChat};
    use crate::types::{config::GridConfig, query::Query};

    fn space(grid: GridConfig) -> CandidateSpace {
        CandidateSpace::new("https://telegra.ph", Query::parse("test").unwrap(), grid)
    }

    fn scheduler(mock: MockFetcher, stagger: Duration) -> ProbeScheduler<MockFetcher> {
        let worker = ProbeWorker::new(Arc::new(mock), Arc::new(ContentFilter::default()));
        ProbeScheduler::new(worker, stagger)
    }

    #[tokio::test]
    async fn test_every_candidate_gets_one_verdict() {
        let mock = MockFetcher::new();
        let chat = RecordingChat::new();
        let space = space(GridConfig::default());

        let verdicts = scheduler(mock.clone(), Duration::ZERO)
            .run(&space, ChatTarget::new(1, 2), &chat)
            .await;

        assert_eq!(verdicts.len(), 12 * 30 * 50);
        assert_eq!(mock.calls().len(), 12 * 30 * 50);
        assert!(verdicts.iter().all(|v| *v == ProbeVerdict::NotFound));
    }

    #[tokio::test]
    async fn test_progress_counts_launches() {
        let chat = RecordingChat::new();
        let space = space(GridConfig::reduced(12, 1, 1));

        scheduler(MockFetcher::new(), Duration::ZERO)
            .run(&space, ChatTarget::new(1, 2), &chat)
            .await;

        let mut expected: Vec<String> = (1..=12).map(|m| format!("in progress: {m}/12")).collect();
        expected.push(SCANNING_TEXT.to_string());
        assert_eq!(chat.progress(), expected);
    }

    #[tokio::test]
    async fn test_progress_failure_does_not_stop_run() {
        let chat = RecordingChat::new().fail_progress();
        let space = space(GridConfig::reduced(2, 2, 2));

        let verdicts = scheduler(MockFetcher::new(), Duration::ZERO)
            .run(&space, ChatTarget::new(1, 2), &chat)
            .await;

        assert_eq!(verdicts.len(), 8);
        assert!(chat.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_day_group_is_staggered() {
        let mock = MockFetcher::new();
        let chat = RecordingChat::new();
        let space = space(GridConfig::reduced(1, 1, 3));

        let start = tokio::time::Instant::now();
        scheduler(mock.clone(), Duration::from_millis(100))
            .run(&space, ChatTarget::new(1, 2), &chat)
            .await;

        assert!(start.elapsed() >= Duration::from_millis(200));
        assert_eq!(
            mock.calls(),
            vec![
                "https://telegra.ph/test-01-01".to_string(),
                "https://telegra.ph/test-01-01-2".to_string(),
                "https://telegra.ph/test-01-01-3".to_string(),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_in_flight_serializes_fetches() {
        let mock = MockFetcher::new().with_latency(Duration::from_millis(100));
        let worker = ProbeWorker::new(Arc::new(mock), Arc::new(ContentFilter::default()))
            .with_max_in_flight(1);
        let space = space(GridConfig::reduced(1, 1, 3));

        let start = tokio::time::Instant::now();
        let verdicts = ProbeScheduler::new(worker, Duration::ZERO)
            .run(&space, ChatTarget::new(1, 2), &RecordingChat::new())
            .await;

        assert_eq!(verdicts.len(), 3);
        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    #[test]
    fn test_stagger_delay() {
        let stagger = Duration::from_millis(100);
        assert_eq!(stagger_delay(stagger, 1), Duration::ZERO);
        assert_eq!(stagger_delay(stagger, 2), Duration::from_millis(100));
        assert_eq!(stagger_delay(stagger, 50), Duration::from_millis(4900));
        assert_eq!(stagger_delay(Duration::ZERO, 50), Duration::ZERO);
    }
}
