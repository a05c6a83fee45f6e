//! Integration tests for a complete finder run.
//!
//! These tests drive `Finder::run` end to end with a mock fetcher and a
//! recording chat:
//! 1. Validate the query
//! 2. Fan out over the grid with launch-timed progress
//! 3. Wait for every verdict
//! 4. Deliver chunks and the closing count

use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use telegraph_finder::{
    error::DeliveryResult,
    testing::{ChatEvent, MockFetcher, RecordingChat},
    ChatTarget, ConversationId, Finder, FinderConfig, FinderError, GridConfig, MessageId,
    ProgressReporter, SCANNING_TEXT,
};

fn finder(grid: GridConfig) -> Finder {
    Finder::new(
        FinderConfig::default()
            .with_grid(grid)
            .with_stagger(Duration::ZERO),
    )
    .unwrap()
}

#[tokio::test]
async fn test_single_day_run() {
    let mock = MockFetcher::new()
        .with_page("https://telegra.ph/test-01-01", "<article>my note</article>")
        .with_page("https://telegra.ph/test-01-01-3", "download from mdisk");
    let chat = RecordingChat::new();

    let report = finder(GridConfig::reduced(1, 1, 3))
        .run("test", mock.clone(), ChatTarget::new(10, 20), &chat, &chat)
        .await
        .unwrap();

    assert_eq!(report.urls, vec!["https://telegra.ph/test-01-01"]);
    assert_eq!(
        chat.messages(),
        vec!["https://telegra.ph/test-01-01", "found 1 links"]
    );
    assert_eq!(
        chat.progress(),
        vec!["in progress: 1/1".to_string(), SCANNING_TEXT.to_string()]
    );

    // progress first, then every delivery
    let events = chat.events();
    assert!(matches!(events[0], ChatEvent::Progress { message: MessageId(20), .. }));
    assert!(matches!(events[1], ChatEvent::Progress { .. }));
    assert!(matches!(
        events[2],
        ChatEvent::Message { conversation: ConversationId(10), .. }
    ));

    let mut calls = mock.calls();
    calls.sort();
    assert_eq!(
        calls,
        vec![
            "https://telegra.ph/test-01-01",
            "https://telegra.ph/test-01-01-2",
            "https://telegra.ph/test-01-01-3",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_results_follow_completion_order() {
    // index 1 goes out first but answers last
    let mock = MockFetcher::new()
        .with_page("https://telegra.ph/test-01-01", "first slot")
        .with_page("https://telegra.ph/test-01-01-2", "second slot")
        .with_page("https://telegra.ph/test-01-01-3", "third slot")
        .with_url_latency("https://telegra.ph/test-01-01", Duration::from_millis(500));
    let chat = RecordingChat::new();
    let finder = Finder::new(
        FinderConfig::default()
            .with_grid(GridConfig::reduced(1, 1, 3))
            .with_stagger(Duration::from_millis(100)),
    )
    .unwrap();

    let report = finder
        .run("test", mock, ChatTarget::new(1, 2), &chat, &chat)
        .await
        .unwrap();

    let expected = vec![
        "https://telegra.ph/test-01-01-2".to_string(),
        "https://telegra.ph/test-01-01-3".to_string(),
        "https://telegra.ph/test-01-01".to_string(),
    ];
    assert_eq!(report.urls, expected);
    assert_eq!(chat.messages(), vec![expected.join("\n"), "found 3 links".to_string()]);
}

#[tokio::test]
async fn test_all_probes_fail() {
    let chat = RecordingChat::new();

    let report = finder(GridConfig::reduced(2, 3, 4))
        .run("test", MockFetcher::unreachable(), ChatTarget::new(1, 2), &chat, &chat)
        .await
        .unwrap();

    assert_eq!(report.probed, 24);
    assert_eq!(report.not_found, 24);
    assert_eq!(chat.messages(), vec!["found 0 links"]);
}

#[tokio::test]
async fn test_full_grid_collects_every_verdict() {
    let mock = MockFetcher::new()
        .with_page("https://telegra.ph/test-12-30-50", "last slot")
        .with_page("https://telegra.ph/test-06-15", "middle");
    let chat = RecordingChat::new();

    let report = finder(GridConfig::default())
        .run("test", mock.clone(), ChatTarget::new(1, 2), &chat, &chat)
        .await
        .unwrap();

    assert_eq!(report.probed, 18_000);
    assert_eq!(mock.calls().len(), 18_000);
    assert_eq!(report.found(), 2);
    assert_eq!(chat.progress().len(), 13);
    assert_eq!(chat.progress()[11], "in progress: 12/12");
    assert_eq!(chat.messages().last().map(String::as_str), Some("found 2 links"));
}

/// Reporter that records how many fetches had finished at each update.
struct SnapshotReporter {
    mock: MockFetcher,
    seen: Arc<RwLock<Vec<(String, usize)>>>,
}

#[async_trait]
impl ProgressReporter for SnapshotReporter {
    async fn report(
        &self,
        _conversation: ConversationId,
        _message: MessageId,
        text: &str,
    ) -> DeliveryResult<()> {
        self.seen
            .write()
            .unwrap()
            .push((text.to_string(), self.mock.completed()));
        Ok(())
    }
}

#[tokio::test]
async fn test_progress_is_sent_at_launch() {
    let mock = MockFetcher::new().with_latency(Duration::from_millis(20));
    let reporter = SnapshotReporter {
        mock: mock.clone(),
        seen: Arc::default(),
    };
    let chat = RecordingChat::new();
    let finder = Finder::new(
        FinderConfig::default()
            .with_grid(GridConfig::reduced(12, 2, 3))
            .with_stagger(Duration::from_millis(100)),
    )
    .unwrap();

    let report = finder
        .run("test", mock.clone(), ChatTarget::new(1, 2), &reporter, &chat)
        .await
        .unwrap();

    let seen = reporter.seen.read().unwrap().clone();
    assert_eq!(seen.len(), 13);
    assert_eq!(seen.last().unwrap().0, SCANNING_TEXT);
    // every update went out before any probe had finished
    assert!(seen.iter().all(|(_, completed)| *completed == 0));

    // and the run still waited for all of them
    assert_eq!(report.probed, 72);
    assert_eq!(mock.completed(), 72);
}

#[tokio::test]
async fn test_invalid_query_has_no_side_effects() {
    let mock = MockFetcher::new();
    let chat = RecordingChat::new();
    let finder = finder(GridConfig::reduced(1, 1, 3));

    for raw in ["", "two words", "slash/path", "ёлка"] {
        let result = finder
            .run(raw, mock.clone(), ChatTarget::new(1, 2), &chat, &chat)
            .await;
        assert!(matches!(result, Err(FinderError::InvalidQuery { .. })), "{raw:?}");
    }

    assert!(mock.calls().is_empty());
    assert!(chat.events().is_empty());
}

#[tokio::test]
async fn test_failed_chunk_still_reports_count() {
    let mut mock = MockFetcher::new();
    for index in 1..=3 {
        let url = if index == 1 {
            "https://telegra.ph/test-01-01".to_string()
        } else {
            format!("https://telegra.ph/test-01-01-{index}")
        };
        mock = mock.with_page(url, "page");
    }
    let chat = RecordingChat::new().fail_send(0);
    let finder = Finder::new(
        FinderConfig::default()
            .with_grid(GridConfig::reduced(1, 1, 3))
            .with_stagger(Duration::ZERO)
            .with_chunk_size(2),
    )
    .unwrap();

    let report = finder
        .run("test", mock, ChatTarget::new(1, 2), &chat, &chat)
        .await
        .unwrap();

    assert_eq!(report.found(), 3);
    assert_eq!(report.chunks_failed, 1);
    assert_eq!(report.chunks_delivered, 1);

    let messages = chat.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1], "found 3 links");
}

#[tokio::test]
async fn test_large_result_is_chunked_by_fifty() {
    let grid = GridConfig::reduced(1, 3, 40);
    let mut mock = MockFetcher::new();
    for day in 1..=3 {
        for index in 1..=40 {
            let slug = if index == 1 {
                format!("test-01-{day:02}")
            } else {
                format!("test-01-{day:02}-{index}")
            };
            mock = mock.with_page(format!("https://telegra.ph/{slug}"), "page");
        }
    }
    let chat = RecordingChat::new();

    let report = finder(grid)
        .run("test", mock, ChatTarget::new(1, 2), &chat, &chat)
        .await
        .unwrap();

    assert_eq!(report.found(), 120);

    let messages = chat.messages();
    let line_counts: Vec<usize> = messages[..messages.len() - 1]
        .iter()
        .map(|m| m.lines().count())
        .collect();
    assert_eq!(line_counts, vec![50, 50, 20]);
    assert_eq!(messages.last().unwrap(), "found 120 links");
}
