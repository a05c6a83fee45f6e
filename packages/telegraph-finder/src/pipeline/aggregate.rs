//! Result aggregation and chunked delivery.

use tracing::{debug, warn};

use crate::traits::chat::{BatchDelivery, ConversationId};
use crate::types::config::DEFAULT_CHUNK_SIZE;
use crate::types::verdict::ProbeVerdict;

/// Closing message sent after the last chunk.
pub fn summary_text(found: usize) -> String {
    format!("found {found} links")
}

/// How a delivery went, chunk by chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub chunks_delivered: usize,
    pub chunks_failed: usize,
    pub summary_delivered: bool,
}

/// Turns verdicts into URL chunks and hands them to a [`BatchDelivery`].
#[derive(Debug, Clone, Copy)]
pub struct ResultAggregator {
    chunk_size: usize,
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl ResultAggregator {
    /// A zero chunk size is treated as one.
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Keep the surviving URLs, in the order the verdicts arrived.
    pub fn collect(verdicts: impl IntoIterator<Item = ProbeVerdict>) -> Vec<String> {
        verdicts
            .into_iter()
            .filter_map(ProbeVerdict::into_found_url)
            .collect()
    }

    /// Consecutive chunks of at most `chunk_size` URLs.
    pub fn chunks<'a>(&self, urls: &'a [String]) -> impl Iterator<Item = &'a [String]> {
        urls.chunks(self.chunk_size)
    }

    /// Message body for one chunk: URLs separated by newlines.
    pub fn render_chunk(chunk: &[String]) -> String {
        chunk.join("\n")
    }

    /// Send every chunk, then the summary.
    ///
    /// A rejected chunk is logged and skipped; the remaining chunks and the
    /// summary still go out. The summary always counts every URL.
    pub async fn deliver<D>(
        &self,
        urls: &[String],
        conversation: ConversationId,
        delivery: &D,
    ) -> DeliveryOutcome
    where
        D: BatchDelivery + ?Sized,
    {
        let mut outcome = DeliveryOutcome::default();

        for (n, chunk) in self.chunks(urls).enumerate() {
            match delivery.send(conversation, &Self::render_chunk(chunk)).await {
                Ok(()) => {
                    debug!(conversation = %conversation, chunk = n, size = chunk.len(), "chunk delivered");
                    outcome.chunks_delivered += 1;
                }
                Err(e) => {
                    warn!(conversation = %conversation, chunk = n, error = %e, "chunk delivery failed");
                    outcome.chunks_failed += 1;
                }
            }
        }

        match delivery.send(conversation, &summary_text(urls.len())).await {
            Ok(()) => outcome.summary_delivered = true,
            Err(e) => {
                warn!(conversation = %conversation, error = %e, "summary delivery failed");
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingChat;
    use proptest::prelude::*;

    fn urls(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("https://telegra.ph/q-01-01-{i}")).collect()
    }

    #[test]
    fn test_collect_keeps_found_only() {
        let verdicts = vec![
            ProbeVerdict::NotFound,
            ProbeVerdict::Found("https://telegra.ph/a-01-01".into()),
            ProbeVerdict::Filtered,
            ProbeVerdict::Found(String::new()),
            ProbeVerdict::Found("https://telegra.ph/a-01-02".into()),
        ];

        assert_eq!(
            ResultAggregator::collect(verdicts),
            vec!["https://telegra.ph/a-01-01", "https://telegra.ph/a-01-02"]
        );
    }

    #[test]
    fn test_chunk_boundaries() {
        let aggregator = ResultAggregator::default();

        let sizes: Vec<usize> = aggregator.chunks(&urls(50)).map(<[String]>::len).collect();
        assert_eq!(sizes, vec![50]);

        let sizes: Vec<usize> = aggregator.chunks(&urls(51)).map(<[String]>::len).collect();
        assert_eq!(sizes, vec![50, 1]);

        let sizes: Vec<usize> = aggregator.chunks(&urls(120)).map(<[String]>::len).collect();
        assert_eq!(sizes, vec![50, 50, 20]);

        assert_eq!(aggregator.chunks(&[]).count(), 0);
    }

    #[tokio::test]
    async fn test_deliver_sends_chunks_then_summary() {
        let chat = RecordingChat::new();
        let urls = urls(3);

        let outcome = ResultAggregator::new(2)
            .deliver(&urls, ConversationId(1), &chat)
            .await;

        assert_eq!(
            chat.messages(),
            vec![
                format!("{}\n{}", urls[0], urls[1]),
                urls[2].clone(),
                "found 3 links".to_string(),
            ]
        );
        assert_eq!(outcome.chunks_delivered, 2);
        assert_eq!(outcome.chunks_failed, 0);
        assert!(outcome.summary_delivered);
    }

    #[tokio::test]
    async fn test_empty_result_sends_only_summary() {
        let chat = RecordingChat::new();

        let outcome = ResultAggregator::default()
            .deliver(&[], ConversationId(1), &chat)
            .await;

        assert_eq!(chat.messages(), vec!["found 0 links"]);
        assert_eq!(outcome.chunks_delivered, 0);
    }

    #[tokio::test]
    async fn test_failed_chunk_does_not_stop_delivery() {
        let chat = RecordingChat::new().fail_send(0);
        let urls = urls(3);

        let outcome = ResultAggregator::new(2)
            .deliver(&urls, ConversationId(1), &chat)
            .await;

        assert_eq!(chat.messages(), vec![urls[2].clone(), "found 3 links".to_string()]);
        assert_eq!(outcome.chunks_delivered, 1);
        assert_eq!(outcome.chunks_failed, 1);
    }

    #[tokio::test]
    async fn test_failed_summary_is_absorbed() {
        let chat = RecordingChat::new().fail_send(1);

        let outcome = ResultAggregator::default()
            .deliver(&urls(1), ConversationId(1), &chat)
            .await;

        assert_eq!(chat.messages().len(), 1);
        assert!(!outcome.summary_delivered);
    }

    proptest! {
        #[test]
        fn chunks_cover_urls_in_order(n in 0usize..400, size in 1usize..80) {
            let urls = urls(n);
            let aggregator = ResultAggregator::new(size);

            let chunks: Vec<&[String]> = aggregator.chunks(&urls).collect();
            prop_assert!(chunks.iter().all(|c| !c.is_empty() && c.len() <= size));
            prop_assert_eq!(chunks.len(), n.div_ceil(size));

            let rejoined: Vec<String> = chunks.concat();
            prop_assert_eq!(rejoined, urls);
        }
    }
}
