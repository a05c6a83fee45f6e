//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the finder library
//! without making real network or chat calls.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{DeliveryError, DeliveryResult, ProbeError, ProbeResult};
use crate::traits::{
    chat::{BatchDelivery, ConversationId, MessageId, ProgressReporter},
    fetcher::{FetchResponse, PageFetcher},
};

/// Canned answer for one URL.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Server answered with this status and body
    Page(FetchResponse),

    /// Connection-level failure
    NetworkError,
}

/// A mock fetcher for testing.
///
/// Unknown URLs answer 404 unless a different default is configured.
/// Clones share state, so a test can keep a handle for assertions after
/// moving the fetcher into a run.
#[derive(Clone)]
pub struct MockFetcher {
    /// Predefined responses by URL
    responses: Arc<RwLock<HashMap<String, MockResponse>>>,

    /// Answer for URLs without a predefined response
    fallback: Arc<RwLock<MockResponse>>,

    /// Simulated network latency per request
    latency: Duration,

    /// Latency overrides by URL
    latencies: Arc<RwLock<HashMap<String, Duration>>>,

    /// Every URL requested, in call order
    calls: Arc<RwLock<Vec<String>>>,

    /// Requests that have produced a response (or error)
    completed: Arc<AtomicUsize>,
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self {
            responses: Arc::default(),
            fallback: Arc::new(RwLock::new(MockResponse::Page(FetchResponse::not_found()))),
            latency: Duration::ZERO,
            latencies: Arc::default(),
            calls: Arc::default(),
            completed: Arc::default(),
        }
    }
}

impl MockFetcher {
    /// Create a new mock where every URL is absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock where every request fails at the network layer.
    pub fn unreachable() -> Self {
        Self::new().with_fallback(MockResponse::NetworkError)
    }

    /// Answer 200 with `body` for `url`.
    pub fn with_page(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.with_response(url, MockResponse::Page(FetchResponse::ok(body)))
    }

    /// Answer `status` with `body` for `url`.
    pub fn with_status(self, url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        self.with_response(url, MockResponse::Page(FetchResponse::new(status, body)))
    }

    /// Fail `url` at the network layer.
    pub fn with_network_error(self, url: impl Into<String>) -> Self {
        self.with_response(url, MockResponse::NetworkError)
    }

    /// Set an arbitrary response for `url`.
    pub fn with_response(self, url: impl Into<String>, response: MockResponse) -> Self {
        self.responses.write().unwrap().insert(url.into(), response);
        self
    }

    /// Set the answer for URLs without a predefined response.
    pub fn with_fallback(self, response: MockResponse) -> Self {
        *self.fallback.write().unwrap() = response;
        self
    }

    /// Delay every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Delay only the response for `url` by `latency`.
    pub fn with_url_latency(self, url: impl Into<String>, latency: Duration) -> Self {
        self.latencies.write().unwrap().insert(url.into(), latency);
        self
    }

    /// Get all URLs requested so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Number of requests that have finished.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn get(&self, url: &str) -> ProbeResult<FetchResponse> {
        self.calls.write().unwrap().push(url.to_string());

        let latency = self
            .latencies
            .read()
            .unwrap()
            .get(url)
            .copied()
            .unwrap_or(self.latency);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let response = self
            .responses
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| self.fallback.read().unwrap().clone());

        self.completed.fetch_add(1, Ordering::SeqCst);

        match response {
            MockResponse::Page(page) => Ok(page),
            MockResponse::NetworkError => Err(ProbeError::Http(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                format!("mock network failure for {url}"),
            )))),
        }
    }
}

/// Record of a call made to the recording chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    Progress {
        conversation: ConversationId,
        message: MessageId,
        text: String,
    },
    Message {
        conversation: ConversationId,
        text: String,
    },
}

/// A chat surface that records progress edits and sent messages in one log.
///
/// Implements both [`ProgressReporter`] and [`BatchDelivery`], so tests can
/// check the relative order of progress and delivery.
#[derive(Clone, Default)]
pub struct RecordingChat {
    events: Arc<RwLock<Vec<ChatEvent>>>,

    /// Zero-based `send` call numbers that fail
    failing_sends: Arc<RwLock<HashSet<usize>>>,

    /// Whether every progress edit fails
    failing_progress: bool,

    send_count: Arc<AtomicUsize>,
}

impl RecordingChat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the `n`th `send` call (zero-based). The attempt is not recorded.
    pub fn fail_send(self, n: usize) -> Self {
        self.failing_sends.write().unwrap().insert(n);
        self
    }

    /// Reject every progress edit.
    pub fn fail_progress(mut self) -> Self {
        self.failing_progress = true;
        self
    }

    /// All recorded events in call order.
    pub fn events(&self) -> Vec<ChatEvent> {
        self.events.read().unwrap().clone()
    }

    /// Progress texts in call order.
    pub fn progress(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ChatEvent::Progress { text, .. } => Some(text),
                ChatEvent::Message { .. } => None,
            })
            .collect()
    }

    /// Delivered message texts in call order.
    pub fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ChatEvent::Message { text, .. } => Some(text),
                ChatEvent::Progress { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl ProgressReporter for RecordingChat {
    async fn report(
        &self,
        conversation: ConversationId,
        message: MessageId,
        text: &str,
    ) -> DeliveryResult<()> {
        if self.failing_progress {
            return Err(DeliveryError::Rejected {
                reason: "progress message gone".to_string(),
            });
        }
        self.events.write().unwrap().push(ChatEvent::Progress {
            conversation,
            message,
            text: text.to_string(),
        });
        Ok(())
    }
}

#[async_trait]
impl BatchDelivery for RecordingChat {
    async fn send(&self, conversation: ConversationId, text: &str) -> DeliveryResult<()> {
        let n = self.send_count.fetch_add(1, Ordering::SeqCst);
        if self.failing_sends.read().unwrap().contains(&n) {
            return Err(DeliveryError::Rejected {
                reason: format!("send #{n} rejected"),
            });
        }
        self.events.write().unwrap().push(ChatEvent::Message {
            conversation,
            text: text.to_string(),
        });
        Ok(())
    }
}
