//! Chat collaborator traits - where progress and results go.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DeliveryResult;

/// Conversation that issued the command and receives the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub i64);

/// Message that is edited in place to show progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub i64);

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a run reports to: the conversation plus its progress message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTarget {
    pub conversation: ConversationId,
    pub progress_message: MessageId,
}

impl ChatTarget {
    pub fn new(conversation: i64, progress_message: i64) -> Self {
        Self {
            conversation: ConversationId(conversation),
            progress_message: MessageId(progress_message),
        }
    }
}

/// Receives progress text that overwrites a single message in place.
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    async fn report(
        &self,
        conversation: ConversationId,
        message: MessageId,
        text: &str,
    ) -> DeliveryResult<()>;
}

/// Receives result chunks and the closing summary.
#[async_trait]
pub trait BatchDelivery: Send + Sync {
    async fn send(&self, conversation: ConversationId, text: &str) -> DeliveryResult<()>;
}
