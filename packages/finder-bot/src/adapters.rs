//! Chat collaborators for the finder.
//!
//! - `TelegramChat` edits the progress message and sends result chunks
//! - `ConsoleReporter` / `ConsoleDelivery` do the same on a terminal

use async_trait::async_trait;
use colored::Colorize;
use std::io::Write;
use telegram::{TelegramError, TelegramService};
use telegraph_finder::{
    error::{DeliveryError, DeliveryResult},
    BatchDelivery, ConversationId, MessageId, ProgressReporter, SCANNING_TEXT,
};
use tracing::debug;

/// Telegram-backed progress and delivery.
#[derive(Debug, Clone)]
pub struct TelegramChat {
    service: TelegramService,
}

impl TelegramChat {
    pub fn new(service: TelegramService) -> Self {
        Self { service }
    }
}

pub(crate) fn delivery_error(error: TelegramError) -> DeliveryError {
    match error {
        TelegramError::Http(e) => DeliveryError::Transport(Box::new(e)),
        other => DeliveryError::Rejected {
            reason: other.to_string(),
        },
    }
}

#[async_trait]
impl ProgressReporter for TelegramChat {
    async fn report(
        &self,
        conversation: ConversationId,
        message: MessageId,
        text: &str,
    ) -> DeliveryResult<()> {
        match self
            .service
            .edit_message_text(conversation.0, message.0, text)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_modified() => {
                debug!(conversation = %conversation, "progress text unchanged");
                Ok(())
            }
            Err(e) => Err(delivery_error(e)),
        }
    }
}

#[async_trait]
impl BatchDelivery for TelegramChat {
    async fn send(&self, conversation: ConversationId, text: &str) -> DeliveryResult<()> {
        self.service
            .send_message(conversation.0, text)
            .await
            .map(|_| ())
            .map_err(delivery_error)
    }
}

/// Progress on stderr, overwriting one line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

#[async_trait]
impl ProgressReporter for ConsoleReporter {
    async fn report(
        &self,
        _conversation: ConversationId,
        _message: MessageId,
        text: &str,
    ) -> DeliveryResult<()> {
        let mut stderr = std::io::stderr().lock();
        let line = format!("\r{:<40}", text.cyan());
        let written = if text == SCANNING_TEXT {
            writeln!(stderr, "{line}")
        } else {
            write!(stderr, "{line}").and_then(|()| stderr.flush())
        };
        written.map_err(|e| DeliveryError::Transport(Box::new(e)))
    }
}

/// Result chunks on stdout, summary highlighted.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleDelivery;

#[async_trait]
impl BatchDelivery for ConsoleDelivery {
    async fn send(&self, _conversation: ConversationId, text: &str) -> DeliveryResult<()> {
        let mut stdout = std::io::stdout().lock();
        let written = if text.starts_with("found ") {
            writeln!(stdout, "{}", text.bright_green().bold())
        } else {
            writeln!(stdout, "{text}")
        };
        written.map_err(|e| DeliveryError::Transport(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_errors_are_rejections() {
        let error = delivery_error(TelegramError::Api {
            code: 400,
            description: "Bad Request: message is too long".to_string(),
        });
        assert!(matches!(error, DeliveryError::Rejected { reason } if reason.contains("too long")));

        let error = delivery_error(TelegramError::Decode("eof".to_string()));
        assert!(matches!(error, DeliveryError::Rejected { .. }));
    }

    #[tokio::test]
    async fn test_console_adapters_accept_everything() {
        let conversation = ConversationId(0);
        assert!(ConsoleReporter
            .report(conversation, MessageId(0), "in progress: 1/12")
            .await
            .is_ok());
        assert!(ConsoleDelivery
            .send(conversation, "https://telegra.ph/a-01-01")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_telegram_is_transport_error() {
        let service = TelegramService::new(
            telegram::TelegramOptions::new("token").with_api_base("http://127.0.0.1:9"),
        );
        let chat = TelegramChat::new(service);

        let result = chat.send(ConversationId(1), "hello").await;
        assert!(matches!(result, Err(DeliveryError::Transport(_))));
    }
}
