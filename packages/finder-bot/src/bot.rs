//! Long-polling Telegram command loop.
//!
//! `/p <text>` starts a run for the sanitized query. Every run gets its own
//! task so a slow run never holds up polling or other chats.

use std::sync::Arc;
use std::time::Duration;
use telegram::{models::Message, TelegramService};
use telegraph_finder::{ChatTarget, Finder, Query};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::adapters::TelegramChat;
use crate::sanitize::sanitize;

pub const USAGE_TEXT: &str = "wrong usage: /p <query>";
pub const STARTING_TEXT: &str = "starting…";

const POLL_TIMEOUT: Duration = Duration::from_secs(30);
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// What to do with an incoming message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotAction {
    /// Not a command for this bot
    Ignore,

    /// `/p` without a usable query
    Usage,

    /// Start a run for this query
    Start(Query),
}

/// Decide how to answer `text`.
///
/// Accepts `/p <text>` and `/p@botname <text>`.
pub fn decide(text: &str) -> BotAction {
    let Some(rest) = text.trim_start().strip_prefix("/p") else {
        return BotAction::Ignore;
    };

    let rest = match rest.strip_prefix('@') {
        Some(mention) => match mention.split_once(char::is_whitespace) {
            Some((_, args)) => args,
            None => "",
        },
        None if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest,
        None => return BotAction::Ignore,
    };

    match sanitize(rest) {
        Ok(query) => BotAction::Start(query),
        Err(_) => BotAction::Usage,
    }
}

pub struct FinderBot {
    service: TelegramService,
    finder: Arc<Finder>,
}

impl FinderBot {
    pub fn new(service: TelegramService, finder: Finder) -> Self {
        Self {
            service,
            finder: Arc::new(finder),
        }
    }

    /// Poll for commands until `shutdown` is cancelled. Runs still going at
    /// that point are aborted.
    pub async fn run(self, shutdown: CancellationToken) -> anyhow::Result<()> {
        let mut offset = None;
        let mut jobs = JoinSet::new();

        info!("polling for commands");

        loop {
            let polled = tokio::select! {
                _ = shutdown.cancelled() => break,
                polled = self.service.get_updates(offset, POLL_TIMEOUT) => polled,
            };

            match polled {
                Ok(updates) => {
                    for update in updates {
                        offset = Some(update.update_id + 1);
                        if let Some(message) = update.message {
                            self.handle_message(message, &mut jobs).await;
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "getUpdates failed, retrying");
                    tokio::select! {
                        _ = shutdown.cancelled() => break,
                        _ = tokio::time::sleep(POLL_RETRY_DELAY) => {}
                    }
                }
            }

            while let Some(finished) = jobs.try_join_next() {
                if let Err(e) = finished {
                    error!(error = %e, "run task failed");
                }
            }
        }

        info!(running = jobs.len(), "shutting down");
        jobs.shutdown().await;
        Ok(())
    }

    async fn handle_message(&self, message: Message, jobs: &mut JoinSet<()>) {
        let Some(text) = message.text.as_deref() else {
            return;
        };
        let chat_id = message.chat.id;

        let query = match decide(text) {
            BotAction::Ignore => return,
            BotAction::Usage => {
                if let Err(e) = self.service.send_message(chat_id, USAGE_TEXT).await {
                    warn!(chat_id = chat_id, error = %e, "usage reply failed");
                }
                return;
            }
            BotAction::Start(query) => query,
        };

        let progress = match self.service.send_message(chat_id, STARTING_TEXT).await {
            Ok(sent) => sent,
            Err(e) => {
                warn!(chat_id = chat_id, query = %query, error = %e, "could not start run");
                return;
            }
        };

        info!(chat_id = chat_id, query = %query, "run requested");

        let finder = Arc::clone(&self.finder);
        let chat = TelegramChat::new(self.service.clone());
        let target = ChatTarget::new(chat_id, progress.message_id);

        jobs.spawn(async move {
            if let Err(e) = finder
                .run_http(query.as_str(), target, &chat, &chat)
                .await
            {
                error!(chat_id = chat_id, query = %query, error = %e, "run failed");
            }
        });
    }
}
