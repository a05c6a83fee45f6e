//! Minimal Telegram Bot API client: long-poll updates, send and edit text.

use std::time::Duration;

pub mod models;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{
    ApiResponse, EditMessageTextRequest, GetUpdatesRequest, Message, SendMessageRequest, Update,
};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("request to Telegram failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram API error {code}: {description}")]
    Api { code: i64, description: String },

    #[error("could not decode Telegram response: {0}")]
    Decode(String),
}

impl TelegramError {
    /// Telegram answers 400 "message is not modified" when an edit repeats the
    /// current text. Callers usually want to ignore it.
    pub fn is_not_modified(&self) -> bool {
        matches!(self, Self::Api { description, .. } if description.contains("message is not modified"))
    }
}

#[derive(Debug, Clone)]
pub struct TelegramOptions {
    pub bot_token: String,
    pub api_base: String,
}

impl TelegramOptions {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct TelegramService {
    options: TelegramOptions,
    client: Client,
}

impl TelegramService {
    pub fn new(options: TelegramOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{base}/bot{token}/{method}",
            base = self.options.api_base.trim_end_matches('/'),
            token = self.options.bot_token,
        )
    }

    async fn call<B, T>(&self, method: &str, body: &B, timeout: Option<Duration>) -> Result<T, TelegramError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.client.post(self.method_url(method)).json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(method = method, status = %status, "telegram call finished");

        parse_response(&text)
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message, TelegramError> {
        let body = SendMessageRequest {
            chat_id,
            text,
            disable_web_page_preview: true,
        };
        self.call("sendMessage", &body, None).await
    }

    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<(), TelegramError> {
        let body = EditMessageTextRequest {
            chat_id,
            message_id,
            text,
        };
        // result is the edited Message, or `true` for inline messages
        let _: serde_json::Value = self.call("editMessageText", &body, None).await?;
        Ok(())
    }

    /// Long-poll for new message updates.
    ///
    /// The request is allowed to run `poll_timeout` plus a grace period before
    /// the client gives up.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        poll_timeout: Duration,
    ) -> Result<Vec<Update>, TelegramError> {
        let body = GetUpdatesRequest {
            offset,
            timeout: poll_timeout.as_secs(),
            allowed_updates: vec!["message"],
        };
        let timeout = poll_timeout + Duration::from_secs(10);
        self.call("getUpdates", &body, Some(timeout)).await
    }
}

fn parse_response<T: DeserializeOwned>(text: &str) -> Result<T, TelegramError> {
    let envelope: ApiResponse<T> =
        serde_json::from_str(text).map_err(|e| TelegramError::Decode(e.to_string()))?;

    if !envelope.ok {
        let error = TelegramError::Api {
            code: envelope.error_code.unwrap_or_default(),
            description: envelope.description.unwrap_or_default(),
        };
        warn!(error = %error, "Telegram returned an error");
        return Err(error);
    }

    envelope
        .result
        .ok_or_else(|| TelegramError::Decode("ok response without result".to_string()))
}
