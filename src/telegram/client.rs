//! HTTP client for the Telegram Bot API.

use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::types::{ApiOutcome, BotUser, SendMessage, SentMessage};
use crate::config::{TelegramConfig, mask_token};

/// Errors that can occur during Bot API calls.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Unexpected response from Telegram: {0}")]
    InvalidResponse(#[source] serde_json::Error),

    #[error("Telegram API error [{code}]: {description}")]
    Api { code: i64, description: String },
}

impl TelegramError {
    /// Returns true if Telegram itself rejected the request (`ok: false`).
    #[must_use]
    pub const fn is_api_error(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

/// Thin wrapper over `reqwest` bound to one bot token.
pub struct BotClient {
    http: reqwest::Client,
    config: TelegramConfig,
}

impl BotClient {
    /// Builds a client using the configured API URL and timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &TelegramConfig) -> Result<Self, TelegramError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        debug!(
            "Bot API client ready (url: {}, token: {}, timeout: {:?})",
            config.api_url,
            mask_token(&config.bot_token),
            config.timeout
        );

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    /// Sends one text message.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or if Telegram rejects the message.
    pub async fn send_message(
        &self,
        request: &SendMessage<'_>,
    ) -> Result<SentMessage, TelegramError> {
        debug!(
            "sendMessage to {} ({} chars, parse_mode: {:?})",
            request.chat_id,
            request.text.chars().count(),
            request.parse_mode
        );

        let body = self.call("sendMessage", request).await?;
        let sent = unwrap_outcome(ApiOutcome::<SentMessage>::from_json(&body))?;

        match sent.message_id {
            Some(id) => debug!("Message delivered (message_id: {})", id),
            None => debug!("Message delivered"),
        }
        Ok(sent)
    }

    /// Calls `getMe` to verify the token and reachability of the API.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or if the token is rejected.
    pub async fn get_me(&self) -> Result<BotUser, TelegramError> {
        let body = self.call("getMe", &serde_json::json!({})).await?;
        let user = unwrap_outcome(ApiOutcome::<BotUser>::from_json_strict(&body))?;
        info!("Bot connected: {}", user);
        Ok(user)
    }

    /// POSTs a JSON payload and returns the raw response body.
    ///
    /// Bodies of non-2xx responses are returned too: Telegram reports
    /// errors in the same envelope.
    async fn call<P: Serialize + ?Sized>(
        &self,
        method: &str,
        payload: &P,
    ) -> Result<String, TelegramError> {
        let response = self
            .http
            .post(self.config.method_url(method))
            .json(payload)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        let body = response.text().await.map_err(reqwest::Error::without_url)?;

        if !status.is_success() && !looks_like_envelope(&body) {
            warn!("{} returned HTTP {}", method, status);
            return Err(TelegramError::Status {
                status,
                body: truncate_for_log(&body, 200),
            });
        }

        Ok(body)
    }
}

impl std::fmt::Debug for BotClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Converts a decoded envelope into a result.
fn unwrap_outcome<T>(
    decoded: Result<ApiOutcome<T>, serde_json::Error>,
) -> Result<T, TelegramError> {
    match decoded.map_err(TelegramError::InvalidResponse)? {
        ApiOutcome::Success(result) => Ok(result),
        ApiOutcome::Failure { code, description } => {
            warn!("Telegram API error [{}]: {}", code, description);
            Err(TelegramError::Api { code, description })
        }
    }
}

/// Checks whether a body is a JSON object carrying the `ok` flag.
fn looks_like_envelope(body: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(body)
        .is_ok_and(|value| value.get("ok").is_some_and(serde_json::Value::is_boolean))
}

/// Truncates a string for logging purposes.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_owned()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}
