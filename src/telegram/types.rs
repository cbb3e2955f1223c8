//! Bot API request and response types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Telegram text-formatting directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ParseMode {
    /// No formatting; `parse_mode` is omitted from the request.
    #[default]
    Plain,
    Markdown,
    #[value(name = "markdown-v2", alias = "markdownv2")]
    MarkdownV2,
    Html,
}

impl ParseMode {
    /// Returns the value sent in the `parse_mode` field, if any.
    #[must_use]
    pub const fn as_api_value(self) -> Option<&'static str> {
        match self {
            Self::Plain => None,
            Self::Markdown => Some("Markdown"),
            Self::MarkdownV2 => Some("MarkdownV2"),
            Self::Html => Some("HTML"),
        }
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_value().unwrap_or("plain"))
    }
}

/// Body of a `sendMessage` call.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessage<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disable_web_page_preview: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disable_notification: bool,
}

/// The part of a sent `Message` that gets reported back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SentMessage {
    #[serde(default)]
    pub message_id: Option<i64>,
}

/// Bot identity returned by `getMe`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BotUser {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

impl fmt::Display for BotUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.username {
            Some(username) => write!(f, "@{username} ({}, id {})", self.first_name, self.id),
            None => write!(f, "{} (id {})", self.first_name, self.id),
        }
    }
}

/// Raw Bot API envelope as it arrives on the wire.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i64>,
}

/// Decoded Bot API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiOutcome<T> {
    /// `ok: true` with its `result`.
    Success(T),
    /// `ok: false` with the reported error.
    Failure { code: i64, description: String },
}

impl<T> ApiOutcome<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    /// Decodes a response body into an outcome.
    ///
    /// A successful envelope without a `result` yields `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not a Bot API envelope.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        Self::decode(body, T::default)
    }
}

impl<T> ApiOutcome<T>
where
    T: serde::de::DeserializeOwned,
{
    /// Decodes a response body, requiring `result` on success.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not a Bot API envelope or a
    /// successful envelope carries no `result`.
    pub fn from_json_strict(body: &str) -> Result<Self, serde_json::Error> {
        let outcome: ApiOutcome<Option<T>> = Self::decode(body, || None)?;
        match outcome {
            ApiOutcome::Success(Some(result)) => Ok(ApiOutcome::Success(result)),
            ApiOutcome::Success(None) => Err(serde::de::Error::missing_field("result")),
            ApiOutcome::Failure { code, description } => {
                Ok(ApiOutcome::Failure { code, description })
            }
        }
    }

    fn decode<R>(
        body: &str,
        missing: impl FnOnce() -> R,
    ) -> Result<ApiOutcome<R>, serde_json::Error>
    where
        R: From<T>,
    {
        let envelope: Envelope<T> = serde_json::from_str(body)?;
        if envelope.ok {
            Ok(ApiOutcome::Success(envelope.result.map_or_else(missing, R::from)))
        } else {
            Ok(ApiOutcome::Failure {
                code: envelope.error_code.unwrap_or_default(),
                description: envelope
                    .description
                    .unwrap_or_else(|| "Unknown error".to_owned()),
            })
        }
    }
}
