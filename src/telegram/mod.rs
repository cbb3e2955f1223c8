//! Telegram Bot API module.
//!
//! Provides the HTTP client for `sendMessage` and `getMe` and the typed
//! request/response shapes, with responses decoded once into [`ApiOutcome`].

mod client;
mod types;

pub use client::{BotClient, TelegramError};
pub use types::{ApiOutcome, BotUser, ParseMode, SendMessage, SentMessage};
