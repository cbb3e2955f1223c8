//! Configuration module for the file sender.
//!
//! Resolves the bot token and chat id from the environment (optionally
//! populated from a `.env` file) and holds the options that shape delivery.

mod settings;

pub use settings::{ConfigError, SendOptions, TelegramConfig, load_env_file, mask_token};

/// Variables holding the bot token, in lookup order.
pub const BOT_TOKEN_VARS: &[&str] = &["TG_BOT_TOKEN", "BOT_TOKEN"];

/// Variables holding the destination chat id, in lookup order.
pub const CHAT_ID_VARS: &[&str] = &["TG_CHAT_ID", "CHAT_ID"];

/// Overrides the Bot API base URL (self-hosted servers, tests).
pub const ENV_API_URL: &str = "TG_API_URL";

/// Overrides the per-request timeout, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "TG_TIMEOUT_SECS";

/// Public Telegram Bot API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
