//! Telegram credentials and send options.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use tracing::debug;

use super::{
    BOT_TOKEN_VARS, CHAT_ID_VARS, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, ENV_API_URL,
    ENV_TIMEOUT_SECS,
};
use crate::telegram::ParseMode;

/// Loads `KEY=VALUE` lines from a settings file into the process environment.
///
/// Variables already present in the environment are not overridden.
/// Returns `false` if the file could not be loaded.
pub fn load_env_file(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!("Loaded settings from {}", path.display());
            true
        }
        Err(e) => {
            debug!("Could not load settings file ({}): {}", path.display(), e);
            false
        }
    }
}

/// Telegram Bot API configuration.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot token issued by `@BotFather`.
    pub bot_token: String,

    /// Destination chat identifier (numeric id or `@channelusername`).
    pub chat_id: String,

    /// Base URL of the Bot API server.
    pub api_url: String,

    /// Timeout applied to every request.
    pub timeout: Duration,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_owned()
}

fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

impl TelegramConfig {
    /// Creates a configuration with the default API URL and timeout.
    #[must_use]
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            bot_token,
            chat_id,
            api_url: default_api_url(),
            timeout: default_timeout(),
        }
    }

    /// Creates configuration from environment variables.
    ///
    /// Expects `TG_BOT_TOKEN` (or `BOT_TOKEN`) and `TG_CHAT_ID` (or `CHAT_ID`)
    /// to be set. `TG_API_URL` and `TG_TIMEOUT_SECS` are optional.
    ///
    /// # Errors
    ///
    /// Returns an error naming every missing value, or if the timeout is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Creates configuration using `lookup` to resolve variable names.
    ///
    /// Values are trimmed; blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolve = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| lookup(name))
                .map(|value| value.trim().to_owned())
                .find(|value| !value.is_empty())
        };

        let bot_token = resolve(BOT_TOKEN_VARS);
        let chat_id = resolve(CHAT_ID_VARS);

        let (bot_token, chat_id) = match (bot_token, chat_id) {
            (Some(token), Some(chat)) => (token, chat),
            (token, chat) => {
                let mut missing = Vec::new();
                if token.is_none() {
                    missing.push(BOT_TOKEN_VARS[0]);
                }
                if chat.is_none() {
                    missing.push(CHAT_ID_VARS[0]);
                }
                return Err(ConfigError::Missing(missing));
            }
        };

        let api_url = resolve(&[ENV_API_URL]).map_or_else(default_api_url, |url| {
            url.trim_end_matches('/').to_owned()
        });

        let timeout = match resolve(&[ENV_TIMEOUT_SECS]) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => default_timeout(),
        };

        Ok(Self {
            bot_token,
            chat_id,
            api_url,
            timeout,
        })
    }

    /// Returns the full URL of a Bot API method.
    #[must_use]
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.bot_token, method)
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &mask_token(&self.bot_token))
            .field("chat_id", &self.chat_id)
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Options controlling how the text is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOptions {
    /// Formatting directive for message bodies.
    pub parse_mode: ParseMode,

    /// Suppress link previews in sent messages.
    pub disable_link_preview: bool,

    /// Deliver messages without a notification sound.
    pub disable_notification: bool,

    /// Prefix each part with `📄 Part i/n` when the text spans several messages.
    pub numbered_parts: bool,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            parse_mode: ParseMode::default(),
            disable_link_preview: true,
            disable_notification: false,
            numbered_parts: false,
        }
    }
}

/// Masks a bot token for display (keeps the bot id before the colon).
pub fn mask_token(token: &str) -> String {
    match token.split_once(':') {
        Some((bot_id, _)) if !bot_id.is_empty() => format!("{bot_id}:***"),
        _ => "***".to_owned(),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("Invalid TG_TIMEOUT_SECS value {0:?} (must be a positive number of seconds)")]
    InvalidTimeout(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_from_lookup_primary_names() {
        let config = TelegramConfig::from_lookup(lookup(&[
            ("TG_BOT_TOKEN", "123:abc"),
            ("TG_CHAT_ID", "-10042"),
        ]))
        .unwrap();

        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.chat_id, "-10042");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_from_lookup_fallback_names() {
        let config = TelegramConfig::from_lookup(lookup(&[
            ("BOT_TOKEN", "  456:def  "),
            ("CHAT_ID", "777"),
        ]))
        .unwrap();

        assert_eq!(config.bot_token, "456:def");
        assert_eq!(config.chat_id, "777");
    }

    #[test]
    fn test_blank_primary_falls_back() {
        let config = TelegramConfig::from_lookup(lookup(&[
            ("TG_BOT_TOKEN", "   "),
            ("BOT_TOKEN", "1:x"),
            ("TG_CHAT_ID", "5"),
        ]))
        .unwrap();

        assert_eq!(config.bot_token, "1:x");
    }

    #[test]
    fn test_missing_both_names_both() {
        let err = TelegramConfig::from_lookup(lookup(&[])).unwrap_err();
        match &err {
            ConfigError::Missing(names) => assert_eq!(names, &["TG_BOT_TOKEN", "TG_CHAT_ID"]),
            ConfigError::InvalidTimeout(_) => panic!("unexpected error: {err}"),
        }
        assert!(err.to_string().contains("TG_BOT_TOKEN, TG_CHAT_ID"));
    }

    #[test]
    fn test_missing_chat_id_only() {
        let err =
            TelegramConfig::from_lookup(lookup(&[("TG_BOT_TOKEN", "1:x"), ("TG_CHAT_ID", "")]))
                .unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ref names) if names == &["TG_CHAT_ID"]));
    }

    #[test]
    fn test_api_url_and_timeout_overrides() {
        let config = TelegramConfig::from_lookup(lookup(&[
            ("TG_BOT_TOKEN", "1:x"),
            ("TG_CHAT_ID", "5"),
            ("TG_API_URL", "http://127.0.0.1:8081/"),
            ("TG_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "http://127.0.0.1:8081");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(
            config.method_url("getMe"),
            "http://127.0.0.1:8081/bot1:x/getMe"
        );
    }

    #[test]
    fn test_invalid_timeout() {
        for raw in ["0", "soon", "-5"] {
            let err = TelegramConfig::from_lookup(lookup(&[
                ("TG_BOT_TOKEN", "1:x"),
                ("TG_CHAT_ID", "5"),
                ("TG_TIMEOUT_SECS", raw),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidTimeout(_)), "{raw}");
        }
    }

    #[test]
    fn test_debug_masks_token() {
        let config = TelegramConfig::new("123456:SECRET".to_owned(), "42".to_owned());
        let debug = format!("{config:?}");
        assert!(debug.contains("123456:***"));
        assert!(!debug.contains("SECRET"));
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("123:abc"), "123:***");
        assert_eq!(mask_token("garbage"), "***");
        assert_eq!(mask_token(":abc"), "***");
    }

    #[test]
    fn test_default_send_options() {
        let options = SendOptions::default();
        assert_eq!(options.parse_mode, ParseMode::Plain);
        assert!(options.disable_link_preview);
        assert!(!options.disable_notification);
        assert!(!options.numbered_parts);
    }

    #[test]
    fn test_load_env_file_missing() {
        assert!(!load_env_file("/definitely/not/here/.env"));
    }
}
