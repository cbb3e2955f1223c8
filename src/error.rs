//! Top-level error type and process exit codes.

use thiserror::Error;

use crate::config::ConfigError;
use crate::delivery::DeliveryError;
use crate::input::FileReadError;
use crate::telegram::TelegramError;

/// Exit code for configuration errors.
pub const EXIT_CONFIG: u8 = 3;

/// Exit code for unreadable input files.
pub const EXIT_FILE_READ: u8 = 4;

/// Exit code for network, HTTP and response decoding failures.
pub const EXIT_TRANSPORT: u8 = 5;

/// Exit code for requests rejected by Telegram.
pub const EXIT_API: u8 = 6;

/// Any error that ends a run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    FileRead(#[from] FileReadError),

    #[error(transparent)]
    Telegram(#[from] TelegramError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("No input file given")]
    MissingFile,
}

impl AppError {
    /// Returns the process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => EXIT_CONFIG,
            Self::FileRead(_) | Self::MissingFile => EXIT_FILE_READ,
            Self::Telegram(err) | Self::Delivery(DeliveryError { source: err, .. }) => {
                telegram_exit_code(err)
            }
        }
    }
}

const fn telegram_exit_code(err: &TelegramError) -> u8 {
    if err.is_api_error() {
        EXIT_API
    } else {
        EXIT_TRANSPORT
    }
}
