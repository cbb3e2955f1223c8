//! TG File Sender Library
//!
//! Sends the contents of a text file to a Telegram chat through the Bot API.
//!
//! This crate provides the core functionality for:
//! - Loading the bot token and chat id from the environment or a `.env` file
//! - Reading the source text file
//! - Splitting text into messages under Telegram's 4096-character limit
//! - Sending the messages in order and reporting the outcome

pub mod config;
pub mod delivery;
pub mod error;
pub mod input;
pub mod splitter;
pub mod telegram;
