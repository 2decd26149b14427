#![deny(missing_docs)]
//! Telegram bot that relays videos from social platforms via yt-dlp.

/// Telegram-specific bot/transport implementation.
pub mod bot;
/// Settings and policy constants.
pub mod config;
/// URL validation, yt-dlp adapter and temp-file bookkeeping.
pub mod download;
/// Relay error taxonomy.
pub mod error;
/// Small text helpers.
pub mod utils;

pub use error::RelayError;
