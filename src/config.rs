//! Configuration and settings management
//!
//! Loads settings from config files and environment variables and defines
//! the relay policy constants.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Default upload limit in megabytes (Telegram bot API limit)
pub const MAX_FILE_SIZE_MB: f64 = 50.0;
/// Default maximum title length, in characters
pub const TITLE_MAX_CHARS: usize = 50;
/// Default yt-dlp executable
pub const YTDLP_BIN: &str = "yt-dlp";

/// Prefix of per-download temporary directories
pub const TEMP_DIR_PREFIX: &str = "tg_video_download_";

const TOKEN_KEY: &str = "telegram_api_key";
/// Older name of the token variable, read only when the primary one is unset
const LEGACY_TOKEN_KEY: &str = "telegram_token";

/// Application settings loaded from environment variables
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Telegram Bot API token
    pub telegram_api_key: String,

    /// Path or name of the yt-dlp executable
    #[serde(default = "default_ytdlp_bin")]
    pub ytdlp_bin: String,

    /// Files larger than this are not uploaded
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: f64,

    /// Video titles are cut to this many characters
    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,
}

fn default_ytdlp_bin() -> String {
    YTDLP_BIN.to_string()
}

const fn default_max_file_size_mb() -> f64 {
    MAX_FILE_SIZE_MB
}

const fn default_title_max_chars() -> usize {
    TITLE_MAX_CHARS
}

impl Settings {
    /// Create new settings by loading from environment and files
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use oxide_relay::config::Settings;
    ///
    /// let settings = Settings::new().expect("Failed to load configuration");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails or the bot token is missing.
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            // Not checked into git
            .add_source(File::with_name("config/local").required(false))
            // Eg.. `APP__YTDLP_BIN=/opt/yt-dlp ./target/oxide-relay`
            .add_source(Environment::with_prefix("APP").separator("__"))
            // UPPER_SNAKE_CASE env vars map to snake_case keys, empty ones count as unset
            .add_source(Environment::default().ignore_empty(true))
            .build()?;
        let s = with_legacy_token(s)?;

        let settings: Self = s.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.telegram_api_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "TELEGRAM_API_KEY is not set".to_string(),
            ));
        }
        if self.max_file_size_mb.is_nan() || self.max_file_size_mb <= 0.0 {
            return Err(ConfigError::Message(format!(
                "max_file_size_mb must be positive, got {}",
                self.max_file_size_mb
            )));
        }
        if self.title_max_chars == 0 {
            return Err(ConfigError::Message(
                "title_max_chars must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Settings with the given token and default policy, for wiring without env
    #[cfg(test)]
    #[must_use]
    pub(crate) fn with_token(token: impl Into<String>) -> Self {
        Self {
            telegram_api_key: token.into(),
            ytdlp_bin: default_ytdlp_bin(),
            max_file_size_mb: MAX_FILE_SIZE_MB,
            title_max_chars: TITLE_MAX_CHARS,
        }
    }
}

/// Copy `TELEGRAM_TOKEN` into the token key if `TELEGRAM_API_KEY` is absent
fn with_legacy_token(s: Config) -> Result<Config, ConfigError> {
    if s.get_string(TOKEN_KEY).is_ok() {
        return Ok(s);
    }
    match s.get_string(LEGACY_TOKEN_KEY) {
        Ok(token) => Config::builder()
            .add_source(s)
            .set_override(TOKEN_KEY, token)?
            .build(),
        Err(_) => Ok(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    // Single test so env mutations never race each other
    #[test]
    fn test_config_env_loading() -> Result<(), Box<dyn std::error::Error>> {
        env::remove_var("TELEGRAM_TOKEN");
        env::remove_var("TELEGRAM_API_KEY");

        // 1. Missing token aborts loading
        assert!(Settings::new().is_err());

        // 2. Empty token is treated as unset
        env::set_var("TELEGRAM_API_KEY", "");
        assert!(Settings::new().is_err());

        // 3. Token present, policy falls back to defaults
        env::set_var("TELEGRAM_API_KEY", "123456:dummy");
        let settings = Settings::new()?;
        assert_eq!(settings.telegram_api_key, "123456:dummy");
        assert_eq!(settings.ytdlp_bin, "yt-dlp");
        assert!((settings.max_file_size_mb - 50.0).abs() < f64::EPSILON);
        assert_eq!(settings.title_max_chars, 50);

        // 4. Overrides are picked up from the environment
        env::set_var("MAX_FILE_SIZE_MB", "20");
        let settings = Settings::new()?;
        assert!((settings.max_file_size_mb - 20.0).abs() < f64::EPSILON);
        env::remove_var("MAX_FILE_SIZE_MB");
        env::remove_var("TELEGRAM_API_KEY");

        // 5. Legacy variable name still works
        env::set_var("TELEGRAM_TOKEN", "654321:legacy");
        let settings = Settings::new()?;
        assert_eq!(settings.telegram_api_key, "654321:legacy");

        // 6. Both names set: the primary one wins, no duplicate-key failure
        env::set_var("TELEGRAM_API_KEY", "123456:primary");
        let settings = Settings::new()?;
        assert_eq!(settings.telegram_api_key, "123456:primary");
        env::remove_var("TELEGRAM_API_KEY");

        // 7. Empty primary falls back to the legacy name
        env::set_var("TELEGRAM_API_KEY", "");
        let settings = Settings::new()?;
        assert_eq!(settings.telegram_api_key, "654321:legacy");
        env::remove_var("TELEGRAM_API_KEY");
        env::remove_var("TELEGRAM_TOKEN");

        Ok(())
    }

    #[test]
    fn test_with_token_uses_defaults() {
        let settings = Settings::with_token("t");
        assert_eq!(settings.telegram_api_key, "t");
        assert_eq!(settings.title_max_chars, TITLE_MAX_CHARS);
        assert!(settings.validate().is_ok());
    }
}
