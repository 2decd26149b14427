use thiserror::Error;

/// Everything that can end a relay invocation early.
///
/// `InvalidFormat` and `UnsupportedDomain` are user input errors,
/// `TooLarge` is a policy rejection. The rest are failures worth logging.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The text is not an absolute URL with a host
    #[error("Неверный формат URL")]
    InvalidFormat,
    /// The host is not on the allow-list
    #[error("Домен '{0}' не поддерживается")]
    UnsupportedDomain(String),
    /// yt-dlp could not produce a file
    #[error("Не удалось скачать видео: {0}")]
    DownloadFailed(String),
    /// The downloaded file exceeds the upload limit
    #[error("Видео слишком большое ({size_mb:.1} МБ)")]
    TooLarge {
        /// Measured size in megabytes
        size_mb: f64,
    },
    /// Worker panic, transport or I/O failure
    #[error("{0}")]
    Unexpected(String),
}

impl RelayError {
    /// Whether this error is a rejection the user caused, rather than a failure.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidFormat | Self::UnsupportedDomain(_) | Self::TooLarge { .. }
        )
    }
}

impl From<std::io::Error> for RelayError {
    fn from(e: std::io::Error) -> Self {
        Self::Unexpected(format!("I/O error: {e}"))
    }
}

impl From<tokio::task::JoinError> for RelayError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Unexpected(format!("Download worker failed: {e}"))
    }
}
