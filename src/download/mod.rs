//! Download side of the relay
//!
//! URL allow-listing, the yt-dlp adapter and the temp artifacts it leaves
//! behind, plus the size gate applied before upload.

/// Temp artifact ownership and the upload size gate
pub mod artifact;
/// Allow-list validation of submitted links
pub mod validator;
/// yt-dlp child-process adapter
pub mod ytdlp;

pub use artifact::{enforce_size_limit, TempArtifact};
pub use validator::{validate_url, SUPPORTED_DOMAINS};
pub use ytdlp::{DownloadResult, VideoDownloader, YtDlpDownloader};

#[cfg(test)]
pub use ytdlp::MockVideoDownloader;
