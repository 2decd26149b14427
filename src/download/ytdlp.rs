//! yt-dlp adapter
//!
//! Runs the `yt-dlp` executable as a blocking child process with a fixed
//! configuration and turns its output into a [`DownloadResult`].
//! Callers on the async side are expected to go through
//! `tokio::task::spawn_blocking`.

use crate::download::artifact::TempArtifact;
use crate::error::RelayError;
use crate::utils::truncate_str;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;
use tracing::{debug, info, warn};
use url::Url;

/// Combined mp4 video + m4a audio, else the best single stream
const FORMAT_SELECTOR: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";

/// File name template inside the per-download directory
const OUTPUT_TEMPLATE: &str = "video.%(ext)s";

/// Per-platform extractor hints
const EXTRACTOR_ARGS: &[&str] = &["twitter:api=graphql", "youtube:player_client=android"];

/// Title used when the extractor reports none
const FALLBACK_TITLE: &str = "video";

/// Outcome of a successful download
#[derive(Debug)]
pub struct DownloadResult {
    /// The file and the temp directory that owns it
    pub artifact: TempArtifact,
    /// Video title, already truncated
    pub title: String,
}

/// Blocking boundary to the external extraction engine
#[cfg_attr(test, mockall::automock)]
pub trait VideoDownloader: Send + Sync {
    /// Download a single video from `url` into a fresh temp directory.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::DownloadFailed`] if the engine fails. The temp
    /// directory is already gone by then.
    fn download(&self, url: &Url) -> Result<DownloadResult, RelayError>;
}

/// [`VideoDownloader`] backed by the `yt-dlp` executable
#[derive(Debug, Clone)]
pub struct YtDlpDownloader {
    bin: String,
    title_max_chars: usize,
}

impl YtDlpDownloader {
    /// Create a downloader that runs `bin` and cuts titles to `title_max_chars`
    #[must_use]
    pub fn new(bin: impl Into<String>, title_max_chars: usize) -> Self {
        Self {
            bin: bin.into(),
            title_max_chars,
        }
    }

    fn run(&self, url: &Url, dir: &TempDir) -> Result<(PathBuf, String), RelayError> {
        let template = dir.path().join(OUTPUT_TEMPLATE);
        let args = build_args(url, &template.to_string_lossy());
        debug!(bin = %self.bin, args = ?args, "Executing yt-dlp command");

        let output = Command::new(&self.bin)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                RelayError::DownloadFailed(format!("не удалось запустить {}: {e}", self.bin))
            })?;

        if !output.status.success() {
            let message = engine_error_message(&output);
            warn!(url = %url, error = %message, "yt-dlp exited with error");
            return Err(RelayError::DownloadFailed(message));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let (file, title) = parse_print_output(&stdout)?;

        if !file.starts_with(dir.path()) || !file.is_file() {
            return Err(RelayError::DownloadFailed(format!(
                "файл не найден: {}",
                file.display()
            )));
        }

        Ok((file, self.normalize_title(title.as_deref())))
    }

    fn normalize_title(&self, raw: Option<&str>) -> String {
        let title = raw.map(str::trim).filter(|t| !t.is_empty()).unwrap_or(FALLBACK_TITLE);
        truncate_str(title, self.title_max_chars)
    }
}

impl VideoDownloader for YtDlpDownloader {
    fn download(&self, url: &Url) -> Result<DownloadResult, RelayError> {
        let dir = TempArtifact::create_dir()?;
        info!(url = %url, dir = %dir.path().display(), "Temp directory created");

        let outcome = self.run(url, &dir);
        match outcome {
            Ok((file, title)) => {
                info!(url = %url, file = %file.display(), title = %title, "Video downloaded");
                Ok(DownloadResult {
                    artifact: TempArtifact::new(dir, file),
                    title,
                })
            }
            Err(e) => {
                if let Err(close_err) = dir.close() {
                    warn!(error = %close_err, "Failed to remove temp directory after failed download");
                }
                Err(e)
            }
        }
    }
}

/// Full yt-dlp argument list for one download
fn build_args(url: &Url, output_template: &str) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "--format".into(),
        FORMAT_SELECTOR.into(),
        "--output".into(),
        output_template.into(),
        "--quiet".into(),
        "--no-warnings".into(),
        "--no-playlist".into(),
        "--no-simulate".into(),
    ];
    for hint in EXTRACTOR_ARGS {
        args.push("--extractor-args".into());
        args.push((*hint).into());
    }
    // JSON-quoted so paths and titles survive newlines and odd characters
    args.extend([
        "--print".into(),
        "after_move:%(filepath)j".into(),
        "--print".into(),
        "after_move:%(title)j".into(),
        "--".into(),
        url.as_str().into(),
    ]);
    args
}

/// Parse the two `--print` lines: file path, then title
fn parse_print_output(stdout: &str) -> Result<(PathBuf, Option<String>), RelayError> {
    let mut lines = stdout.lines().map(str::trim).filter(|l| !l.is_empty());

    let file = lines
        .next()
        .and_then(|l| serde_json::from_str::<Option<String>>(l).ok().flatten())
        .ok_or_else(|| {
            RelayError::DownloadFailed("yt-dlp не сообщил путь к файлу".to_string())
        })?;

    let title = lines.next().and_then(|l| {
        serde_json::from_str::<Option<String>>(l)
            .unwrap_or_else(|_| Some(l.to_string()))
    });

    Ok((PathBuf::from(file), title))
}

/// Most useful line of a failed run: the last `ERROR:` line, else the last stderr line
fn engine_error_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = stderr.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    lines
        .iter()
        .rev()
        .find_map(|l| l.strip_prefix("ERROR:").map(str::trim))
        .or_else(|| lines.last().copied())
        .map_or_else(
            || format!("yt-dlp завершился с кодом {}", output.status),
            ToString::to_string,
        )
}
