//! Link relay pipeline
//!
//! validate → acknowledge → download (blocking pool) → size gate → upload →
//! cleanup, with one acknowledgement message edited along the way.
//!
//! Every invocation ends in a [`RelayOutcome`], and the temp directory of the
//! download is gone by the time [`relay_video`] returns.

use crate::bot::transport::ChatTransport;
use crate::bot::views;
use crate::config::Settings;
use crate::download::{enforce_size_limit, validate_url, DownloadResult, VideoDownloader};
use crate::error::RelayError;
use std::fmt;
use std::sync::Arc;
use teloxide::types::MessageId;
use tracing::{debug, error, info, warn};
use url::Url;

/// Where a relay invocation ended up
#[derive(Debug)]
pub enum RelayOutcome {
    /// The video was uploaded
    Delivered,
    /// Bad input or a policy limit; the user has been told why
    Rejected(RelayError),
    /// Download, upload or internal failure; the user has been told
    Failed(RelayError),
}

/// Pipeline stage, for logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Validating,
    Downloading,
    SizeChecking,
    Uploading,
    Cleaning,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Downloading => "downloading",
            Self::SizeChecking => "size_checking",
            Self::Uploading => "uploading",
            Self::Cleaning => "cleaning",
        };
        f.write_str(name)
    }
}

/// Relay the video behind `text` to the chat behind `transport`.
///
/// Errors never escape: each one is reported to the user and logged, and
/// shows up in the returned [`RelayOutcome`].
pub async fn relay_video<T>(
    transport: &T,
    downloader: Arc<dyn VideoDownloader>,
    settings: &Settings,
    text: &str,
) -> RelayOutcome
where
    T: ChatTransport + ?Sized,
{
    let input = text.trim();

    let url = match validate_url(input) {
        Ok(url) => url,
        Err(e) => {
            info!(input = %input, stage = %Stage::Validating, error = %e, "Link rejected");
            if let Err(send_err) = transport
                .send_text(&views::rejection_message(&e), true)
                .await
            {
                warn!(error = %send_err, "Failed to send rejection message");
            }
            return RelayOutcome::Rejected(e);
        }
    };

    let ack = match transport.send_text(views::DOWNLOADING, false).await {
        Ok(id) => id,
        Err(e) => {
            error!(url = %url, error = %e, "Failed to send acknowledgement");
            return RelayOutcome::Failed(RelayError::Unexpected(e.to_string()));
        }
    };

    let outcome = deliver(transport, downloader, settings, &url, ack).await;
    debug!(url = %url, outcome = ?outcome, "Relay finished");
    outcome
}

async fn deliver<T>(
    transport: &T,
    downloader: Arc<dyn VideoDownloader>,
    settings: &Settings,
    url: &Url,
    ack: MessageId,
) -> RelayOutcome
where
    T: ChatTransport + ?Sized,
{
    info!(url = %url, stage = %Stage::Downloading, "Starting download");
    let task_url = url.clone();
    let joined = tokio::task::spawn_blocking(move || downloader.download(&task_url)).await;

    let DownloadResult { artifact, title } = match joined {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => return fail(transport, ack, url, Stage::Downloading, e).await,
        Err(join_err) => {
            return fail(transport, ack, url, Stage::Downloading, join_err.into()).await
        }
    };

    let artifact = match enforce_size_limit(artifact, settings.max_file_size_mb).await {
        Ok(artifact) => artifact,
        Err(RelayError::TooLarge { size_mb }) => {
            info!(url = %url, stage = %Stage::SizeChecking, size_mb = size_mb, "Video over upload limit");
            edit_progress(
                transport,
                ack,
                &views::too_large_message(size_mb, settings.max_file_size_mb),
            )
            .await;
            return RelayOutcome::Rejected(RelayError::TooLarge { size_mb });
        }
        Err(e) => return fail(transport, ack, url, Stage::SizeChecking, e).await,
    };

    edit_progress(transport, ack, views::SENDING).await;
    let file_name = views::video_file_name(&title);
    info!(url = %url, stage = %Stage::Uploading, title = %title, "Uploading video");
    let upload = transport.send_video(artifact.file_path(), &file_name).await;

    debug!(url = %url, stage = %Stage::Cleaning, dir = %artifact.dir_path().display(), "Removing temp artifact");
    artifact.discard();

    if let Err(e) = upload {
        let err = RelayError::Unexpected(format!("Не удалось отправить видео: {e}"));
        return fail(transport, ack, url, Stage::Uploading, err).await;
    }

    if let Err(e) = transport.delete_message(ack).await {
        warn!(url = %url, error = %e, "Failed to delete progress message");
    }
    info!(url = %url, title = %title, "Video delivered");
    RelayOutcome::Delivered
}

async fn fail<T>(
    transport: &T,
    ack: MessageId,
    url: &Url,
    stage: Stage,
    err: RelayError,
) -> RelayOutcome
where
    T: ChatTransport + ?Sized,
{
    error!(url = %url, stage = %stage, error = ?err, "Relay failed");
    edit_progress(transport, ack, &views::error_message(&err)).await;
    RelayOutcome::Failed(err)
}

async fn edit_progress<T>(transport: &T, ack: MessageId, text: &str)
where
    T: ChatTransport + ?Sized,
{
    if let Err(e) = transport.edit_text(ack, text).await {
        warn!(error = %e, "Failed to edit progress message");
    }
}
