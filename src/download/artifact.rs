use crate::config::TEMP_DIR_PREFIX;
use crate::error::RelayError;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// A downloaded file together with the temporary directory holding it.
///
/// The directory is removed by [`TempArtifact::cleanup`], or when the
/// artifact is dropped, whichever comes first.
#[derive(Debug)]
pub struct TempArtifact {
    dir: Option<TempDir>,
    dir_path: PathBuf,
    file: PathBuf,
}

impl TempArtifact {
    /// Create a fresh, uniquely named directory under the system temp root.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn create_dir() -> io::Result<TempDir> {
        tempfile::Builder::new().prefix(TEMP_DIR_PREFIX).tempdir()
    }

    /// Take ownership of `dir` and the file inside it.
    #[must_use]
    pub fn new(dir: TempDir, file: PathBuf) -> Self {
        Self {
            dir_path: dir.path().to_path_buf(),
            dir: Some(dir),
            file,
        }
    }

    /// Path of the downloaded file
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file
    }

    /// Path of the directory holding the file
    #[must_use]
    pub fn dir_path(&self) -> &Path {
        &self.dir_path
    }

    /// Delete the file and its directory. Calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be removed.
    pub fn cleanup(&mut self) -> io::Result<()> {
        let Some(dir) = self.dir.take() else {
            return Ok(());
        };
        match dir.close() {
            Ok(()) => {
                debug!(dir = %self.dir_path.display(), "Temp artifact removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Like [`TempArtifact::cleanup`], but logs instead of failing.
    pub fn discard(mut self) {
        if let Err(e) = self.cleanup() {
            warn!(dir = %self.dir_path.display(), error = %e, "Failed to remove temp artifact");
        }
    }
}

/// Size of the file at `path` in megabytes (1 MB = 1024² bytes).
///
/// # Errors
///
/// Returns an error if the file metadata cannot be read.
#[allow(clippy::cast_precision_loss)]
pub async fn file_size_mb(path: &Path) -> io::Result<f64> {
    let meta = tokio::fs::metadata(path).await?;
    Ok(meta.len() as f64 / BYTES_PER_MB)
}

/// Let the artifact through if its file fits in `max_mb`.
///
/// Oversized artifacts are deleted before returning, so the caller has
/// nothing left to clean up on the error path.
///
/// # Errors
///
/// - [`RelayError::TooLarge`] with the measured size if the file is too big.
/// - [`RelayError::Unexpected`] if the size cannot be read.
pub async fn enforce_size_limit(
    artifact: TempArtifact,
    max_mb: f64,
) -> Result<TempArtifact, RelayError> {
    let measured = file_size_mb(artifact.file_path()).await;
    let size_mb = match measured {
        Ok(size) => size,
        Err(e) => {
            artifact.discard();
            return Err(e.into());
        }
    };

    if size_mb > max_mb {
        info!(size_mb = size_mb, max_mb = max_mb, "File exceeds upload limit, discarding");
        artifact.discard();
        return Err(RelayError::TooLarge { size_mb });
    }

    debug!(size_mb = size_mb, "File fits upload limit");
    Ok(artifact)
}
