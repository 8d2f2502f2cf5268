//! Materialisation: persist a generated spreadsheet under document storage.
//!
//! Mobile storage APIs commonly accept only text, so the payload crosses the
//! [`DocumentStorage`] boundary as standard base64 and the storage side
//! decodes it. The observable result is the same as a direct binary write:
//! a file whose bytes are identical to the response body.
//!
//! An existing file at the target path is silently overwritten. The written
//! file belongs to the caller from then on; nothing here ever deletes it.

use crate::error::ScheduleError;
use crate::pipeline::transfer::SuccessPayload;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Platform document-storage capability.
pub trait DocumentStorage: Send + Sync {
    /// Root directory for user documents, or `None` if unavailable.
    fn root(&self) -> Option<PathBuf>;

    /// Write base64-encoded `contents` to `path`, replacing any existing file.
    fn write_encoded(&self, path: &Path, contents: &str) -> std::io::Result<()>;
}

/// Write `payload` to `<storage root>/<filename>` and return the path.
///
/// Only the final component of `filename` is used, so a name can never
/// point outside the storage root.
pub async fn materialize(
    storage: Arc<dyn DocumentStorage>,
    payload: &SuccessPayload,
    filename: &str,
) -> Result<PathBuf, ScheduleError> {
    let root = storage.root().ok_or(ScheduleError::StorageUnavailable)?;
    let name = Path::new(filename)
        .file_name()
        .ok_or_else(|| ScheduleError::Persistence {
            path: root.join(filename),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "output name has no file component",
            ),
        })?;
    let path = root.join(name);

    let encoded = STANDARD.encode(payload.as_bytes());
    debug!(
        "Encoded {} byte payload → {} chars base64",
        payload.len(),
        encoded.len()
    );

    let target = path.clone();
    tokio::task::spawn_blocking(move || storage.write_encoded(&target, &encoded))
        .await
        .map_err(|e| ScheduleError::Internal(format!("storage task failed: {e}")))?
        .map_err(|e| ScheduleError::Persistence {
            path: path.clone(),
            source: e,
        })?;

    info!("Saved schedule to {}", path.display());
    Ok(path)
}

/// File-system [`DocumentStorage`] rooted at a directory.
#[derive(Debug, Clone)]
pub struct FsDocumentStorage {
    root: Option<PathBuf>,
}

impl FsDocumentStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Rooted at the user's document directory, if the platform has one.
    pub fn documents() -> Self {
        Self {
            root: dirs::document_dir(),
        }
    }
}

impl DocumentStorage for FsDocumentStorage {
    fn root(&self) -> Option<PathBuf> {
        self.root.clone()
    }

    /// Decodes, then writes atomically: temp file in the target directory,
    /// then persisted over `path`.
    fn write_encoded(&self, path: &Path, contents: &str) -> std::io::Result<()> {
        let bytes = STANDARD
            .decode(contents)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}
