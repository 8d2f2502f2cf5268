//! File selection: ask the platform for a spreadsheet.
//!
//! The picker itself is a platform capability ([`FilePicker`]). On mobile it
//! is the native document picker; the CLI uses [`PathPicker`], which "picks"
//! a path handed over on the command line. Either way the picked file stays
//! owned by the platform; we only keep a read-only reference to it.

use crate::error::ScheduleError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// MIME type for `.xlsx` workbooks, also the upload default.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// MIME type for legacy `.xls` workbooks.
pub const XLS_MIME: &str = "application/vnd.ms-excel";

/// Content types the picker is restricted to.
pub const SPREADSHEET_MIME_TYPES: &[&str] = &[XLSX_MIME, XLS_MIME];

/// A user-chosen local file.
///
/// Replaced wholesale on every successful pick, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFile {
    /// Local resource locator; read-only for the duration of a transaction.
    pub uri: PathBuf,
    /// Name shown to the user and sent as the upload's original filename.
    pub display_name: String,
    /// Content type reported by the platform, if any.
    pub mime_type: Option<String>,
}

/// Platform file-picker capability.
///
/// `pick` may block on user interaction; callers run it off the async
/// executor via [`pick_file`].
pub trait FilePicker: Send + Sync {
    /// Present the picker restricted to `accept`.
    ///
    /// Returns `Ok(None)` when the user cancels.
    fn pick(&self, accept: &[&str]) -> Result<Option<SelectedFile>, ScheduleError>;
}

/// Invoke `picker` restricted to spreadsheet content types.
pub async fn pick_file(picker: Arc<dyn FilePicker>) -> Result<Option<SelectedFile>, ScheduleError> {
    let picked = tokio::task::spawn_blocking(move || picker.pick(SPREADSHEET_MIME_TYPES))
        .await
        .map_err(|e| ScheduleError::Internal(format!("picker task failed: {e}")))??;

    match &picked {
        Some(file) => info!("Picked '{}' ({})", file.display_name, file.uri.display()),
        None => debug!("File selection cancelled"),
    }
    Ok(picked)
}

/// A picker backed by a path chosen ahead of time, as on a command line.
///
/// `None` behaves like a user cancelling the dialog.
#[derive(Debug, Clone, Default)]
pub struct PathPicker {
    path: Option<PathBuf>,
}

impl PathPicker {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl FilePicker for PathPicker {
    fn pick(&self, accept: &[&str]) -> Result<Option<SelectedFile>, ScheduleError> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        select_path(path, accept).map(Some)
    }
}

fn select_path(path: &Path, accept: &[&str]) -> Result<SelectedFile, ScheduleError> {
    let meta = std::fs::metadata(path).map_err(|e| ScheduleError::Picker {
        reason: format!("'{}': {e}", path.display()),
    })?;
    if !meta.is_file() {
        return Err(ScheduleError::Picker {
            reason: format!("'{}' is not a file", path.display()),
        });
    }

    let mime = mime_guess::from_path(path).first_raw();
    if !mime.is_some_and(|m| accept.contains(&m)) {
        return Err(ScheduleError::Picker {
            reason: format!("'{}' is not a spreadsheet (.xlsx or .xls)", path.display()),
        });
    }

    let display_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(SelectedFile {
        uri: path.to_path_buf(),
        display_name,
        mime_type: mime.map(str::to_string),
    })
}
