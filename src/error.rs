//! Error types for the schedule-gen library.
//!
//! Every failure in a generation transaction is terminal: nothing is retried
//! internally, and the controller clears its in-flight flag before the error
//! reaches the caller. [`ScheduleError`] therefore carries everything needed
//! to build a user-facing notice, and [`ErrorKind`] gives the presentation
//! layer a coarse class to pick an icon or colour from.
//!
//! Share failures never appear here. Sharing is best-effort and a failed
//! hand-off is reported as success by [`crate::pipeline::share`].

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the schedule-gen library.
#[derive(Debug, Error)]
pub enum ScheduleError {
    // ── Selection errors ──────────────────────────────────────────────────
    /// The platform file picker failed (permissions, I/O, wrong file type).
    #[error("Could not pick a file: {reason}")]
    Picker { reason: String },

    /// Submit was pressed with no file selected.
    #[error("No file selected.\nPick a spreadsheet before generating a schedule.")]
    NoFileSelected,

    /// Submit was pressed while another transaction was still in flight.
    #[error("A schedule is already being generated; wait for it to finish.")]
    Busy,

    /// The selected file could not be read when building the upload.
    #[error("Could not read selected file '{path}': {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Transfer errors ───────────────────────────────────────────────────
    /// The service could not be reached (DNS, refused, TLS, malformed response).
    #[error("Network error contacting '{url}': {reason}\nCheck your connection and the service URL.")]
    Network { url: String, reason: String },

    /// The request exceeded the configured timeout.
    #[error("Request to '{url}' timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    /// The service answered with a non-2xx status.
    ///
    /// `body` is the response text kept verbatim; see
    /// [`ScheduleError::server_detail`] for a terser rendering.
    #[error("Server returned HTTP {status}: {body}")]
    Server { status: u16, body: String },

    // ── Persistence errors ────────────────────────────────────────────────
    /// The document storage root is unavailable.
    #[error("Document storage is unavailable on this device")]
    StorageUnavailable,

    /// Writing the generated spreadsheet failed.
    #[error("Failed to save schedule to '{path}': {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (e.g. a blocking task panicked).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`ScheduleError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Picker,
    Validation,
    Busy,
    Network,
    Server,
    Persistence,
    Config,
    Internal,
}

impl ScheduleError {
    /// The taxonomy class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScheduleError::Picker { .. } => ErrorKind::Picker,
            ScheduleError::NoFileSelected => ErrorKind::Validation,
            ScheduleError::Busy => ErrorKind::Busy,
            ScheduleError::SourceUnavailable { .. } => ErrorKind::Picker,
            ScheduleError::Network { .. } | ScheduleError::Timeout { .. } => ErrorKind::Network,
            ScheduleError::Server { .. } => ErrorKind::Server,
            ScheduleError::StorageUnavailable | ScheduleError::Persistence { .. } => {
                ErrorKind::Persistence
            }
            ScheduleError::InvalidConfig(_) => ErrorKind::Config,
            ScheduleError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Extract the service's own diagnostic from a [`ScheduleError::Server`] body.
    ///
    /// The service answers failures as `{"error": "...", "details": "..."}`.
    /// Returns `"error: details"` (or just `error`) when the body has that
    /// shape, the trimmed raw body otherwise, and `None` for non-server errors.
    pub fn server_detail(&self) -> Option<String> {
        let ScheduleError::Server { body, .. } = self else {
            return None;
        };

        let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
        let field = |name: &str| {
            parsed
                .as_ref()
                .and_then(|v| v.get(name))
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };

        match (field("error"), field("details")) {
            (Some(e), Some(d)) => Some(format!("{e}: {d}")),
            (Some(e), None) => Some(e),
            _ => Some(body.trim().to_string()),
        }
    }
}
