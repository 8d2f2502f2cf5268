//! Observer trait for presentation-layer updates.
//!
//! Inject an [`Arc<dyn WorkflowObserver>`] via
//! [`crate::workflow::WorkflowControllerBuilder::observer`] to re-render
//! whenever the controller's visible state changes and to show the notices
//! a transaction produces.
//!
//! # Example
//!
//! ```rust
//! use schedule_gen::{Notice, WorkflowObserver, WorkflowSnapshot};
//!
//! struct Printer;
//!
//! impl WorkflowObserver for Printer {
//!     fn on_state_change(&self, snapshot: &WorkflowSnapshot) {
//!         eprintln!("state: {:?} (in flight: {})", snapshot.state, snapshot.in_flight);
//!     }
//!
//!     fn on_notice(&self, notice: &Notice) {
//!         eprintln!("{}", notice.message());
//!     }
//! }
//! ```

use crate::error::{ErrorKind, ScheduleError};
use crate::pipeline::share::ShareOutcome;
use crate::workflow::WorkflowSnapshot;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Step of a running transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Uploading,
    Saving,
    Sharing,
}

/// A user-visible message produced by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notice {
    /// A transaction or pick failed; `message` is the error text verbatim.
    Error { kind: ErrorKind, message: String },
    /// A transaction completed.
    Completed(ShareOutcome),
}

impl Notice {
    pub fn from_error(err: &ScheduleError) -> Self {
        Notice::Error {
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    /// Short human-readable text for a toast or alert.
    pub fn message(&self) -> String {
        match self {
            Notice::Error { message, .. } => message.clone(),
            Notice::Completed(ShareOutcome::Shared { path }) => {
                format!("Schedule shared from {}", path.display())
            }
            Notice::Completed(ShareOutcome::SavedOnly { path }) => {
                format!("Schedule saved to {}", path.display())
            }
        }
    }
}

/// Called by the controller after each mutation and for each notice.
///
/// All methods default to no-ops. Callbacks run outside the controller's
/// state lock, so implementations may call back into
/// [`crate::WorkflowController::snapshot`].
pub trait WorkflowObserver: Send + Sync {
    /// Called after any change to the controller's visible state.
    fn on_state_change(&self, snapshot: &WorkflowSnapshot) {
        let _ = snapshot;
    }

    /// Called when a submitted transaction moves to a new step.
    fn on_stage(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called for every user-visible message.
    fn on_notice(&self, notice: &Notice) {
        let _ = notice;
    }
}

/// An observer that ignores everything. The default.
pub struct NoopObserver;

impl WorkflowObserver for NoopObserver {}

/// Convenience alias matching the type held by the controller.
pub type SharedObserver = Arc<dyn WorkflowObserver>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn error_notice_is_verbatim() {
        let err = ScheduleError::Server {
            status: 500,
            body: "invalid sheet".into(),
        };
        let notice = Notice::from_error(&err);
        assert_eq!(notice.message(), err.to_string());
        assert!(matches!(
            notice,
            Notice::Error {
                kind: ErrorKind::Server,
                ..
            }
        ));
    }

    #[test]
    fn completion_messages_name_the_path() {
        let saved = Notice::Completed(ShareOutcome::SavedOnly {
            path: PathBuf::from("/docs/Fall2024.xlsx"),
        });
        assert!(saved.message().contains("/docs/Fall2024.xlsx"));
        assert!(saved.message().starts_with("Schedule saved"));
    }

    #[test]
    fn noop_observer_does_not_panic() {
        let obs: SharedObserver = Arc::new(NoopObserver);
        obs.on_stage(Stage::Uploading);
        obs.on_notice(&Notice::from_error(&ScheduleError::NoFileSelected));
    }
}
