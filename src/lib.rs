//! # schedule-gen
//!
//! Client side of a timetable-to-schedule service: pick a class timetable
//! spreadsheet, upload it, and save the generated room or teacher schedule.
//!
//! ## Transaction Overview
//!
//! ```text
//! Generate
//!  │
//!  ├─ 1. Pick      platform picker, restricted to .xlsx / .xls
//!  ├─ 2. Build     endpoint for the view mode + normalised output name
//!  ├─ 3. Send      one multipart POST, no retries
//!  ├─ 4. Save      response bytes → <documents>/<name>.xlsx (overwrites)
//!  └─ 5. Share     share surface if the platform has one, else report path
//! ```
//!
//! Every step is driven by a [`WorkflowController`], which holds the
//! selection, view mode, output name and in-flight flag for one screen and
//! guarantees at most one transaction runs at a time.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use schedule_gen::{ClientConfig, PathPicker, ViewMode, WorkflowController};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .base_url("http://127.0.0.1:5001")
//!         .build()?;
//!     let controller = WorkflowController::builder(config)
//!         .picker(Arc::new(PathPicker::new(Some("Classes.xlsx".into()))))
//!         .build()?;
//!
//!     controller.pick_file().await?;
//!     controller.set_mode(ViewMode::Teacher);
//!     controller.set_output_name("Fall2024");
//!     let outcome = controller.submit().await?;
//!     println!("saved to {}", outcome.path().display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `schedule-gen` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod observer;
pub mod pipeline;
pub mod workflow;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_BASE_URL};
pub use error::{ErrorKind, ScheduleError};
pub use observer::{NoopObserver, Notice, SharedObserver, Stage, WorkflowObserver};
pub use pipeline::materialize::{materialize, DocumentStorage, FsDocumentStorage};
pub use pipeline::picker::{pick_file, FilePicker, PathPicker, SelectedFile};
pub use pipeline::request::{build_request, normalize_output_name, UploadRequest, ViewMode};
pub use pipeline::share::{offer, ShareCapability, ShareOutcome, SystemOpener, Unavailable};
pub use pipeline::transfer::{HttpTransferClient, SuccessPayload, Transport};
pub use workflow::{TransactionState, WorkflowController, WorkflowControllerBuilder, WorkflowSnapshot};
