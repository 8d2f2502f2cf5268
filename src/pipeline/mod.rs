//! Pipeline stages for one schedule-generation transaction.
//!
//! Each submodule implements exactly one step and owns the platform
//! capability trait it depends on, so a mobile shell, a desktop shell and
//! the test suite can each plug in their own picker, storage and share
//! surfaces without touching the controller.
//!
//! ## Data Flow
//!
//! ```text
//! picker ──▶ request ──▶ transfer ──▶ materialize ──▶ share
//! (select)   (multipart)  (HTTP POST)  (write .xlsx)   (hand-off)
//! ```
//!
//! 1. [`picker`]: ask the platform for a spreadsheet; `None` on cancel
//! 2. [`request`]: resolve the endpoint and normalise the output name (pure)
//! 3. [`transfer`]: the only stage with network I/O; classifies outcomes
//! 4. [`materialize`]: base64 the payload and write it under document storage
//! 5. [`share`]: best-effort share sheet, or report the saved path

pub mod materialize;
pub mod picker;
pub mod request;
pub mod share;
pub mod transfer;
