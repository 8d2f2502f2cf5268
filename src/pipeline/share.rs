//! Share hand-off: offer the saved schedule to other apps.
//!
//! Sharing is best-effort. If the platform has no share surface the
//! transaction still completes as [`ShareOutcome::SavedOnly`] and the saved
//! path is reported instead. A share surface that fails after opening is
//! logged and otherwise treated like a successful share.

use crate::error::ScheduleError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use tracing::{info, warn};

/// Platform share capability.
pub trait ShareCapability: Send + Sync {
    fn is_available(&self) -> bool;

    /// Present the share surface for `path`. Blocks for as long as the
    /// platform's hand-off call does; some return when it is dismissed,
    /// others as soon as it is shown.
    fn present(&self, path: &Path) -> std::io::Result<()>;
}

/// How a completed transaction was handed to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ShareOutcome {
    /// The share surface was presented for `path`.
    Shared { path: PathBuf },
    /// No share surface; the file is at `path`.
    SavedOnly { path: PathBuf },
}

impl ShareOutcome {
    pub fn path(&self) -> &Path {
        match self {
            ShareOutcome::Shared { path } | ShareOutcome::SavedOnly { path } => path,
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, ShareOutcome::Shared { .. })
    }
}

/// Offer the file at `path` through `share`.
pub async fn offer(share: Arc<dyn ShareCapability>, path: PathBuf) -> ShareOutcome {
    if !share.is_available() {
        info!("Sharing unavailable; schedule saved at {}", path.display());
        return ShareOutcome::SavedOnly { path };
    }

    let target = path.clone();
    let presented = tokio::task::spawn_blocking(move || share.present(&target))
        .await
        .map_err(|e| ScheduleError::Internal(format!("share task failed: {e}")));
    match presented {
        Ok(Ok(())) => info!("Share surface presented for {}", path.display()),
        Ok(Err(e)) => warn!("Share failed for {}: {e}", path.display()),
        Err(e) => warn!("{e}"),
    }
    ShareOutcome::Shared { path }
}

/// A platform without a share surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl ShareCapability for Unavailable {
    fn is_available(&self) -> bool {
        false
    }

    fn present(&self, _path: &Path) -> std::io::Result<()> {
        Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "sharing is not available",
        ))
    }
}

/// Desktop hand-off: open the file with the system's default handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl SystemOpener {
    fn command(path: &Path) -> Command {
        let mut cmd = if cfg!(target_os = "macos") {
            Command::new("open")
        } else if cfg!(target_os = "windows") {
            let mut start = Command::new("cmd");
            start.args(["/C", "start", ""]);
            start
        } else {
            Command::new("xdg-open")
        };
        cmd.arg(path);
        cmd
    }
}

impl ShareCapability for SystemOpener {
    fn is_available(&self) -> bool {
        cfg!(any(target_os = "macos", target_os = "windows", target_os = "linux"))
    }

    /// Returns once the opener has launched the default handler, not when
    /// the user closes the file.
    fn present(&self, path: &Path) -> std::io::Result<()> {
        let status = Self::command(path).status()?;
        if status.success() {
            Ok(())
        } else {
            Err(std::io::Error::other(format!("opener exited with {status}")))
        }
    }
}
