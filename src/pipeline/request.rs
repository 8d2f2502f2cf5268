//! Request construction: endpoint resolution and output-name normalisation.
//!
//! Everything here is a pure function of its inputs. The multipart body is
//! described, not materialised: [`UploadRequest`] names the file to stream
//! and the text field to send, and [`crate::pipeline::transfer`] does the
//! actual reading when the request goes out.

use crate::config::ClientConfig;
use crate::pipeline::picker::{SelectedFile, XLSX_MIME};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Extension appended to output names that lack it.
pub const SPREADSHEET_EXTENSION: &str = ".xlsx";

/// Multipart field carrying the uploaded workbook.
pub const FILE_FIELD: &str = "file";

/// Multipart field carrying the normalised output name.
pub const FILENAME_FIELD: &str = "filename";

/// Which schedule layout the service should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// One row per room, cells list teacher / subject / group. (default)
    #[default]
    Room,
    /// One row per teacher, cells list room / subject / group.
    Teacher,
}

impl ViewMode {
    /// Server route for this mode.
    pub fn path(self) -> &'static str {
        match self {
            ViewMode::Room => "/api/schedule/room",
            ViewMode::Teacher => "/api/schedule/teacher",
        }
    }

    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Room => ViewMode::Teacher,
            ViewMode::Teacher => ViewMode::Room,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Room => f.write_str("room"),
            ViewMode::Teacher => f.write_str("teacher"),
        }
    }
}

/// The file part of the multipart body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePart {
    /// Where to read the binary content from.
    pub source: PathBuf,
    /// Original filename reported to the server.
    pub file_name: String,
    /// Content type; [`XLSX_MIME`] when the picker reported none.
    pub mime_type: String,
}

/// A fully resolved upload: target URL plus a description of the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRequest {
    pub url: String,
    pub file: FilePart,
    /// Value of the `filename` text field.
    pub output_name: String,
}

/// Append [`SPREADSHEET_EXTENSION`] unless `name` already ends with it.
///
/// An empty name becomes `".xlsx"`; callers accept that rather than
/// rejecting it.
pub fn normalize_output_name(name: &str) -> String {
    if name.ends_with(SPREADSHEET_EXTENSION) {
        name.to_string()
    } else {
        format!("{name}{SPREADSHEET_EXTENSION}")
    }
}

/// Build the upload for `file` targeting `mode`'s endpoint.
pub fn build_request(
    config: &ClientConfig,
    file: &SelectedFile,
    mode: ViewMode,
    output_name: &str,
) -> UploadRequest {
    UploadRequest {
        url: format!("{}{}", config.base_url, mode.path()),
        file: FilePart {
            source: file.uri.clone(),
            file_name: file.display_name.clone(),
            mime_type: file
                .mime_type
                .clone()
                .unwrap_or_else(|| XLSX_MIME.to_string()),
        },
        output_name: normalize_output_name(output_name),
    }
}
