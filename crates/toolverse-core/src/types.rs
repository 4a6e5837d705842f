// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Toolverse utilities.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_ZIP: &str = "application/zip";
pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_PNG: &str = "image/png";
pub const MIME_WEBP: &str = "image/webp";
pub const MIME_ICO: &str = "image/x-icon";
pub const MIME_JSON: &str = "application/json";
pub const MIME_OCTET_STREAM: &str = "application/octet-stream";

/// Unique identifier for an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(pub Uuid);

impl FileId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Two-valued error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Missing file, empty selection, bad page range, unsupported format.
    UserInput,
    /// The underlying library failed.
    Processing,
}

/// A file supplied by the user, held in memory for one action.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub id: FileId,
    pub name: String,
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            id: FileId::new(),
            name: name.into(),
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// File name without its last extension (`report.v2.pdf` -> `report.v2`).
    pub fn stem(&self) -> &str {
        file_stem(&self.name)
    }

    /// Lower-cased last extension, if any.
    pub fn extension(&self) -> Option<String> {
        let stem = self.stem();
        if stem.len() == self.name.len() {
            return None;
        }
        Some(self.name[stem.len() + 1..].to_ascii_lowercase())
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type == MIME_PDF
            || (self.mime_type == MIME_OCTET_STREAM && self.extension().as_deref() == Some("pdf"))
    }
}

/// Strip the last `.ext` from a file name. A leading dot or a dot inside a
/// directory component does not count as an extension separator.
pub fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot > 0 && !name[dot + 1..].contains('/') && dot + 1 < name.len() => {
            &name[..dot]
        }
        _ => name,
    }
}

/// The binary output of one transformation, offered for download.
#[derive(Debug, Clone)]
pub struct GeneratedArtifact {
    pub bytes: Vec<u8>,
    pub suggested_filename: String,
    pub mime_type: String,
}

impl GeneratedArtifact {
    pub fn new(
        bytes: Vec<u8>,
        suggested_filename: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            bytes,
            suggested_filename: suggested_filename.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn pdf(bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self::new(bytes, filename, MIME_PDF)
    }

    pub fn zip(bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self::new(bytes, filename, MIME_ZIP)
    }
}

/// A rendered preview of one PDF page.
#[derive(Debug, Clone, Serialize)]
pub struct PageThumbnail {
    pub source_file_id: FileId,
    /// Zero-based index of the page in its source document.
    pub page_index: usize,
    /// Encoded JPEG bytes.
    #[serde(skip)]
    pub rendered_image: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Current position in the user's ordering.
    pub order: usize,
}

/// Timestamp used in archive names: UTC ISO-8601 with `-`, `:` and `.`
/// removed (`20261018T093005123Z`).
pub fn compact_iso_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%dT%H%M%S%3fZ").to_string()
}

/// Timestamp used in merge/split names: local `YYYYMMDD_HHMMSS`.
pub fn local_timestamp(now: DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}
