// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader: open and inspect source documents using the `lopdf` crate.
// Sources are never modified; every tool output is assembled into a fresh
// document by `PdfAssembler`.

use std::path::Path;

use lopdf::{Document, ObjectId};
use toolverse_core::error::ToolverseError;
use tracing::{debug, info, instrument};

/// A loaded, read-only source PDF.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
    /// Display name (upload file name or path), used for diagnostics.
    name: Option<String>,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ToolverseError> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            ToolverseError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self {
            document,
            name: Some(path_ref.display().to_string()),
        })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, ToolverseError> {
        let document = Document::load_mem(data).map_err(|err| {
            ToolverseError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            name: None,
        })
    }

    /// Like [`PdfReader::from_bytes`], remembering the upload's file name.
    pub fn from_named_bytes(name: &str, data: &[u8]) -> Result<Self, ToolverseError> {
        let mut reader = Self::from_bytes(data).map_err(|err| match err {
            ToolverseError::PdfError(detail) => {
                ToolverseError::PdfError(format!("{name}: {detail}"))
            }
            other => other,
        })?;
        reader.name = Some(name.to_string());
        Ok(reader)
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Page object ids in page-tree order (index 0 is page 1).
    pub fn page_ids(&self) -> Vec<ObjectId> {
        // get_pages() is a BTreeMap keyed by 1-based page number.
        self.document.get_pages().into_values().collect()
    }

    /// Page object id for a zero-based page index.
    pub fn page_id(&self, index: usize) -> Result<ObjectId, ToolverseError> {
        let count = self.page_count();
        self.page_ids().get(index).copied().ok_or_else(|| {
            ToolverseError::InvalidPageSelection(format!(
                "page {} out of range (document has {} pages)",
                index + 1,
                count
            ))
        })
    }

    /// Upload name or path, if known.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Borrow the underlying document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
