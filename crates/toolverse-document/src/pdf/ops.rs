// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF tool operations: merge, reorder, extract and split.
//
// Each operation reads its sources and returns freshly serialised PDF bytes
// built by `PdfAssembler`. Page numbers from the UI are 1-based; everything
// here works on zero-based indices.

use toolverse_core::error::ToolverseError;
use tracing::{info, instrument};

use crate::pdf::assemble::PdfAssembler;
use crate::pdf::range::parse_page_ranges;
use crate::pdf::reader::PdfReader;

/// Which pages the split tool turns into separate files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitMode {
    /// Every page.
    All,
    /// Pages named by a range string such as `"1-3, 5"`.
    Range(String),
}

/// One single-page document produced by [`split`].
#[derive(Debug, Clone)]
pub struct SplitPart {
    /// `{stem}_page_{n}.pdf` with a 1-based page number.
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Concatenate whole documents in the given order.
#[instrument(skip_all, fields(documents = documents.len()))]
pub fn merge(documents: &[PdfReader]) -> Result<Vec<u8>, ToolverseError> {
    if documents.is_empty() {
        return Err(ToolverseError::NoFiles);
    }

    let mut assembler = PdfAssembler::new();
    for document in documents {
        assembler.append_document(document)?;
    }

    info!(pages = assembler.page_count(), "Merging PDFs");
    assembler.finish()
}

/// Rebuild `document` with pages in `order` (zero-based). Pages left out are
/// dropped, repeated pages are duplicated.
#[instrument(skip_all, fields(pages = order.len()))]
pub fn reorder(document: &PdfReader, order: &[usize]) -> Result<Vec<u8>, ToolverseError> {
    if order.is_empty() {
        return Err(ToolverseError::NoPagesSelected);
    }
    extract_pages(document, order)
}

/// A new document holding the pages at `indices`, in that order.
pub fn extract_pages(document: &PdfReader, indices: &[usize]) -> Result<Vec<u8>, ToolverseError> {
    let mut assembler = PdfAssembler::new();
    assembler.append_pages(document, indices)?;
    assembler.finish()
}

/// One single-page PDF per selected page.
///
/// `file_name` is the upload's name; a trailing `.pdf` (any case) is removed
/// to form the part names.
#[instrument(skip(document), fields(pages = document.page_count()))]
pub fn split(
    document: &PdfReader,
    file_name: &str,
    mode: &SplitMode,
) -> Result<Vec<SplitPart>, ToolverseError> {
    let page_count = document.page_count();
    let indices: Vec<usize> = match mode {
        SplitMode::All => (0..page_count).collect(),
        SplitMode::Range(range) => parse_page_ranges(range, page_count),
    };
    if indices.is_empty() {
        return Err(ToolverseError::NoPagesSelected);
    }

    let stem = strip_pdf_extension(file_name);
    let mut parts = Vec::with_capacity(indices.len());
    for index in indices {
        let bytes = extract_pages(document, &[index])?;
        parts.push(SplitPart {
            filename: format!("{}_page_{}.pdf", stem, index + 1),
            bytes,
        });
    }

    info!(parts = parts.len(), "PDF split");
    Ok(parts)
}

/// `Report.PDF` -> `Report`; names without the extension are kept whole.
pub fn strip_pdf_extension(name: &str) -> &str {
    let len = name.len();
    if len >= 4 && name.is_char_boundary(len - 4) && name[len - 4..].eq_ignore_ascii_case(".pdf") {
        &name[..len - 4]
    } else {
        name
    }
}
