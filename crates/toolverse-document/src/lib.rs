// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// toolverse-document: File processing for the Toolverse tools.
//
// Provides PDF operations (page-range parsing, merge, split, reorder, page
// thumbnails), image processing (compression, format conversion, resizing,
// favicon packaging, palette extraction) and ZIP bundling of artifacts.

pub mod archive;
pub mod image;
pub mod pdf;

// Re-export the primary structs so callers can use `toolverse_document::PdfReader` etc.
pub use archive::ZipBundle;
pub use crate::image::{ImageProcessor, OutputFormat};
pub use pdf::assemble::PdfAssembler;
pub use pdf::board::{MergeQueue, PageBoard};
pub use pdf::reader::PdfReader;

#[cfg(feature = "render")]
pub use pdf::thumbnail::ThumbnailRenderer;
