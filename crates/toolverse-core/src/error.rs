// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Toolverse.

use thiserror::Error;

use crate::types::ErrorClass;

/// Top-level error type for all Toolverse operations.
#[derive(Debug, Error)]
pub enum ToolverseError {
    // -- User input errors --
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("no files were uploaded")]
    NoFiles,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid page selection: {0}")]
    InvalidPageSelection(String),

    #[error("no pages selected")]
    NoPagesSelected,

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    // -- Processing failures --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("page rendering failed: {0}")]
    RenderError(String),

    #[error("archive creation failed: {0}")]
    ArchiveError(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ToolverseError {
    /// Which side of the two-valued taxonomy this error falls on.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::MissingField(_)
            | Self::NoFiles
            | Self::InvalidInput(_)
            | Self::InvalidPageSelection(_)
            | Self::NoPagesSelected
            | Self::UnsupportedFormat(_) => ErrorClass::UserInput,
            Self::PdfError(_)
            | Self::ImageError(_)
            | Self::RenderError(_)
            | Self::ArchiveError(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Serialization(_) => ErrorClass::Processing,
        }
    }

    /// Shorthand for the common "field not present in the form" case.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ToolverseError>;
