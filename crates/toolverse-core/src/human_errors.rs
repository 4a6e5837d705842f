// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every technical error is mapped to a plain sentence the page can show as an
// inline message or toast, plus a suggestion. Nothing is retried
// automatically; the user re-triggers the action.

use crate::error::ToolverseError;
use crate::types::ErrorClass;

/// A human-readable error with a plain message and an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain summary (shown as the notification text).
    pub message: String,
    /// What the user should try next.
    pub suggestion: String,
    /// User input error or processing failure.
    pub class: ErrorClass,
}

/// Convert a `ToolverseError` into a `HumanError`.
pub fn humanize_error(err: &ToolverseError) -> HumanError {
    let class = err.class();
    let (message, suggestion) = match err {
        ToolverseError::MissingField(field) => (
            format!("Required input is missing: {field}."),
            "Fill in every field and try again.".to_string(),
        ),
        ToolverseError::NoFiles => (
            "No files were uploaded.".to_string(),
            "Choose at least one file, then try again.".to_string(),
        ),
        ToolverseError::InvalidInput(detail) => (
            format!("The input isn't valid: {detail}."),
            "Check the values you entered and try again.".to_string(),
        ),
        ToolverseError::InvalidPageSelection(detail) => (
            format!("The page selection isn't valid: {detail}."),
            "Use page numbers that exist in the document, like 1-3, 5.".to_string(),
        ),
        ToolverseError::NoPagesSelected => (
            "No pages were selected.".to_string(),
            "Enter a page range such as 1-3, 5 that matches the document.".to_string(),
        ),
        ToolverseError::UnsupportedFormat(detail) => (
            format!("This file format isn't supported ({detail})."),
            "Try saving the file as JPEG, PNG or PDF first.".to_string(),
        ),
        ToolverseError::PdfError(_) => (
            "The PDF could not be processed.".to_string(),
            "The file may be damaged or password protected. Try a different file.".to_string(),
        ),
        ToolverseError::ImageError(_) => (
            "The image could not be processed.".to_string(),
            "The image may be damaged. Try saving it as JPEG or PNG first.".to_string(),
        ),
        ToolverseError::RenderError(_) => (
            "The PDF pages could not be previewed.".to_string(),
            "Try a different file.".to_string(),
        ),
        ToolverseError::ArchiveError(_) => (
            "The download bundle could not be created.".to_string(),
            "Try again with fewer files.".to_string(),
        ),
        ToolverseError::Config(_) => (
            "The service is misconfigured.".to_string(),
            "Check the configuration file.".to_string(),
        ),
        ToolverseError::Io(_) | ToolverseError::Serialization(_) => (
            "Something went wrong while processing the request.".to_string(),
            "Try again.".to_string(),
        ),
    };

    HumanError {
        message,
        suggestion,
        class,
    }
}
