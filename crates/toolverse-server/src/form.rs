// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Multipart form collection. A request's parts are read in full before the
// handler runs; parts with a file name become `UploadedFile`s, the rest are
// text fields.

use axum::extract::Multipart;
use toolverse_core::error::ToolverseError;
use toolverse_core::types::{MIME_OCTET_STREAM, UploadedFile};
use tracing::debug;

use crate::error::ApiError;

#[derive(Debug, Default)]
pub struct FormData {
    files: Vec<(String, UploadedFile)>,
    fields: Vec<(String, String)>,
}

impl FormData {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            match file_name {
                Some(file_name) => {
                    let mime = field
                        .content_type()
                        .unwrap_or(MIME_OCTET_STREAM)
                        .to_string();
                    let bytes = field.bytes().await?;
                    debug!(field = %name, file = %file_name, %mime, bytes = bytes.len(), "file part");
                    form.files
                        .push((name, UploadedFile::new(file_name, bytes.to_vec(), mime)));
                }
                None => {
                    let value = field.text().await?;
                    form.fields.push((name, value));
                }
            }
        }

        Ok(form)
    }

    /// Files sent under `name` or `name[]`, in upload order.
    pub fn take_files(&mut self, name: &str) -> Vec<UploadedFile> {
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|(field, _)| matches_field(field, name));
        self.files = kept;
        taken.into_iter().map(|(_, file)| file).collect()
    }

    /// The first file sent under `name`.
    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        let position = self
            .files
            .iter()
            .position(|(field, _)| matches_field(field, name))?;
        Some(self.files.remove(position).1)
    }

    pub fn require_file(&mut self, name: &str) -> Result<UploadedFile, ToolverseError> {
        self.take_file(name).ok_or_else(|| ToolverseError::missing(name))
    }

    /// A text field, trimmed. Empty values count as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn require_text(&self, name: &str) -> Result<&str, ToolverseError> {
        self.text(name).ok_or_else(|| ToolverseError::missing(name))
    }

    /// An optional positive integer field.
    pub fn u32_field(&self, name: &str) -> Result<Option<u32>, ToolverseError> {
        self.text(name)
            .map(|raw| {
                raw.parse::<u32>().map_err(|_| {
                    ToolverseError::InvalidInput(format!("{name} must be a whole number, got {raw:?}"))
                })
            })
            .transpose()
    }

    /// A checkbox-style field: `true`/`on`/`1` or `false`/`off`/`0`.
    pub fn bool_field(&self, name: &str, default: bool) -> Result<bool, ToolverseError> {
        match self.text(name).map(str::to_ascii_lowercase).as_deref() {
            None => Ok(default),
            Some("true" | "on" | "1" | "yes") => Ok(true),
            Some("false" | "off" | "0" | "no") => Ok(false),
            Some(other) => Err(ToolverseError::InvalidInput(format!(
                "{name} must be true or false, got {other:?}"
            ))),
        }
    }
}

/// Browsers send repeated file inputs as `files[]`.
fn matches_field(field: &str, name: &str) -> bool {
    field == name || field.strip_suffix("[]") == Some(name)
}
