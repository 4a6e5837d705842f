// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ZIP bundling for multi-file artifacts (compressed images, split pages,
// favicons, rendered pages).

use std::collections::HashSet;
use std::io::{Cursor, Write};

use toolverse_core::error::ToolverseError;
use toolverse_core::types::GeneratedArtifact;
use tracing::{debug, instrument};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// An in-memory ZIP archive under construction.
pub struct ZipBundle {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    names: HashSet<String>,
}

impl ZipBundle {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            names: HashSet::new(),
        }
    }

    /// Add a deflated entry. A name already in the archive gets a ` (n)`
    /// suffix before its extension, so same-named uploads do not collide.
    pub fn add(&mut self, name: &str, bytes: &[u8]) -> Result<(), ToolverseError> {
        let name = self.unique_name(name);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        self.writer
            .start_file(name.as_str(), options)
            .map_err(|err| ToolverseError::ArchiveError(format!("cannot add {name}: {err}")))?;
        self.writer
            .write_all(bytes)
            .map_err(|err| ToolverseError::ArchiveError(format!("cannot write {name}: {err}")))?;

        debug!(entry = %name, bytes = bytes.len(), "Archive entry added");
        self.names.insert(name);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Finish the archive and return its bytes.
    #[instrument(skip(self), fields(entries = self.names.len()))]
    pub fn finish(self) -> Result<Vec<u8>, ToolverseError> {
        let cursor = self
            .writer
            .finish()
            .map_err(|err| ToolverseError::ArchiveError(format!("cannot finish archive: {err}")))?;
        Ok(cursor.into_inner())
    }

    /// Finish the archive as a downloadable artifact.
    pub fn into_artifact(self, filename: impl Into<String>) -> Result<GeneratedArtifact, ToolverseError> {
        Ok(GeneratedArtifact::zip(self.finish()?, filename))
    }

    fn unique_name(&self, name: &str) -> String {
        if !self.names.contains(name) {
            return name.to_string();
        }
        let (stem, ext) = match name.rfind('.') {
            Some(dot) if dot > 0 => (&name[..dot], &name[dot..]),
            _ => (name, ""),
        };
        (1..)
            .map(|n| format!("{stem} ({n}){ext}"))
            .find(|candidate| !self.names.contains(candidate))
            .unwrap_or_else(|| name.to_string())
    }
}

impl Default for ZipBundle {
    fn default() -> Self {
        Self::new()
    }
}
