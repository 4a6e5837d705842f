// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF assembler: build a new document from pages copied out of one or more
// source documents.
//
// Every tool output (merge, split part, reorder) is a freshly created
// document with its own catalog and a single flat page tree. Sources are only
// read. Pages land in exactly the order they are appended.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use toolverse_core::error::ToolverseError;
use tracing::{debug, info, instrument, warn};

use crate::pdf::reader::PdfReader;

/// Page attributes that may be inherited from ancestor `/Pages` nodes
/// (ISO 32000-1 §7.7.3.4).
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `/Parent` chains in damaged files.
const MAX_TREE_DEPTH: usize = 64;

/// Builds a new PDF by copying pages from source documents.
///
/// ```ignore
/// let mut assembler = PdfAssembler::new();
/// assembler.append_document(&first)?;
/// assembler.append_pages(&second, &[2, 0])?;
/// let bytes = assembler.finish()?;
/// ```
pub struct PdfAssembler {
    /// The document under construction.
    document: Document,
    /// Reserved id of the single `/Pages` node; written in `finish`.
    pages_id: ObjectId,
    /// Page references in output order.
    kids: Vec<Object>,
}

impl PdfAssembler {
    /// Start an empty target document.
    pub fn new() -> Self {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();
        Self {
            document,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Append every page of `source`, in page order.
    pub fn append_document(&mut self, source: &PdfReader) -> Result<(), ToolverseError> {
        let indices: Vec<usize> = (0..source.page_count()).collect();
        self.append_pages(source, &indices)
    }

    /// Append the pages at the given zero-based `indices` of `source`, in the
    /// order given. Indices may repeat; each occurrence becomes its own page.
    ///
    /// All indices are validated before anything is copied, so a failed call
    /// leaves the assembler unchanged.
    #[instrument(skip_all, fields(source = source.name().unwrap_or("<memory>"), pages = indices.len()))]
    pub fn append_pages(
        &mut self,
        source: &PdfReader,
        indices: &[usize],
    ) -> Result<(), ToolverseError> {
        let page_ids = source.page_ids();
        let selected = indices
            .iter()
            .map(|&index| {
                page_ids.get(index).copied().ok_or_else(|| {
                    ToolverseError::InvalidPageSelection(format!(
                        "page {} out of range (document has {} pages)",
                        index + 1,
                        page_ids.len()
                    ))
                })
            })
            .collect::<Result<Vec<ObjectId>, ToolverseError>>()?;

        let mut copier = ObjectCopier::new(source.document());

        // Reserve target ids for every selected page first, so links between
        // selected pages resolve regardless of order. A repeated page maps
        // links to its first occurrence.
        let targets: Vec<ObjectId> = selected
            .iter()
            .map(|&page_id| {
                let new_id = self.document.new_object_id();
                copier.copied.entry(page_id).or_insert(new_id);
                new_id
            })
            .collect();

        for (page_id, new_id) in selected.into_iter().zip(targets) {
            copier.copy_page(&mut self.document, page_id, new_id, self.pages_id)?;
            self.kids.push(Object::Reference(new_id));
        }

        debug!(
            total_pages = self.kids.len(),
            copied_objects = copier.copied.len(),
            "Pages appended"
        );
        Ok(())
    }

    /// Write the page tree and catalog and serialise the document.
    #[instrument(skip(self), fields(pages = self.kids.len()))]
    pub fn finish(mut self) -> Result<Vec<u8>, ToolverseError> {
        if self.kids.is_empty() {
            return Err(ToolverseError::NoPagesSelected);
        }

        let count = self.kids.len() as i64;
        self.document.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => self.kids,
                "Count" => count,
            }),
        );
        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.document.trailer.set("Root", catalog_id);
        self.document.compress();

        let mut output = Vec::new();
        self.document.save_to(&mut output).map_err(|err| {
            ToolverseError::PdfError(format!("failed to serialise assembled PDF: {}", err))
        })?;

        info!(pages = count, output_bytes = output.len(), "PDF assembled");
        Ok(output)
    }
}

impl Default for PdfAssembler {
    fn default() -> Self {
        Self::new()
    }
}

// -- Object copying -----------------------------------------------------------

/// Deep-copies objects from one source document into a target, remembering
/// what was already copied so shared resources (fonts, images) stay shared
/// and reference cycles terminate.
struct ObjectCopier<'a> {
    source: &'a Document,
    /// Source object id -> target object id.
    copied: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    fn new(source: &'a Document) -> Self {
        Self {
            source,
            copied: HashMap::new(),
        }
    }

    /// Copy one page dictionary into `new_id`, materialising inherited
    /// attributes and re-parenting it under `parent`.
    fn copy_page(
        &mut self,
        target: &mut Document,
        page_id: ObjectId,
        new_id: ObjectId,
        parent: ObjectId,
    ) -> Result<(), ToolverseError> {
        let page = self.source.get_dictionary(page_id).map_err(|err| {
            ToolverseError::PdfError(format!("cannot read page object {:?}: {}", page_id, err))
        })?;

        let mut copy = self.copy_dictionary(target, page)?;

        for key in INHERITABLE_KEYS {
            if copy.has(key) {
                continue;
            }
            if let Some(value) = inherited_attribute(self.source, page, key) {
                let value = self.copy_object(target, &value)?;
                copy.set(key.to_vec(), value);
            }
        }

        copy.set("Parent", Object::Reference(parent));
        target.objects.insert(new_id, Object::Dictionary(copy));
        Ok(())
    }

    fn copy_object(
        &mut self,
        target: &mut Document,
        object: &Object,
    ) -> Result<Object, ToolverseError> {
        match object {
            Object::Reference(id) => self.copy_reference(target, *id),
            Object::Dictionary(dict) => Ok(Object::Dictionary(self.copy_dictionary(target, dict)?)),
            Object::Array(items) => {
                let mut copy = Vec::with_capacity(items.len());
                for item in items {
                    copy.push(self.copy_object(target, item)?);
                }
                Ok(Object::Array(copy))
            }
            Object::Stream(stream) => {
                let mut copy = stream.clone();
                copy.dict = self.copy_dictionary(target, &stream.dict)?;
                Ok(Object::Stream(copy))
            }
            // Boolean, Integer, Real, String, Name, Null.
            other => Ok(other.clone()),
        }
    }

    fn copy_reference(
        &mut self,
        target: &mut Document,
        id: ObjectId,
    ) -> Result<Object, ToolverseError> {
        if let Some(&copied) = self.copied.get(&id) {
            return Ok(Object::Reference(copied));
        }

        let object = match self.source.get_object(id) {
            Ok(object) => object,
            Err(err) => {
                warn!(?id, %err, "Cannot resolve reference, using Null");
                return Ok(Object::Null);
            }
        };

        // A page that is not part of the output (e.g. a link destination).
        // Pulling it in would drag its whole content along as an orphan.
        if is_page(object) {
            return Ok(Object::Null);
        }

        // Register before recursing so cycles point back at this copy.
        let new_id = target.new_object_id();
        self.copied.insert(id, new_id);
        let copy = self.copy_object(target, object)?;
        target.objects.insert(new_id, copy);
        Ok(Object::Reference(new_id))
    }

    /// Copy a dictionary, dropping `/Parent` (the caller re-links pages, and
    /// following it would pull in the whole source page tree).
    fn copy_dictionary(
        &mut self,
        target: &mut Document,
        dict: &Dictionary,
    ) -> Result<Dictionary, ToolverseError> {
        let mut copy = Dictionary::new();
        for (key, value) in dict.iter() {
            if key == b"Parent" {
                continue;
            }
            copy.set(key.clone(), self.copy_object(target, value)?);
        }
        Ok(copy)
    }
}

fn is_page(object: &Object) -> bool {
    match object {
        Object::Dictionary(dict) => dict
            .get(b"Type")
            .and_then(|ty| ty.as_name())
            .is_ok_and(|name| name == b"Page"),
        _ => false,
    }
}

/// Look up `key` on the nearest ancestor page-tree node of `page`.
fn inherited_attribute(source: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent = page.get(b"Parent").and_then(|p| p.as_reference()).ok();
    let mut depth = 0;

    while let Some(node_id) = parent {
        if depth >= MAX_TREE_DEPTH {
            warn!(?node_id, "Page tree too deep, giving up on inherited attributes");
            return None;
        }
        let node = source.get_dictionary(node_id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(|p| p.as_reference()).ok();
        depth += 1;
    }

    None
}
