// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Order-stable lists behind the drag-and-drop tools.
//
// `PageBoard` is the page grid of the reorder tool: each entry keeps the id
// it was created with no matter where it is moved, so a drag result can be
// applied by id. `MergeQueue` is the file list of the merge tool.

use serde::Serialize;
use toolverse_core::error::ToolverseError;
use toolverse_core::types::{PageThumbnail, UploadedFile};
use tracing::debug;

/// One page on the board.
#[derive(Debug, Clone, Serialize)]
pub struct BoardPage {
    /// Stable identifier, `page-{n}` with the 1-based original page number.
    pub id: String,
    /// Zero-based index of the page in the source document.
    pub original_index: usize,
    #[serde(skip)]
    pub thumbnail: Option<PageThumbnail>,
}

/// Ordered, id-stable list of the pages of one document.
#[derive(Debug, Clone, Default)]
pub struct PageBoard {
    pages: Vec<BoardPage>,
}

impl PageBoard {
    /// A board showing pages `1..=page_count` in document order.
    pub fn new(page_count: usize) -> Self {
        let pages = (0..page_count)
            .map(|index| BoardPage {
                id: format!("page-{}", index + 1),
                original_index: index,
                thumbnail: None,
            })
            .collect();
        Self { pages }
    }

    /// A board built from rendered thumbnails, one entry per thumbnail,
    /// ordered by each thumbnail's `order`.
    pub fn from_thumbnails(mut thumbnails: Vec<PageThumbnail>) -> Self {
        thumbnails.sort_by_key(|thumb| thumb.order);
        let pages = thumbnails
            .into_iter()
            .map(|thumb| BoardPage {
                id: format!("page-{}", thumb.page_index + 1),
                original_index: thumb.page_index,
                thumbnail: Some(thumb),
            })
            .collect();
        Self { pages }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn pages(&self) -> &[BoardPage] {
        &self.pages
    }

    /// Attach thumbnails to the entries with matching `page_index`.
    /// Thumbnails for pages no longer on the board are ignored.
    pub fn attach_thumbnails(&mut self, thumbnails: Vec<PageThumbnail>) {
        for thumb in thumbnails {
            if let Some(page) = self
                .pages
                .iter_mut()
                .find(|page| page.original_index == thumb.page_index)
            {
                page.thumbnail = Some(thumb);
            }
        }
        self.sync_order();
    }

    /// Move the entry at `from` so that it ends up at `to`, shifting the
    /// entries in between.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), ToolverseError> {
        move_item(&mut self.pages, from, to)?;
        self.sync_order();
        Ok(())
    }

    /// Move the entry `active_id` to the position currently held by
    /// `over_id`, the way a drop onto another card resolves.
    pub fn move_by_id(&mut self, active_id: &str, over_id: &str) -> Result<(), ToolverseError> {
        let from = self.position(active_id)?;
        let to = self.position(over_id)?;
        debug!(active_id, over_id, from, to, "Moving page");
        self.move_item(from, to)
    }

    /// Take a page off the board.
    pub fn remove(&mut self, id: &str) -> Result<BoardPage, ToolverseError> {
        let index = self.position(id)?;
        let page = self.pages.remove(index);
        self.sync_order();
        Ok(page)
    }

    /// Current order as 1-based original page numbers, the shape the reorder
    /// endpoint takes in `pagesOrder`.
    pub fn page_order(&self) -> Vec<usize> {
        self.pages.iter().map(|page| page.original_index + 1).collect()
    }

    /// Current order as zero-based source page indices.
    pub fn page_indices(&self) -> Vec<usize> {
        self.pages.iter().map(|page| page.original_index).collect()
    }

    fn position(&self, id: &str) -> Result<usize, ToolverseError> {
        self.pages
            .iter()
            .position(|page| page.id == id)
            .ok_or_else(|| ToolverseError::InvalidInput(format!("no page with id {id}")))
    }

    /// Keep each thumbnail's `order` equal to its board position.
    fn sync_order(&mut self) {
        for (position, page) in self.pages.iter_mut().enumerate() {
            if let Some(thumb) = page.thumbnail.as_mut() {
                thumb.order = position;
            }
        }
    }
}

/// Ordered list of PDF uploads waiting to be merged.
#[derive(Debug, Default)]
pub struct MergeQueue {
    files: Vec<UploadedFile>,
}

impl MergeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the PDFs among `files`; anything else is skipped. Returns how
    /// many were added.
    pub fn push(&mut self, files: impl IntoIterator<Item = UploadedFile>) -> usize {
        let before = self.files.len();
        for file in files {
            if file.is_pdf() {
                self.files.push(file);
            } else {
                debug!(name = %file.name, mime = %file.mime_type, "Skipping non-PDF file");
            }
        }
        self.files.len() - before
    }

    pub fn remove(&mut self, index: usize) -> Result<UploadedFile, ToolverseError> {
        if index >= self.files.len() {
            return Err(ToolverseError::InvalidInput(format!(
                "no file at position {index}"
            )));
        }
        Ok(self.files.remove(index))
    }

    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), ToolverseError> {
        move_item(&mut self.files, from, to)
    }

    /// Move the file `active_id` to the position of `over_id`.
    pub fn move_by_id(&mut self, active_id: &str, over_id: &str) -> Result<(), ToolverseError> {
        let find = |id: &str| {
            self.files
                .iter()
                .position(|file| file.id.to_string() == id)
                .ok_or_else(|| ToolverseError::InvalidInput(format!("no file with id {id}")))
        };
        let from = find(active_id)?;
        let to = find(over_id)?;
        self.move_item(from, to)
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_files(self) -> Vec<UploadedFile> {
        self.files
    }
}

/// Remove the element at `from` and reinsert it at `to`.
fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), ToolverseError> {
    let len = items.len();
    if from >= len || to >= len {
        return Err(ToolverseError::InvalidInput(format!(
            "cannot move item {from} to {to} in a list of {len}"
        )));
    }
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolverse_core::types::{FileId, MIME_PDF, MIME_PNG};

    fn thumb(page_index: usize) -> PageThumbnail {
        PageThumbnail {
            source_file_id: FileId::new(),
            page_index,
            rendered_image: Vec::new(),
            width: 10,
            height: 10,
            order: page_index,
        }
    }

    #[test]
    fn moving_last_page_to_front() {
        let mut board = PageBoard::new(3);
        board.move_item(2, 0).expect("move");
        assert_eq!(board.page_order(), vec![3, 1, 2]);
        assert_eq!(board.page_indices(), vec![2, 0, 1]);
    }

    #[test]
    fn ids_survive_moves() {
        let mut board = PageBoard::new(4);
        board.move_by_id("page-1", "page-4").expect("move");
        let ids: Vec<&str> = board.pages().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["page-2", "page-3", "page-4", "page-1"]);

        board.move_by_id("page-1", "page-2").expect("move back");
        assert_eq!(board.page_order(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn remove_drops_page_from_order() {
        let mut board = PageBoard::new(3);
        let removed = board.remove("page-2").expect("remove");
        assert_eq!(removed.original_index, 1);
        assert_eq!(board.page_order(), vec![1, 3]);
        assert!(board.remove("page-2").is_err());
    }

    #[test]
    fn out_of_range_move_is_rejected() {
        let mut board = PageBoard::new(2);
        assert!(board.move_item(0, 2).is_err());
        assert_eq!(board.page_order(), vec![1, 2]);
    }

    #[test]
    fn thumbnail_order_tracks_position() {
        let mut board = PageBoard::from_thumbnails(vec![thumb(0), thumb(1), thumb(2)]);
        board.move_item(0, 2).expect("move");
        let orders: Vec<(usize, usize)> = board
            .pages()
            .iter()
            .filter_map(|p| p.thumbnail.as_ref())
            .map(|t| (t.page_index, t.order))
            .collect();
        assert_eq!(orders, vec![(1, 0), (2, 1), (0, 2)]);
    }

    #[test]
    fn attach_thumbnails_matches_by_page_index() {
        let mut board = PageBoard::new(3);
        board.move_item(2, 0).expect("move");
        board.attach_thumbnails(vec![thumb(0), thumb(2)]);

        let first = board.pages()[0].thumbnail.as_ref().expect("thumbnail");
        assert_eq!(first.page_index, 2);
        assert_eq!(first.order, 0);
        assert!(board.pages()[2].thumbnail.is_none());
    }

    #[test]
    fn merge_queue_keeps_only_pdfs() {
        let mut queue = MergeQueue::new();
        let added = queue.push(vec![
            UploadedFile::new("a.pdf", vec![1], MIME_PDF),
            UploadedFile::new("b.png", vec![2], MIME_PNG),
            UploadedFile::new("c.pdf", vec![3], MIME_PDF),
        ]);
        assert_eq!(added, 2);
        let names: Vec<&str> = queue.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a.pdf", "c.pdf"]);
    }

    #[test]
    fn merge_queue_reorders_by_id() {
        let mut queue = MergeQueue::new();
        queue.push(vec![
            UploadedFile::new("a.pdf", vec![], MIME_PDF),
            UploadedFile::new("b.pdf", vec![], MIME_PDF),
            UploadedFile::new("c.pdf", vec![], MIME_PDF),
        ]);
        let first = queue.files()[0].id.to_string();
        let last = queue.files()[2].id.to_string();
        queue.move_by_id(&last, &first).expect("move");

        let names: Vec<&str> = queue.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["c.pdf", "a.pdf", "b.pdf"]);

        let removed = queue.remove(1).expect("remove");
        assert_eq!(removed.name, "a.pdf");
        assert_eq!(queue.len(), 2);
        assert!(queue.remove(5).is_err());
    }
}
