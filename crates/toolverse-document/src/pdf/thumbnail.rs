// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page rendering: rasterise PDF pages with `hayro` for thumbnails and the
// PDF-to-image tool.
//
// Pages are rendered one after another in page order. The renderer paints on
// an opaque white background, so no alpha handling is needed downstream.

use std::io::Cursor;
use std::sync::Arc;

use hayro::{InterpreterSettings, Pdf, RenderSettings, render};
use image::codecs::jpeg::JpegEncoder;
use toolverse_core::error::ToolverseError;
use toolverse_core::types::{PageThumbnail, UploadedFile};
use tracing::{debug, info, instrument};

/// JPEG quality for thumbnails; they are previews, not output.
const THUMBNAIL_JPEG_QUALITY: u8 = 80;

/// One page rendered to PNG.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Zero-based page index.
    pub page_index: usize,
    pub png: Vec<u8>,
}

/// Renders PDF pages at a fixed scale (1.0 = 72 dpi).
#[derive(Debug, Clone, Copy)]
pub struct ThumbnailRenderer {
    pub scale: f32,
}

impl ThumbnailRenderer {
    pub fn new(scale: f32) -> Self {
        Self { scale }
    }

    /// Render every page of `file` to a JPEG thumbnail. `order` starts equal
    /// to `page_index`.
    #[instrument(skip_all, fields(name = %file.name, scale = self.scale))]
    pub fn render_thumbnails(
        &self,
        file: &UploadedFile,
    ) -> Result<Vec<PageThumbnail>, ToolverseError> {
        let pages = self.render_pages_png(&file.bytes)?;

        let mut thumbnails = Vec::with_capacity(pages.len());
        for page in pages {
            let decoded = image::load_from_memory(&page.png).map_err(|err| {
                ToolverseError::RenderError(format!(
                    "page {} produced an unreadable bitmap: {}",
                    page.page_index + 1,
                    err
                ))
            })?;
            let rgb = decoded.to_rgb8();
            let (width, height) = rgb.dimensions();

            let mut jpeg = Vec::new();
            let encoder =
                JpegEncoder::new_with_quality(Cursor::new(&mut jpeg), THUMBNAIL_JPEG_QUALITY);
            rgb.write_with_encoder(encoder).map_err(|err| {
                ToolverseError::ImageError(format!("thumbnail JPEG encoding failed: {}", err))
            })?;

            thumbnails.push(PageThumbnail {
                source_file_id: file.id,
                page_index: page.page_index,
                rendered_image: jpeg,
                width,
                height,
                order: page.page_index,
            });
        }

        info!(thumbnails = thumbnails.len(), "Thumbnails rendered");
        Ok(thumbnails)
    }

    /// Render every page of a PDF to PNG.
    #[instrument(skip_all, fields(bytes_len = data.len(), scale = self.scale))]
    pub fn render_pages_png(&self, data: &[u8]) -> Result<Vec<RenderedPage>, ToolverseError> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ToolverseError::InvalidInput(format!(
                "render scale must be positive, got {}",
                self.scale
            )));
        }

        let pdf = Pdf::new(Arc::new(data.to_vec())).map_err(|err| {
            ToolverseError::RenderError(format!("cannot open PDF for rendering: {:?}", err))
        })?;

        let interpreter_settings = InterpreterSettings::default();
        let render_settings = RenderSettings {
            x_scale: self.scale,
            y_scale: self.scale,
            ..Default::default()
        };

        let mut rendered = Vec::new();
        for (page_index, page) in pdf.pages().iter().enumerate() {
            let pixmap = render(page, &interpreter_settings, &render_settings);
            let png = pixmap.take_png();
            debug!(page = page_index + 1, png_bytes = png.len(), "Page rendered");
            rendered.push(RenderedPage { page_index, png });
        }

        if rendered.is_empty() {
            return Err(ToolverseError::RenderError("document has no pages".into()));
        }
        Ok(rendered)
    }
}

impl Default for ThumbnailRenderer {
    fn default() -> Self {
        Self::new(0.5)
    }
}
