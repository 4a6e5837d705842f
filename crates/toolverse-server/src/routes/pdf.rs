// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF endpoints: merge, reorder, split, page thumbnails and page images.

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::response::Response;
use chrono::{Local, Utc};
use serde::Serialize;
use toolverse_core::error::ToolverseError;
use toolverse_core::types::{GeneratedArtifact, compact_iso_timestamp, local_timestamp};
use toolverse_document::pdf::ops::{self, SplitMode};
use toolverse_document::pdf::parse_page_order;
use toolverse_document::{PdfReader, ThumbnailRenderer, ZipBundle};
use tracing::debug;

use crate::error::ApiError;
use crate::form::FormData;
use crate::routes::{AppState, attachment, blocking};

/// `files[]` -> one PDF with every page of every upload, in upload order.
pub async fn merge(multipart: Result<Multipart, MultipartRejection>) -> Result<Response, ApiError> {
    let mut form = FormData::read(multipart?).await?;
    let files = form.take_files("files");

    let artifact = blocking(move || {
        if files.is_empty() {
            return Err(ToolverseError::NoFiles);
        }
        let readers = files
            .iter()
            .map(|file| PdfReader::from_named_bytes(&file.name, &file.bytes))
            .collect::<Result<Vec<_>, _>>()?;
        let bytes = ops::merge(&readers)?;
        Ok(GeneratedArtifact::pdf(
            bytes,
            format!("toolverse-merged_{}.pdf", local_timestamp(Local::now())),
        ))
    })
    .await?;

    attachment(artifact)
}

/// `file` + `pagesOrder` (JSON array of 1-based page numbers) -> the pages
/// in that order.
pub async fn reorder(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let mut form = FormData::read(multipart?).await?;
    let file = form.require_file("file")?;
    let order = form.require_text("pagesOrder")?.to_string();

    let artifact = blocking(move || {
        let reader = PdfReader::from_named_bytes(&file.name, &file.bytes)?;
        let indices = parse_page_order(&order, reader.page_count())?;
        debug!(?indices, "page order parsed");
        let bytes = ops::reorder(&reader, &indices)?;
        Ok(GeneratedArtifact::pdf(
            bytes,
            format!("toolverse-reordered_{}.pdf", compact_iso_timestamp(Utc::now())),
        ))
    })
    .await?;

    attachment(artifact)
}

/// `file` + `splitMode` (`all` | `range`) + `range` -> ZIP of single-page
/// PDFs named `{stem}_page_{n}.pdf`.
pub async fn split(multipart: Result<Multipart, MultipartRejection>) -> Result<Response, ApiError> {
    let mut form = FormData::read(multipart?).await?;
    let file = form.require_file("file")?;
    let mode = match form.text("splitMode") {
        Some("all") => SplitMode::All,
        Some("range") => SplitMode::Range(form.require_text("range")?.to_string()),
        other => {
            return Err(ToolverseError::InvalidInput(format!(
                "splitMode must be \"all\" or \"range\", got {other:?}"
            ))
            .into());
        }
    };

    let artifact = blocking(move || {
        let reader = PdfReader::from_named_bytes(&file.name, &file.bytes)?;
        let parts = ops::split(&reader, &file.name, &mode)?;
        let mut bundle = ZipBundle::new();
        for part in &parts {
            bundle.add(&part.filename, &part.bytes)?;
        }
        bundle.into_artifact(format!(
            "toolverse-split_{}.zip",
            local_timestamp(Local::now())
        ))
    })
    .await?;

    attachment(artifact)
}

/// `manifest.json` entry for one thumbnail.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThumbnailEntry {
    file: String,
    source_file_id: String,
    page_index: usize,
    order: usize,
    width: u32,
    height: u32,
}

/// `file` -> ZIP of JPEG page previews (`page-{n}.jpg`) plus a
/// `manifest.json` describing them.
pub async fn thumbnails(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let mut form = FormData::read(multipart?).await?;
    let file = form.require_file("file")?;
    let renderer = ThumbnailRenderer::new(state.config.thumbnail_scale);

    let artifact = blocking(move || {
        let thumbnails = renderer.render_thumbnails(&file)?;

        let mut bundle = ZipBundle::new();
        let mut manifest = Vec::with_capacity(thumbnails.len());
        for thumbnail in &thumbnails {
            let name = format!("page-{}.jpg", thumbnail.page_index + 1);
            bundle.add(&name, &thumbnail.rendered_image)?;
            manifest.push(ThumbnailEntry {
                file: name,
                source_file_id: thumbnail.source_file_id.to_string(),
                page_index: thumbnail.page_index,
                order: thumbnail.order,
                width: thumbnail.width,
                height: thumbnail.height,
            });
        }
        bundle.add("manifest.json", &serde_json::to_vec_pretty(&manifest)?)?;
        bundle.into_artifact(format!("{}_thumbnails.zip", file.stem()))
    })
    .await?;

    attachment(artifact)
}

/// `file` -> ZIP of full-size PNG pages named `{stem}_page_{n}.png`.
pub async fn to_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let mut form = FormData::read(multipart?).await?;
    let file = form.require_file("file")?;
    let renderer = ThumbnailRenderer::new(state.config.page_image_scale);

    let artifact = blocking(move || {
        let pages = renderer.render_pages_png(&file.bytes)?;
        let stem = file.stem();
        let mut bundle = ZipBundle::new();
        for page in &pages {
            bundle.add(&format!("{}_page_{}.png", stem, page.page_index + 1), &page.png)?;
        }
        bundle.into_artifact(format!("{stem}_images.zip"))
    })
    .await?;

    attachment(artifact)
}
