// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text endpoints: statistics and comparison.

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use serde::{Deserialize, Serialize};
use toolverse_tools::text::diff::{SideBySideRow, diff as diff_text, side_by_side};
use toolverse_tools::{DiffGranularity, DiffSegment, TextStats};

use crate::error::ApiError;
use crate::routes::parse_json;

#[derive(Debug, Deserialize)]
pub struct CountRequest {
    #[serde(default)]
    pub text: String,
}

/// `{ "text": "..." }` -> character, word, line and paragraph counts.
pub async fn count(body: Result<Bytes, BytesRejection>) -> Result<Json<TextStats>, ApiError> {
    let request: CountRequest = parse_json(&body?)?;
    Ok(Json(TextStats::of(&request.text)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffRequest {
    #[serde(default)]
    pub original: String,
    #[serde(default)]
    pub changed: String,
    #[serde(default)]
    pub granularity: DiffGranularity,
    /// Also return the two-column line view.
    #[serde(default)]
    pub side_by_side: bool,
}

#[derive(Debug, Serialize)]
pub struct DiffResponse {
    pub segments: Vec<DiffSegment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<SideBySideRow>>,
}

pub async fn diff(body: Result<Bytes, BytesRejection>) -> Result<Json<DiffResponse>, ApiError> {
    let request: DiffRequest = parse_json(&body?)?;
    let segments = diff_text(&request.original, &request.changed, request.granularity);
    let rows = request
        .side_by_side
        .then(|| side_by_side(&request.original, &request.changed));
    Ok(Json(DiffResponse { segments, rows }))
}
