// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Password and PIN generation endpoint.

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use serde::Serialize;
use toolverse_core::error::ToolverseError;
use toolverse_tools::PasswordOptions;
use toolverse_tools::security::password::{Strength, generate, strength};

use crate::error::ApiError;
use crate::routes::parse_json;

#[derive(Debug, Serialize)]
pub struct PasswordResponse {
    pub password: String,
    pub strength: Strength,
}

/// Options as JSON (an empty body means the defaults) -> a fresh password
/// and its strength rating.
pub async fn password(
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<PasswordResponse>, ApiError> {
    let body = body?;
    let options: PasswordOptions = if body.is_empty() {
        PasswordOptions::default()
    } else {
        parse_json(&body)?
    };

    let password = generate(&options).map_err(ToolverseError::from)?;
    let strength = strength(&password, options.class_count());
    Ok(Json(PasswordResponse { password, strength }))
}
