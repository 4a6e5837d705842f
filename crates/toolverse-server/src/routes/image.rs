// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image endpoints: compressor, HEIC and format conversion, resizer, favicon
// packaging and palette extraction.

use axum::Json;
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::response::Response;
use chrono::Utc;
use serde::Serialize;
use toolverse_core::error::ToolverseError;
use toolverse_core::types::compact_iso_timestamp;
use toolverse_document::image::palette::PaletteColor;
use toolverse_document::image::{
    OutputFormat, compress, convert, extract_palette, package_favicons, parse_quality_or,
    render_favicon_set, resize, to_jpeg,
};
use toolverse_document::ZipBundle;

use crate::error::ApiError;
use crate::form::FormData;
use crate::routes::{AppState, attachment, blocking};

/// Name of the favicon bundle.
const FAVICON_ZIP: &str = "favicons.zip";

/// Colors returned when the palette request does not say.
const DEFAULT_PALETTE_SIZE: usize = 5;

/// Form `quality`, falling back to the configured default when missing or
/// unusable.
fn quality(form: &FormData, state: &AppState) -> u8 {
    parse_quality_or(form.text("quality"), state.config.default_quality)
}

/// `files[]` + `quality` -> ZIP of `{stem}_compressed.{ext}` entries.
pub async fn compressor(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let mut form = FormData::read(multipart?).await?;
    let files = form.take_files("files");
    let quality = quality(&form, &state);

    let artifact = blocking(move || {
        if files.is_empty() {
            return Err(ToolverseError::NoFiles);
        }
        let mut bundle = ZipBundle::new();
        for file in &files {
            let compressed = compress(file, quality)?;
            bundle.add(&compressed.suggested_filename, &compressed.bytes)?;
        }
        bundle.into_artifact(format!(
            "toolverse-compressed_{}.zip",
            compact_iso_timestamp(Utc::now())
        ))
    })
    .await?;

    attachment(artifact)
}

/// `file` -> `{stem}.jpeg`.
pub async fn convert_heic(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let mut form = FormData::read(multipart?).await?;
    let file = form.require_file("file")?;
    let quality = state.config.heic_jpeg_quality;

    let artifact = blocking(move || to_jpeg(&file, quality)).await?;
    attachment(artifact)
}

/// `file` + `format` (`jpeg` | `png` | `webp`) -> re-encoded image.
pub async fn convert_format(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let mut form = FormData::read(multipart?).await?;
    let file = form.require_file("file")?;
    let target: OutputFormat = form.require_text("format")?.parse()?;
    let quality = quality(&form, &state);

    let artifact = blocking(move || convert(&file, target, quality)).await?;
    attachment(artifact)
}

/// `file` + `width` and/or `height` + `keepAspectRatio` -> resized image.
pub async fn resize_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let mut form = FormData::read(multipart?).await?;
    let file = form.require_file("file")?;
    let width = form.u32_field("width")?;
    let height = form.u32_field("height")?;
    if width.is_none() && height.is_none() {
        return Err(ToolverseError::missing("width or height").into());
    }
    let keep_aspect = form.bool_field("keepAspectRatio", true)?;
    let quality = quality(&form, &state);

    let artifact =
        blocking(move || resize(&file, width, height, keep_aspect, quality)).await?;
    attachment(artifact)
}

/// `pngFiles[]` (pre-sized icons) or a single `file` to render the full set
/// from -> `favicons.zip` with the PNGs and `favicon.ico`.
pub async fn favicon_generator(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let mut form = FormData::read(multipart?).await?;
    let pngs = form.take_files("pngFiles");
    let source = form.take_file("file");

    let artifact = blocking(move || {
        let entries = if !pngs.is_empty() {
            package_favicons(&pngs)?
        } else if let Some(source) = source {
            render_favicon_set(&source)?
        } else {
            return Err(ToolverseError::NoFiles);
        };
        let mut bundle = ZipBundle::new();
        for (name, bytes) in &entries {
            bundle.add(name, bytes)?;
        }
        bundle.into_artifact(FAVICON_ZIP)
    })
    .await?;

    attachment(artifact)
}

#[derive(Debug, Serialize)]
pub struct PaletteResponse {
    pub colors: Vec<PaletteColor>,
}

/// `file` + `count` -> dominant colors as JSON.
pub async fn palette(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PaletteResponse>, ApiError> {
    let mut form = FormData::read(multipart?).await?;
    let file = form.require_file("file")?;
    let count = form
        .u32_field("count")?
        .map_or(DEFAULT_PALETTE_SIZE, |count| count as usize);

    let colors = blocking(move || extract_palette(&file.bytes, count)).await?;
    Ok(Json(PaletteResponse { colors }))
}

#[cfg(test)]
mod tests {
    use axum::http::{StatusCode, header};
    use toolverse_document::ImageProcessor;
    use toolverse_core::ServerConfig;
    use toolverse_document::pdf::fixtures::sample_png;

    use crate::routes::{AppState, router};
    use crate::routes::test_support::{
        MultipartBody, body_bytes, body_json, header_str, send, test_router, zip_names,
    };

    #[tokio::test]
    async fn compressor_zips_every_upload() {
        let png = sample_png(40, 30);
        let request = MultipartBody::new()
            .file("files[]", "logo.png", "image/png", &png)
            .file("files[]", "photo.png", "image/jpeg", &png)
            .text("quality", "70")
            .into_request("/api/image/compressor");

        let response = send(test_router(), request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header_str(&response, header::CONTENT_TYPE), "application/zip");
        assert!(
            header_str(&response, header::CONTENT_DISPOSITION)
                .starts_with("attachment; filename=\"toolverse-compressed_")
        );

        let zip = body_bytes(response).await;
        assert_eq!(
            zip_names(&zip),
            vec!["logo_compressed.png", "photo_compressed.jpeg"]
        );
    }

    #[tokio::test]
    async fn compressor_without_files_is_400() {
        let request = MultipartBody::new()
            .text("quality", "70")
            .into_request("/api/image/compressor");
        let response = send(test_router(), request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "No files were uploaded.");
    }

    #[tokio::test]
    async fn unusable_quality_uses_configured_default() {
        let config = ServerConfig {
            default_quality: 20,
            ..ServerConfig::default()
        };
        let png = sample_png(64, 48);
        let convert_with = |quality: &str| {
            MultipartBody::new()
                .file("file", "photo.png", "image/png", &png)
                .text("format", "jpeg")
                .text("quality", quality)
                .into_request("/api/image/convert")
        };

        let fallback = send(router(AppState::new(config.clone())), convert_with("abc")).await;
        assert_eq!(fallback.status(), StatusCode::OK);
        let explicit = send(router(AppState::new(config.clone())), convert_with("20")).await;
        let stock = send(router(AppState::new(config)), convert_with("80")).await;

        let fallback = body_bytes(fallback).await;
        assert_eq!(fallback, body_bytes(explicit).await);
        assert_ne!(fallback, body_bytes(stock).await);
    }

    #[tokio::test]
    async fn heic_conversion_renames_to_jpeg() {
        let request = MultipartBody::new()
            .file("file", "IMG_0001.png", "image/png", &sample_png(16, 16))
            .into_request("/api/image/convert-heic");
        let response = send(test_router(), request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header_str(&response, header::CONTENT_TYPE), "image/jpeg");
        assert_eq!(
            header_str(&response, header::CONTENT_DISPOSITION),
            "attachment; filename=\"IMG_0001.jpeg\""
        );
    }

    #[tokio::test]
    async fn heif_container_is_unsupported() {
        let mut heic = vec![0, 0, 0, 24];
        heic.extend_from_slice(b"ftypheic");
        heic.extend_from_slice(&[0; 12]);
        let request = MultipartBody::new()
            .file("file", "IMG_0002.HEIC", "image/heic", &heic)
            .into_request("/api/image/convert-heic");
        let response = send(test_router(), request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_target_format_is_400() {
        let request = MultipartBody::new()
            .file("file", "a.png", "image/png", &sample_png(8, 8))
            .text("format", "gif")
            .into_request("/api/image/convert");
        let response = send(test_router(), request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn resize_keeps_aspect_ratio() {
        let request = MultipartBody::new()
            .file("file", "banner.png", "image/png", &sample_png(200, 100))
            .text("width", "50")
            .text("keepAspectRatio", "true")
            .into_request("/api/image/resize");
        let response = send(test_router(), request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            header_str(&response, header::CONTENT_DISPOSITION),
            "attachment; filename=\"banner_50x25.png\""
        );
        let bytes = body_bytes(response).await;
        let decoded = ImageProcessor::from_bytes(&bytes).expect("decode");
        assert_eq!((decoded.width(), decoded.height()), (50, 25));
    }

    #[tokio::test]
    async fn resize_needs_a_dimension() {
        let request = MultipartBody::new()
            .file("file", "banner.png", "image/png", &sample_png(20, 10))
            .into_request("/api/image/resize");
        let response = send(test_router(), request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn favicon_bundle_from_presized_pngs() {
        let request = MultipartBody::new()
            .file("pngFiles", "favicon-16x16.png", "image/png", &sample_png(16, 16))
            .file("pngFiles", "favicon-32x32.png", "image/png", &sample_png(32, 32))
            .file("pngFiles", "icon-192x192.png", "image/png", &sample_png(192, 192))
            .into_request("/api/image/favicon-generator");
        let response = send(test_router(), request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            header_str(&response, header::CONTENT_DISPOSITION),
            "attachment; filename=\"favicons.zip\""
        );
        let zip = body_bytes(response).await;
        assert_eq!(
            zip_names(&zip),
            vec![
                "favicon-16x16.png",
                "favicon-32x32.png",
                "icon-192x192.png",
                "favicon.ico"
            ]
        );
    }

    #[tokio::test]
    async fn favicon_set_from_single_source() {
        let request = MultipartBody::new()
            .file("file", "logo.png", "image/png", &sample_png(64, 64))
            .into_request("/api/image/favicon-generator");
        let response = send(test_router(), request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let names = zip_names(&body_bytes(response).await);
        assert!(names.contains(&"apple-touch-icon-180x180.png".to_string()));
        assert!(names.contains(&"favicon.ico".to_string()));
    }

    #[tokio::test]
    async fn palette_returns_hex_colors() {
        let request = MultipartBody::new()
            .file("file", "swatch.png", "image/png", &sample_png(32, 32))
            .text("count", "3")
            .into_request("/api/image/palette");
        let response = send(test_router(), request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let colors = json["colors"].as_array().expect("colors");
        assert!(!colors.is_empty() && colors.len() <= 3);
        assert!(colors[0]["hex"].as_str().is_some_and(|hex| hex.starts_with('#')));
    }
}
