// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-file image operations behind the compressor, converter, HEIC converter
// and resizer tools. Each takes one upload and returns one artifact.

use toolverse_core::error::ToolverseError;
use toolverse_core::types::{GeneratedArtifact, MIME_PNG, MIME_WEBP, UploadedFile};
use tracing::{info, instrument};

use crate::image::processor::{ImageProcessor, OutputFormat};

/// Quality used when the form omits it or sends something unusable.
pub const DEFAULT_QUALITY: u8 = 80;

/// Parse a form `quality` field. Missing, non-numeric and zero fall back to
/// [`DEFAULT_QUALITY`]; anything else is clamped to 1..=100.
pub fn parse_quality(raw: Option<&str>) -> u8 {
    parse_quality_or(raw, DEFAULT_QUALITY)
}

/// [`parse_quality`] with a caller-supplied fallback.
pub fn parse_quality_or(raw: Option<&str>, fallback: u8) -> u8 {
    match raw.map(str::trim).and_then(|s| s.parse::<f64>().ok()) {
        Some(q) if q.is_finite() && q != 0.0 => q.round().clamp(1.0, 100.0) as u8,
        _ => fallback,
    }
}

/// Re-encode an upload to shrink it. The output format follows the upload's
/// MIME type: PNG stays PNG, WebP stays WebP, everything else becomes JPEG.
/// The result is named `{stem}_compressed.{ext}`.
#[instrument(skip(file), fields(name = %file.name, mime = %file.mime_type, in_bytes = file.bytes.len()))]
pub fn compress(file: &UploadedFile, quality: u8) -> Result<GeneratedArtifact, ToolverseError> {
    let format = match file.mime_type.as_str() {
        MIME_PNG => OutputFormat::Png,
        MIME_WEBP => OutputFormat::WebP,
        _ => OutputFormat::Jpeg,
    };

    let processor = ImageProcessor::from_bytes(&file.bytes).map_err(|err| named(file, err))?;
    let bytes = processor.encode(format, quality)?;

    info!(out_bytes = bytes.len(), %format, "Image compressed");
    Ok(GeneratedArtifact::new(
        bytes,
        format!("{}_compressed.{}", file.stem(), format.extension()),
        format.mime_type(),
    ))
}

/// Re-encode an upload as `target`, keeping its pixel dimensions.
#[instrument(skip(file), fields(name = %file.name))]
pub fn convert(
    file: &UploadedFile,
    target: OutputFormat,
    quality: u8,
) -> Result<GeneratedArtifact, ToolverseError> {
    let processor = ImageProcessor::from_bytes(&file.bytes).map_err(|err| named(file, err))?;
    let bytes = processor.encode(target, quality)?;
    Ok(GeneratedArtifact::new(
        bytes,
        format!("{}.{}", file.stem(), target.extension()),
        target.mime_type(),
    ))
}

/// Convert any decodable upload to `{stem}.jpeg`. HEIC/HEIF containers have
/// no decoder here and are reported as unsupported.
#[instrument(skip(file), fields(name = %file.name))]
pub fn to_jpeg(file: &UploadedFile, quality: u8) -> Result<GeneratedArtifact, ToolverseError> {
    if is_heif(&file.bytes) {
        return Err(ToolverseError::UnsupportedFormat(format!(
            "{} is a HEIC/HEIF image, which cannot be decoded on this server",
            file.name
        )));
    }
    convert(file, OutputFormat::Jpeg, quality)
}

/// Resize an upload to the given target and re-encode it in its own format
/// (JPEG for anything that is not PNG or WebP).
#[instrument(skip(file), fields(name = %file.name))]
pub fn resize(
    file: &UploadedFile,
    width: Option<u32>,
    height: Option<u32>,
    keep_aspect: bool,
    quality: u8,
) -> Result<GeneratedArtifact, ToolverseError> {
    let processor = ImageProcessor::from_bytes(&file.bytes).map_err(|err| named(file, err))?;
    let (new_w, new_h) =
        resize_dimensions(processor.width(), processor.height(), width, height, keep_aspect)?;

    let format = match file.mime_type.as_str() {
        MIME_PNG => OutputFormat::Png,
        MIME_WEBP => OutputFormat::WebP,
        _ => OutputFormat::Jpeg,
    };
    let bytes = processor.resize_exact(new_w, new_h).encode(format, quality)?;
    Ok(GeneratedArtifact::new(
        bytes,
        format!("{}_{}x{}.{}", file.stem(), new_w, new_h, format.extension()),
        format.mime_type(),
    ))
}

/// Target size for the resizer. With `keep_aspect`, the given width drives
/// the height (or the given height drives the width when no width is set),
/// rounding to the nearest pixel. Without it, a missing side keeps its
/// original length.
pub fn resize_dimensions(
    orig_w: u32,
    orig_h: u32,
    width: Option<u32>,
    height: Option<u32>,
    keep_aspect: bool,
) -> Result<(u32, u32), ToolverseError> {
    if orig_w == 0 || orig_h == 0 {
        return Err(ToolverseError::InvalidInput("source image is empty".into()));
    }

    let (w, h) = match (width, height, keep_aspect) {
        (Some(w), _, true) => (w, scale(w, orig_h, orig_w)),
        (None, Some(h), true) => (scale(h, orig_w, orig_h), h),
        (w, h, _) => (w.unwrap_or(orig_w), h.unwrap_or(orig_h)),
    };

    if w == 0 || h == 0 {
        return Err(ToolverseError::InvalidInput(format!(
            "target size {w}x{h} is empty"
        )));
    }
    Ok((w, h))
}

/// `round(value * num / den)`.
fn scale(value: u32, num: u32, den: u32) -> u32 {
    (value as f64 * num as f64 / den as f64).round() as u32
}

/// ISO-BMFF `ftyp` box with a HEIF brand.
fn is_heif(data: &[u8]) -> bool {
    const BRANDS: [&[u8]; 6] = [b"heic", b"heix", b"hevc", b"heim", b"mif1", b"msf1"];
    data.len() >= 12 && &data[4..8] == b"ftyp" && BRANDS.contains(&&data[8..12])
}

/// Prefix decode errors with the upload's name, so batch failures say which
/// file broke.
fn named(file: &UploadedFile, err: ToolverseError) -> ToolverseError {
    match err {
        ToolverseError::ImageError(detail) => {
            ToolverseError::ImageError(format!("{}: {}", file.name, detail))
        }
        ToolverseError::UnsupportedFormat(detail) => {
            ToolverseError::UnsupportedFormat(format!("{}: {}", file.name, detail))
        }
        other => other,
    }
}
