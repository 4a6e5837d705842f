// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: decode, resize and re-encode in-memory images with the
// `image` crate.

use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use toolverse_core::error::ToolverseError;
use toolverse_core::types::{MIME_JPEG, MIME_PNG, MIME_WEBP};
use tracing::{debug, info, instrument};

/// Raster formats the tools can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    /// File extension used in artifact names.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => MIME_JPEG,
            Self::Png => MIME_PNG,
            Self::WebP => MIME_WEBP,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ToolverseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" | "image/jpeg" => Ok(Self::Jpeg),
            "png" | "image/png" => Ok(Self::Png),
            "webp" | "image/webp" => Ok(Self::WebP),
            other => Err(ToolverseError::UnsupportedFormat(format!(
                "cannot write images as {other:?}"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A single decoded image.
///
/// Transformations consume `self` and return a new processor, so calls chain:
///
/// ```ignore
/// let bytes = ImageProcessor::from_bytes(&upload)?
///     .resize(512, 512)
///     .encode(OutputFormat::Png, 80)?;
/// ```
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Decode an image from encoded bytes (JPEG, PNG, WebP, GIF, BMP, ICO...).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, ToolverseError> {
        let format = image::guess_format(data).map_err(|_| {
            ToolverseError::UnsupportedFormat("file is not a recognised image".into())
        })?;
        let img = image::load_from_memory_with_format(data, format).map_err(|err| {
            ToolverseError::ImageError(format!("failed to decode {:?} image: {}", format, err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            ?format,
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Fit within `max_width` x `max_height`, preserving aspect ratio.
    #[instrument(skip(self))]
    pub fn resize(self, max_width: u32, max_height: u32) -> Self {
        info!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            max_width,
            max_height,
            "Resizing image"
        );
        let resized = self
            .image
            .resize(max_width, max_height, FilterType::Lanczos3);
        Self { image: resized }
    }

    /// Resize to exactly `width` x `height`.
    pub fn resize_exact(self, width: u32, height: u32) -> Self {
        let resized = self
            .image
            .resize_exact(width, height, FilterType::Lanczos3);
        debug!(width, height, "Exact resize complete");
        Self { image: resized }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode as `format`. `quality` (1-100) applies to JPEG only; PNG always
    /// uses maximum compression and WebP output is lossless.
    pub fn encode(&self, format: OutputFormat, quality: u8) -> Result<Vec<u8>, ToolverseError> {
        match format {
            OutputFormat::Jpeg => self.to_jpeg_bytes(quality),
            OutputFormat::Png => self.to_png_bytes(),
            OutputFormat::WebP => self.to_webp_bytes(),
        }
    }

    /// PNG with maximum deflate effort and adaptive filtering.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, ToolverseError> {
        let mut buffer = Vec::new();
        let encoder =
            PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, PngFilter::Adaptive);
        self.image
            .write_with_encoder(encoder)
            .map_err(|err| ToolverseError::ImageError(format!("PNG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// JPEG at `quality` (clamped to 1-100). Alpha is dropped.
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>, ToolverseError> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
        rgb.write_with_encoder(encoder)
            .map_err(|err| ToolverseError::ImageError(format!("JPEG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Lossless WebP.
    pub fn to_webp_bytes(&self) -> Result<Vec<u8>, ToolverseError> {
        let mut buffer = Vec::new();
        let rgba = self.image.to_rgba8();
        let encoder = WebPEncoder::new_lossless(&mut buffer);
        rgba.write_with_encoder(encoder)
            .map_err(|err| ToolverseError::ImageError(format!("WebP encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Encode using the `image` crate's default settings for `format`.
    pub fn to_format_bytes(&self, format: ImageFormat) -> Result<Vec<u8>, ToolverseError> {
        let mut buffer = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut buffer), format)
            .map_err(|err| ToolverseError::ImageError(format!("image encoding failed: {}", err)))?;
        Ok(buffer)
    }
}
