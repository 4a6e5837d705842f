// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dominant-color extraction (modified median cut quantization via
// `color_thief`).

use color_thief::ColorFormat;
use serde::Serialize;
use toolverse_core::error::ToolverseError;
use tracing::{debug, instrument};

use crate::image::processor::ImageProcessor;

/// Images are sampled at no more than this edge length.
const SAMPLE_EDGE: u32 = 200;

/// Every pixel of the downsampled image is considered (1 = no skipping).
const SAMPLE_STEP: u8 = 1;

/// color_thief ignores pixels less opaque than this.
const MIN_ALPHA: u8 = 125;

/// color_thief treats pixels brighter than this on every channel as
/// background.
const WHITE_CUTOFF: u8 = 250;

pub const MAX_COLORS: usize = 16;

/// One palette entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteColor {
    /// `#rrggbb`.
    pub hex: String,
    pub rgb: [u8; 3],
}

impl PaletteColor {
    fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            hex: format!("#{r:02x}{g:02x}{b:02x}"),
            rgb: [r, g, b],
        }
    }
}

/// Up to `count` dominant colors of an encoded image, dominant first.
///
/// `count` is clamped to 1..=16. Fewer colors are returned when the image
/// has fewer distinct ones.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn extract_palette(data: &[u8], count: usize) -> Result<Vec<PaletteColor>, ToolverseError> {
    let count = count.clamp(1, MAX_COLORS);
    let processor = ImageProcessor::from_bytes(data)?;
    let processor = if processor.width() > SAMPLE_EDGE || processor.height() > SAMPLE_EDGE {
        processor.resize(SAMPLE_EDGE, SAMPLE_EDGE)
    } else {
        processor
    };
    let rgba = processor.as_dynamic().to_rgba8();

    let mut sampled = rgba
        .pixels()
        .filter(|p| p.0[3] >= MIN_ALPHA && !p.0[..3].iter().all(|&c| c > WHITE_CUTOFF))
        .map(|p| [p.0[0], p.0[1], p.0[2]]);
    let Some(first) = sampled.next() else {
        return Err(ToolverseError::InvalidInput(
            "image has no opaque, non-white pixels to sample".into(),
        ));
    };
    // A flat image has nothing to quantize; report its color exactly.
    if sampled.all(|rgb| rgb == first) {
        debug!(colors = 1, "Palette extracted");
        return Ok(vec![PaletteColor::new(first[0], first[1], first[2])]);
    }

    // The quantizer needs at least two colors to aim for.
    let max_colors = count.max(2) as u8;
    let colors = color_thief::get_palette(rgba.as_raw(), ColorFormat::Rgba, SAMPLE_STEP, max_colors)
        .map_err(|err| ToolverseError::ImageError(format!("palette quantization failed: {err:?}")))?;

    let mut palette: Vec<PaletteColor> = Vec::with_capacity(count);
    for color in colors {
        let entry = PaletteColor::new(color.r, color.g, color.b);
        if !palette.contains(&entry) {
            palette.push(entry);
        }
    }
    palette.truncate(count);

    debug!(colors = palette.len(), "Palette extracted");
    Ok(palette)
}
