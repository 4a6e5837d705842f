// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Favicon packaging: bundle PNG icons with a multi-resolution favicon.ico.

use std::sync::LazyLock;

use image::ExtendedColorType;
use image::codecs::ico::{IcoEncoder, IcoFrame};
use regex::Regex;
use toolverse_core::error::ToolverseError;
use toolverse_core::types::{MIME_PNG, UploadedFile};
use tracing::{debug, info, instrument, warn};

use crate::image::processor::ImageProcessor;

/// Name of the ICO entry in the bundle.
pub const ICO_NAME: &str = "favicon.ico";

/// PNG sizes that go into favicon.ico.
const ICO_SIZES: [u32; 4] = [16, 24, 32, 48];

/// The set generated from a single source image: (edge length, file name).
const FAVICON_SET: [(u32, &str); 6] = [
    (16, "favicon-16x16.png"),
    (32, "favicon-32x32.png"),
    (48, "favicon-48x48.png"),
    (180, "apple-touch-icon-180x180.png"),
    (192, "android-chrome-192x192.png"),
    (512, "android-chrome-512x512.png"),
];

static SIZE_SUFFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d+)x\d+\.png$").ok());

/// Icon edge length encoded in a file name such as `favicon-32x32.png`.
pub fn favicon_source_size(name: &str) -> Option<u32> {
    SIZE_SUFFIX
        .as_ref()?
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Bundle entries for uploaded icons: every PNG under its own name, then a
/// `favicon.ico` built from the 16/24/32/48 px ones. The ICO is left out when
/// none of the uploads has one of those sizes.
#[instrument(skip_all, fields(files = pngs.len()))]
pub fn package_favicons(pngs: &[UploadedFile]) -> Result<Vec<(String, Vec<u8>)>, ToolverseError> {
    if pngs.is_empty() {
        return Err(ToolverseError::NoFiles);
    }

    let mut entries = Vec::with_capacity(pngs.len() + 1);
    let mut ico_sources = Vec::new();

    for png in pngs {
        entries.push((png.name.clone(), png.bytes.clone()));
        match favicon_source_size(&png.name) {
            Some(size) if ICO_SIZES.contains(&size) => ico_sources.push(png),
            _ => debug!(name = %png.name, "Not an ICO source size"),
        }
    }

    if ico_sources.is_empty() {
        warn!("No 16/24/32/48 px icons uploaded, skipping favicon.ico");
    } else {
        let ico = build_ico(&ico_sources)?;
        entries.push((ICO_NAME.to_string(), ico));
    }

    info!(entries = entries.len(), "Favicons packaged");
    Ok(entries)
}

/// Render the standard favicon PNG set (16, 32, 48, 180, 192, 512 px) from
/// one source image and package it like [`package_favicons`].
#[instrument(skip_all, fields(name = %source.name))]
pub fn render_favicon_set(source: &UploadedFile) -> Result<Vec<(String, Vec<u8>)>, ToolverseError> {
    let processor = ImageProcessor::from_bytes(&source.bytes)?;

    let mut pngs = Vec::with_capacity(FAVICON_SET.len());
    for (size, name) in FAVICON_SET {
        let bytes = ImageProcessor::from_dynamic(processor.as_dynamic().clone())
            .resize_exact(size, size)
            .to_png_bytes()?;
        pngs.push(UploadedFile::new(name, bytes, MIME_PNG));
    }

    package_favicons(&pngs)
}

/// Encode the given PNG uploads as frames of one ICO file, smallest first.
fn build_ico(sources: &[&UploadedFile]) -> Result<Vec<u8>, ToolverseError> {
    let mut decoded = Vec::with_capacity(sources.len());
    for source in sources {
        let processor = ImageProcessor::from_bytes(&source.bytes).map_err(|err| {
            ToolverseError::ImageError(format!("{}: {}", source.name, err))
        })?;
        decoded.push(processor.as_dynamic().to_rgba8());
    }
    decoded.sort_by_key(|rgba| rgba.width());

    let frames = decoded
        .iter()
        .map(|rgba| {
            IcoFrame::as_png(rgba.as_raw(), rgba.width(), rgba.height(), ExtendedColorType::Rgba8)
                .map_err(|err| ToolverseError::ImageError(format!("ICO frame failed: {}", err)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut ico = Vec::new();
    IcoEncoder::new(&mut ico)
        .encode_images(&frames)
        .map_err(|err| ToolverseError::ImageError(format!("ICO encoding failed: {}", err)))?;
    Ok(ico)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::sample_png;

    fn png(name: &str, size: u32) -> UploadedFile {
        UploadedFile::new(name, sample_png(size, size), MIME_PNG)
    }

    #[test]
    fn size_from_file_name() {
        assert_eq!(favicon_source_size("favicon-32x32.png"), Some(32));
        assert_eq!(favicon_source_size("icon_180x180.png"), Some(180));
        assert_eq!(favicon_source_size("favicon-32x32.jpg"), None);
        assert_eq!(favicon_source_size("logo.png"), None);
    }

    #[test]
    fn ico_built_from_small_sizes() {
        let entries = package_favicons(&[
            png("favicon-16x16.png", 16),
            png("favicon-32x32.png", 32),
            png("apple-touch-icon-180x180.png", 180),
        ])
        .expect("package");

        let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            [
                "favicon-16x16.png",
                "favicon-32x32.png",
                "apple-touch-icon-180x180.png",
                "favicon.ico"
            ]
        );

        let ico = &entries[3].1;
        // ICONDIR: reserved 0, type 1, two images.
        assert_eq!(&ico[..6], &[0, 0, 1, 0, 2, 0]);
    }

    #[test]
    fn no_ico_without_small_sizes() {
        let entries = package_favicons(&[png("icon-192x192.png", 192)]).expect("package");
        assert_eq!(entries.len(), 1);
        assert!(entries.iter().all(|(name, _)| name != ICO_NAME));
    }

    #[test]
    fn empty_upload_is_rejected() {
        assert!(matches!(package_favicons(&[]), Err(ToolverseError::NoFiles)));
    }

    #[test]
    fn full_set_from_one_image() {
        let entries = render_favicon_set(&png("logo.png", 64)).expect("render");
        assert_eq!(entries.len(), FAVICON_SET.len() + 1);
        assert_eq!(entries.last().map(|(n, _)| n.as_str()), Some(ICO_NAME));

        let big = ImageProcessor::from_bytes(&entries[5].1).expect("decode");
        assert_eq!((big.width(), big.height()), (512, 512));
    }
}
