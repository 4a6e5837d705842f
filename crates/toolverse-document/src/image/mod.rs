// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module: decoding, resizing, re-encoding, compression, favicon
// packaging and palette extraction.

pub mod compress;
pub mod favicon;
pub mod palette;
pub mod processor;

pub use compress::{
    compress, convert, parse_quality, parse_quality_or, resize, resize_dimensions, to_jpeg,
};
pub use favicon::{favicon_source_size, package_favicons, render_favicon_set};
pub use palette::extract_palette;
pub use processor::{ImageProcessor, OutputFormat};
