// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module: reading, page selection, reassembly, ordering and rendering.

pub mod assemble;
pub mod board;
pub mod ops;
pub mod range;
pub mod reader;

#[cfg(feature = "render")]
pub mod thumbnail;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use assemble::PdfAssembler;
pub use ops::{SplitMode, SplitPart};
pub use range::{parse_page_order, parse_page_ranges};
pub use reader::PdfReader;
