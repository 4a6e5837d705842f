// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page selection parsing.
//
// Two inputs translate UI page choices into zero-based page indices:
//   - free-form range strings ("1-3, 5, 8-10") from the split tool, which are
//     forgiving: malformed or out-of-range tokens are dropped silently;
//   - JSON page-order arrays ("[3,1,2]") from the reorder tool, which are
//     strict because they come from the page board, not from typing.

use std::collections::BTreeSet;

use toolverse_core::error::ToolverseError;

/// Parse a range string into a sorted, deduplicated list of zero-based page
/// indices for a document of `max_page` pages.
pub fn parse_page_ranges(range: &str, max_page: usize) -> Vec<usize> {
    let mut pages = BTreeSet::new();

    for part in range.split(',') {
        if part.contains('-') {
            let mut bounds = part.split('-').map(parse_int_prefix);
            let start = bounds.next().flatten();
            let end = bounds.next().flatten();
            if let (Some(start), Some(end)) = (start, end) {
                // Only walk the part of the range that can land in the document.
                let lo = start.max(1);
                let hi = end.min(max_page as i64);
                for page in lo..=hi {
                    pages.insert(page as usize - 1);
                }
            }
        } else if let Some(page) = parse_int_prefix(part)
            && page >= 1
            && page <= max_page as i64
        {
            pages.insert(page as usize - 1);
        }
    }

    pages.into_iter().collect()
}

/// Parse a JSON array of 1-based page numbers into zero-based indices,
/// preserving order and repeats.
pub fn parse_page_order(json: &str, page_count: usize) -> Result<Vec<usize>, ToolverseError> {
    let value: serde_json::Value = serde_json::from_str(json).map_err(|err| {
        ToolverseError::InvalidPageSelection(format!("page order is not valid JSON: {err}"))
    })?;
    let items = value.as_array().ok_or_else(|| {
        ToolverseError::InvalidPageSelection("page order must be a JSON array".into())
    })?;
    if items.is_empty() {
        return Err(ToolverseError::NoPagesSelected);
    }

    items
        .iter()
        .map(|item| {
            let page = item.as_u64().ok_or_else(|| {
                ToolverseError::InvalidPageSelection(format!("{item} is not a page number"))
            })?;
            if page == 0 || page as usize > page_count {
                return Err(ToolverseError::InvalidPageSelection(format!(
                    "page {page} out of range (document has {page_count} pages)"
                )));
            }
            Ok(page as usize - 1)
        })
        .collect()
}

/// Lenient integer parse: optional leading whitespace and sign, then the
/// longest run of ASCII digits. `"  12abc"` is 12, `"abc"` and `""` are
/// `None`.
fn parse_int_prefix(token: &str) -> Option<i64> {
    let trimmed = token.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Saturate absurdly long numbers; they are out of range either way.
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
