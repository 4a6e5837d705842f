// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text comparison built on the `similar` crate.
//
// `diff` yields a flat list of equal/removed/added segments for inline
// display. `side_by_side` lays the same comparison out as two columns of
// lines, pairing replaced lines and highlighting the words that changed.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};
use toolverse_core::error::ToolverseError;

/// Unit the comparison works in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffGranularity {
    Chars,
    #[default]
    Words,
    Lines,
}

impl FromStr for DiffGranularity {
    type Err = ToolverseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chars" | "char" | "characters" => Ok(Self::Chars),
            "words" | "word" => Ok(Self::Words),
            "lines" | "line" => Ok(Self::Lines),
            other => Err(ToolverseError::InvalidInput(format!(
                "unknown diff granularity {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Equal,
    Added,
    Removed,
}

/// A run of text with one change kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSegment {
    pub kind: ChangeKind,
    pub value: String,
}

impl DiffSegment {
    fn new(kind: ChangeKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Compare `original` against `changed`. Adjacent pieces of the same kind
/// are merged; removals come before the additions that replace them.
pub fn diff(original: &str, changed: &str, granularity: DiffGranularity) -> Vec<DiffSegment> {
    let text_diff = match granularity {
        DiffGranularity::Chars => TextDiff::from_chars(original, changed),
        DiffGranularity::Words => TextDiff::from_words(original, changed),
        DiffGranularity::Lines => TextDiff::from_lines(original, changed),
    };

    let mut segments: Vec<DiffSegment> = Vec::new();
    for change in text_diff.iter_all_changes() {
        let kind = match change.tag() {
            ChangeTag::Equal => ChangeKind::Equal,
            ChangeTag::Delete => ChangeKind::Removed,
            ChangeTag::Insert => ChangeKind::Added,
        };
        match segments.last_mut() {
            Some(last) if last.kind == kind => last.value.push_str(change.value()),
            _ => segments.push(DiffSegment::new(kind, change.value())),
        }
    }
    segments
}

/// How a side-by-side row differs between the two texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Unchanged,
    Removed,
    Added,
    Modified,
}

/// One line of the two-column view. A side is empty when the line only
/// exists in the other text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SideBySideRow {
    pub kind: RowKind,
    pub original: Vec<DiffSegment>,
    pub changed: Vec<DiffSegment>,
}

/// Two-column line comparison. A block of removed lines directly followed by
/// added lines is paired row by row, with a word diff inside each pair.
pub fn side_by_side(original: &str, changed: &str) -> Vec<SideBySideRow> {
    let blocks = diff(original, changed, DiffGranularity::Lines);
    let mut rows = Vec::new();
    let mut i = 0;

    while i < blocks.len() {
        let block = &blocks[i];

        if block.kind == ChangeKind::Removed
            && let Some(next) = blocks.get(i + 1)
            && next.kind == ChangeKind::Added
        {
            let removed = block_lines(&block.value);
            let added = block_lines(&next.value);
            for row in 0..removed.len().max(added.len()) {
                let a = removed.get(row).copied().unwrap_or("");
                let b = added.get(row).copied().unwrap_or("");
                rows.push(modified_row(a, b));
            }
            i += 2;
            continue;
        }

        for line in block_lines(&block.value) {
            let segment = vec![DiffSegment::new(ChangeKind::Equal, line)];
            rows.push(match block.kind {
                ChangeKind::Equal => SideBySideRow {
                    kind: RowKind::Unchanged,
                    original: segment.clone(),
                    changed: segment,
                },
                ChangeKind::Removed => SideBySideRow {
                    kind: RowKind::Removed,
                    original: segment,
                    changed: Vec::new(),
                },
                ChangeKind::Added => SideBySideRow {
                    kind: RowKind::Added,
                    original: Vec::new(),
                    changed: segment,
                },
            });
        }
        i += 1;
    }

    rows
}

fn modified_row(a: &str, b: &str) -> SideBySideRow {
    let words = diff(a, b, DiffGranularity::Words);
    let side = |skip: ChangeKind| {
        words
            .iter()
            .filter(|segment| segment.kind != skip)
            .cloned()
            .collect::<Vec<_>>()
    };
    SideBySideRow {
        kind: RowKind::Modified,
        original: side(ChangeKind::Added),
        changed: side(ChangeKind::Removed),
    }
}

/// Lines of a line-diff block, without their terminators.
fn block_lines(value: &str) -> Vec<&str> {
    if value.is_empty() {
        return Vec::new();
    }
    value
        .strip_suffix('\n')
        .unwrap_or(value)
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(segments: &[DiffSegment]) -> Vec<(ChangeKind, &str)> {
        segments.iter().map(|s| (s.kind, s.value.as_str())).collect()
    }

    #[test]
    fn char_diff_marks_changed_tail() {
        let segments = diff("abc", "abd", DiffGranularity::Chars);
        assert_eq!(
            kinds(&segments),
            vec![
                (ChangeKind::Equal, "ab"),
                (ChangeKind::Removed, "c"),
                (ChangeKind::Added, "d"),
            ]
        );
    }

    #[test]
    fn identical_text_has_no_changes() {
        for granularity in [
            DiffGranularity::Chars,
            DiffGranularity::Words,
            DiffGranularity::Lines,
        ] {
            let segments = diff("same text\nhere", "same text\nhere", granularity);
            assert!(segments.iter().all(|s| s.kind == ChangeKind::Equal));
        }
    }

    #[test]
    fn segments_reassemble_both_sides() {
        let (a, b) = ("the quick brown fox", "the slow brown dog");
        let segments = diff(a, b, DiffGranularity::Words);
        let original: String = segments
            .iter()
            .filter(|s| s.kind != ChangeKind::Added)
            .map(|s| s.value.as_str())
            .collect();
        let changed: String = segments
            .iter()
            .filter(|s| s.kind != ChangeKind::Removed)
            .map(|s| s.value.as_str())
            .collect();
        assert_eq!(original, a);
        assert_eq!(changed, b);
    }

    #[test]
    fn granularity_parsing() {
        assert_eq!(
            "Lines".parse::<DiffGranularity>().expect("parse"),
            DiffGranularity::Lines
        );
        assert!("sentences".parse::<DiffGranularity>().is_err());
    }

    #[test]
    fn side_by_side_pairs_replaced_lines() {
        let rows = side_by_side("keep\nold line\ngone\n", "keep\nnew line\n");

        let row_kinds: Vec<RowKind> = rows.iter().map(|r| r.kind).collect();
        assert_eq!(
            row_kinds,
            vec![RowKind::Unchanged, RowKind::Modified, RowKind::Modified]
        );

        let second = &rows[1];
        assert!(second.original.iter().any(|s| s.kind == ChangeKind::Removed && s.value == "old"));
        assert!(second.changed.iter().any(|s| s.kind == ChangeKind::Added && s.value == "new"));

        // "gone" has no counterpart.
        assert!(rows[2].changed.is_empty());
    }

    #[test]
    fn side_by_side_keeps_last_line_without_newline() {
        let rows = side_by_side("a", "b");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, RowKind::Modified);
    }

    #[test]
    fn side_by_side_pure_insertion() {
        let rows = side_by_side("a\n", "a\nb\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].kind, RowKind::Added);
        assert!(rows[1].original.is_empty());
        assert_eq!(rows[1].changed[0].value, "b");
    }
}
