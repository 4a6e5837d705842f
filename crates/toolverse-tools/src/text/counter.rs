// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Character, word, line and paragraph counts.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// ASCII word characters only; runs of other scripts are not words.
static WORD: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[A-Za-z0-9_'-]+").ok());
static PARAGRAPH_BREAK: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\n\s*\n").ok());

/// Counts for one piece of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStats {
    /// Unicode scalar values.
    pub characters: usize,
    /// Unicode scalar values that are not whitespace.
    pub characters_without_spaces: usize,
    /// Runs of ASCII letters, digits, `_`, apostrophes and hyphens.
    pub words: usize,
    /// `\n`-separated lines; 0 for empty text.
    pub lines: usize,
    /// Non-blank blocks separated by blank lines.
    pub paragraphs: usize,
    /// UTF-8 encoded size.
    pub bytes: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        let trimmed = text.trim();

        let words = match WORD.as_ref() {
            Some(word) if !trimmed.is_empty() => word.find_iter(trimmed).count(),
            _ => 0,
        };

        let paragraphs = match PARAGRAPH_BREAK.as_ref() {
            Some(brk) if !trimmed.is_empty() => brk
                .split(trimmed)
                .filter(|block| !block.trim().is_empty())
                .count(),
            _ => 0,
        };

        Self {
            characters: text.chars().count(),
            characters_without_spaces: text.chars().filter(|c| !c.is_whitespace()).count(),
            words,
            lines: if text.is_empty() {
                0
            } else {
                text.split('\n').count()
            },
            paragraphs,
            bytes: text.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_world() {
        let stats = TextStats::of("hello world");
        assert_eq!(stats.characters, 11);
        assert_eq!(stats.characters_without_spaces, 10);
        assert_eq!(stats.words, 2);
        assert_eq!(stats.lines, 1);
        assert_eq!(stats.paragraphs, 1);
    }

    #[test]
    fn empty_text_is_all_zero() {
        assert_eq!(TextStats::of(""), TextStats::default());
    }

    #[test]
    fn whitespace_only_has_characters_but_no_words() {
        let stats = TextStats::of("  \n ");
        assert_eq!(stats.characters, 4);
        assert_eq!(stats.characters_without_spaces, 0);
        assert_eq!(stats.words, 0);
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.paragraphs, 0);
    }

    #[test]
    fn contractions_and_hyphens_are_one_word() {
        assert_eq!(TextStats::of("don't over-think it").words, 3);
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let text = "first line\nstill first\n\n  \nsecond\n\n\nthird";
        let stats = TextStats::of(text);
        assert_eq!(stats.paragraphs, 3);
        assert_eq!(stats.lines, 8);
    }

    #[test]
    fn counts_scalars_not_bytes() {
        let stats = TextStats::of("안녕 세계");
        assert_eq!(stats.characters, 5);
        assert_eq!(stats.characters_without_spaces, 4);
        assert_eq!(stats.bytes, 13);
    }

    #[test]
    fn words_are_ascii_runs() {
        assert_eq!(TextStats::of("안녕 세계").words, 0);
        assert_eq!(TextStats::of("café au lait").words, 3);
        assert_eq!(TextStats::of("snake_case v2-beta").words, 2);
    }
}
