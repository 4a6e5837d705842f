// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Password and PIN generation using the OS CSPRNG (`ring`), with a zxcvbn
// strength estimate.

use ring::rand::SystemRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use toolverse_core::error::ToolverseError;
use tracing::{debug, instrument};
use zxcvbn::zxcvbn;

use crate::random::uniform_below;

pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const NUMBERS: &str = "0123456789";
pub const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("select at least one character type")]
    NoCharset,

    #[error("random number generator failed")]
    Rng,
}

impl From<PasswordError> for ToolverseError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::NoCharset => ToolverseError::InvalidInput(err.to_string()),
            PasswordError::Rng => ToolverseError::Io(std::io::Error::other(err.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordMode {
    #[default]
    Password,
    /// Digits only; the class switches are ignored.
    Pin,
}

impl PasswordMode {
    /// Allowed length range.
    pub fn length_bounds(self) -> (usize, usize) {
        match self {
            Self::Password => (8, 64),
            Self::Pin => (4, 12),
        }
    }
}

/// What to generate. Field names match the JSON the generator endpoint takes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordOptions {
    pub length: usize,
    pub uppercase: bool,
    pub lowercase: bool,
    pub numbers: bool,
    pub symbols: bool,
    pub mode: PasswordMode,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            length: 12,
            uppercase: true,
            lowercase: true,
            numbers: true,
            symbols: false,
            mode: PasswordMode::Password,
        }
    }
}

impl PasswordOptions {
    /// Requested length clamped to the mode's bounds.
    pub fn effective_length(&self) -> usize {
        let (min, max) = self.mode.length_bounds();
        self.length.clamp(min, max)
    }

    /// Number of character classes enabled (a PIN counts as one).
    pub fn class_count(&self) -> usize {
        match self.mode {
            PasswordMode::Pin => 1,
            PasswordMode::Password => [self.uppercase, self.lowercase, self.numbers, self.symbols]
                .into_iter()
                .filter(|&on| on)
                .count(),
        }
    }

    /// Concatenation of the selected character sets.
    pub fn charset(&self) -> Result<Vec<u8>, PasswordError> {
        if self.mode == PasswordMode::Pin {
            return Ok(NUMBERS.as_bytes().to_vec());
        }
        let charset: Vec<u8> = [
            (self.uppercase, UPPERCASE),
            (self.lowercase, LOWERCASE),
            (self.numbers, NUMBERS),
            (self.symbols, SYMBOLS),
        ]
        .into_iter()
        .filter(|(on, _)| *on)
        .flat_map(|(_, set)| set.bytes())
        .collect();

        if charset.is_empty() {
            return Err(PasswordError::NoCharset);
        }
        Ok(charset)
    }
}

/// Generate a password of exactly [`PasswordOptions::effective_length`]
/// characters, each drawn uniformly from the selected charset.
#[instrument(skip(options), fields(mode = ?options.mode, length = options.effective_length()))]
pub fn generate(options: &PasswordOptions) -> Result<String, PasswordError> {
    let charset = options.charset()?;
    let rng = SystemRandom::new();
    let length = options.effective_length();

    let mut password = String::with_capacity(length);
    for _ in 0..length {
        let index = uniform_below(&rng, charset.len() as u32).map_err(|_| PasswordError::Rng)?;
        password.push(char::from(charset[index as usize]));
    }

    debug!(charset_len = charset.len(), "Password generated");
    Ok(password)
}

/// Strength estimate on a 0 (too weak) to 4 (very strong) scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Strength {
    pub score: u8,
    pub label: &'static str,
}

const LABELS: [&str; 5] = ["too weak", "weak", "fair", "strong", "very strong"];

/// Rate `password` with zxcvbn (dictionary words, l33t substitutions,
/// keyboard walks, dates and repeats all lower the score). With fewer than
/// two character classes selected a score of 3 or more is capped at 2.
pub fn strength(password: &str, class_count: usize) -> Strength {
    let raw = raw_score(password);
    let score = if class_count < 2 && raw >= 3 { 2 } else { raw };
    Strength {
        score,
        label: LABELS[score as usize],
    }
}

fn raw_score(password: &str) -> u8 {
    if password.is_empty() {
        return 0;
    }
    (zxcvbn(password, &[]).score() as u8).min(4)
}
