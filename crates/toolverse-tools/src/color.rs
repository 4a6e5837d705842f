// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Color helpers: HSL/hex conversion, readable text color, lockable pastel
// palettes and CSS gradient snippets.

use ring::rand::SystemRandom;
use serde::Serialize;
use thiserror::Error;
use toolverse_core::error::ToolverseError;

use crate::random::uniform_inclusive;

/// Swatches in a generated palette.
pub const PALETTE_SIZE: usize = 5;

#[derive(Debug, Error)]
pub enum ColorError {
    #[error("invalid hex color {0:?}")]
    InvalidHex(String),

    #[error("no swatch at position {0}")]
    NoSwatch(usize),

    #[error("a gradient needs at least two colors")]
    TooFewStops,

    #[error("random number generator failed")]
    Rng,
}

impl From<ColorError> for ToolverseError {
    fn from(err: ColorError) -> Self {
        match err {
            ColorError::Rng => ToolverseError::Io(std::io::Error::other(err.to_string())),
            other => ToolverseError::InvalidInput(other.to_string()),
        }
    }
}

/// `#rrggbb` for a hue in degrees and saturation/lightness in percent.
pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    let l = l / 100.0;
    let a = s * l.min(1.0 - l) / 100.0;
    let channel = |n: f64| {
        let k = (n + h / 30.0) % 12.0;
        let color = l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0);
        (255.0 * color).round().clamp(0.0, 255.0) as u8
    };
    format!("#{:02x}{:02x}{:02x}", channel(0.0), channel(8.0), channel(4.0))
}

/// Parse `#rgb` or `#rrggbb` (the `#` is optional).
pub fn parse_hex(hex: &str) -> Result<[u8; 3], ColorError> {
    let digits = hex.trim().trim_start_matches('#');
    let invalid = || ColorError::InvalidHex(hex.to_string());
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Err(invalid()),
    };
    let value = u32::from_str_radix(&expanded, 16).map_err(|_| invalid())?;
    Ok([(value >> 16) as u8, (value >> 8) as u8, value as u8])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextColor {
    White,
    Black,
}

impl TextColor {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

/// Text color that stays readable on `background`: white when the Rec. 709
/// luma is below 128, black otherwise.
pub fn contrast_text_color(background: &str) -> Result<TextColor, ColorError> {
    let [r, g, b] = parse_hex(background)?;
    let luma = 0.2126 * f64::from(r) + 0.7152 * f64::from(g) + 0.0722 * f64::from(b);
    Ok(if luma < 128.0 {
        TextColor::White
    } else {
        TextColor::Black
    })
}

/// `background-image: linear-gradient(to right, c1, c2, ...);`
pub fn linear_gradient_css(colors: &[&str]) -> Result<String, ColorError> {
    if colors.len() < 2 {
        return Err(ColorError::TooFewStops);
    }
    for color in colors {
        parse_hex(color)?;
    }
    Ok(format!(
        "background-image: linear-gradient(to right, {});",
        colors.join(", ")
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Swatch {
    pub hex: String,
    pub is_locked: bool,
}

/// A row of pastel swatches. Regenerating replaces every swatch that is not
/// locked.
#[derive(Debug)]
pub struct PaletteGenerator {
    swatches: Vec<Swatch>,
    rng: SystemRandom,
}

impl PaletteGenerator {
    /// A fresh palette of [`PALETTE_SIZE`] unlocked swatches.
    pub fn new() -> Result<Self, ColorError> {
        let rng = SystemRandom::new();
        let swatches = (0..PALETTE_SIZE)
            .map(|_| {
                Ok(Swatch {
                    hex: random_pastel(&rng)?,
                    is_locked: false,
                })
            })
            .collect::<Result<Vec<_>, ColorError>>()?;
        Ok(Self { swatches, rng })
    }

    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    /// Replace every unlocked swatch with a new random color.
    pub fn regenerate(&mut self) -> Result<(), ColorError> {
        for swatch in self.swatches.iter_mut().filter(|s| !s.is_locked) {
            swatch.hex = random_pastel(&self.rng)?;
        }
        Ok(())
    }

    /// Flip the lock on one swatch; returns the new state.
    pub fn toggle_lock(&mut self, index: usize) -> Result<bool, ColorError> {
        let swatch = self
            .swatches
            .get_mut(index)
            .ok_or(ColorError::NoSwatch(index))?;
        swatch.is_locked = !swatch.is_locked;
        Ok(swatch.is_locked)
    }
}

/// Hue 0..=360, saturation 40..=70 %, lightness 60..=80 %.
fn random_pastel(rng: &SystemRandom) -> Result<String, ColorError> {
    let hue = uniform_inclusive(rng, 0, 360).map_err(|_| ColorError::Rng)?;
    let saturation = uniform_inclusive(rng, 40, 70).map_err(|_| ColorError::Rng)?;
    let lightness = uniform_inclusive(rng, 60, 80).map_err(|_| ColorError::Rng)?;
    Ok(hsl_to_hex(
        f64::from(hue),
        f64::from(saturation),
        f64::from(lightness),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_hues() {
        assert_eq!(hsl_to_hex(0.0, 100.0, 50.0), "#ff0000");
        assert_eq!(hsl_to_hex(120.0, 100.0, 50.0), "#00ff00");
        assert_eq!(hsl_to_hex(240.0, 100.0, 50.0), "#0000ff");
        assert_eq!(hsl_to_hex(360.0, 100.0, 50.0), "#ff0000");
    }

    #[test]
    fn greys_and_extremes() {
        assert_eq!(hsl_to_hex(0.0, 0.0, 0.0), "#000000");
        assert_eq!(hsl_to_hex(200.0, 0.0, 100.0), "#ffffff");
        assert_eq!(hsl_to_hex(0.0, 0.0, 50.0), "#808080");
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(parse_hex("#ff8000").expect("parse"), [255, 128, 0]);
        assert_eq!(parse_hex("0f0").expect("parse"), [0, 255, 0]);
        assert!(parse_hex("#12345").is_err());
        assert!(parse_hex("#gg0000").is_err());
    }

    #[test]
    fn contrast_follows_luma() {
        assert_eq!(contrast_text_color("#000000").expect("c"), TextColor::White);
        assert_eq!(contrast_text_color("#ffffff").expect("c"), TextColor::Black);
        // Pure blue is dark (luma 18.4), pure green is light (182.4).
        assert_eq!(contrast_text_color("#0000ff").expect("c"), TextColor::White);
        assert_eq!(contrast_text_color("#00ff00").expect("c"), TextColor::Black);
    }

    #[test]
    fn gradient_css() {
        assert_eq!(
            linear_gradient_css(&["#ff0000", "#0000ff"]).expect("css"),
            "background-image: linear-gradient(to right, #ff0000, #0000ff);"
        );
        assert!(linear_gradient_css(&["#ff0000"]).is_err());
        assert!(linear_gradient_css(&["#ff0000", "blue"]).is_err());
    }

    #[test]
    fn palette_has_five_pastels() {
        let palette = PaletteGenerator::new().expect("palette");
        assert_eq!(palette.swatches().len(), PALETTE_SIZE);
        for swatch in palette.swatches() {
            assert!(parse_hex(&swatch.hex).is_ok());
            // Lightness >= 60 % keeps every channel well above black.
            let [r, g, b] = parse_hex(&swatch.hex).expect("hex");
            assert!(r.max(g).max(b) >= 153);
        }
    }

    #[test]
    fn locked_swatches_survive_regeneration() {
        let mut palette = PaletteGenerator::new().expect("palette");
        assert!(palette.toggle_lock(1).expect("lock"));
        let locked = palette.swatches()[1].clone();

        for _ in 0..10 {
            palette.regenerate().expect("regenerate");
            assert_eq!(palette.swatches()[1], locked);
        }

        assert!(!palette.toggle_lock(1).expect("unlock"));
        assert!(matches!(palette.toggle_lock(9), Err(ColorError::NoSwatch(9))));
    }
}
