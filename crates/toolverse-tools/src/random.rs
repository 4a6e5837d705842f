// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unbiased random integers from the OS CSPRNG.

use ring::error::Unspecified;
use ring::rand::{SecureRandom, SystemRandom};

/// Uniform value in `0..bound` by rejection sampling over random `u32`s, so
/// no value is favoured by modulo bias. `bound` must be non-zero.
pub(crate) fn uniform_below(rng: &SystemRandom, bound: u32) -> Result<u32, Unspecified> {
    debug_assert!(bound > 0);
    // Largest multiple of `bound` that fits in u32 space.
    let zone = u32::MAX - (u32::MAX % bound);
    loop {
        let mut buf = [0u8; 4];
        rng.fill(&mut buf)?;
        let value = u32::from_le_bytes(buf);
        if value < zone {
            return Ok(value % bound);
        }
    }
}

/// Uniform value in `lo..=hi`.
pub(crate) fn uniform_inclusive(rng: &SystemRandom, lo: u32, hi: u32) -> Result<u32, Unspecified> {
    Ok(lo + uniform_below(rng, hi - lo + 1)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_in_range() {
        let rng = SystemRandom::new();
        for _ in 0..500 {
            let v = uniform_inclusive(&rng, 40, 70).expect("rng");
            assert!((40..=70).contains(&v));
        }
        assert_eq!(uniform_below(&rng, 1).expect("rng"), 0);
    }
}
