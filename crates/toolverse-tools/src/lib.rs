// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// toolverse-tools: Self-contained tools that need no file processing: text
// statistics and diffs, password/PIN generation, color helpers, date
// calculators and the pomodoro timer.

pub mod color;
pub mod date;
pub mod productivity;
mod random;
pub mod security;
pub mod text;

pub use color::PaletteGenerator;
pub use productivity::pomodoro::PomodoroTimer;
pub use security::password::{PasswordError, PasswordOptions};
pub use text::counter::TextStats;
pub use text::diff::{DiffGranularity, DiffSegment};
