// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pomodoro timer state machine. The caller drives it with one `tick()` per
// elapsed second; the timer itself never reads a clock.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Longest duration a setting accepts, in minutes.
pub const MAX_MINUTES: u32 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Focus,
    ShortBreak,
    LongBreak,
}

/// Durations in minutes, and how many focus sessions precede a long break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSettings {
    pub focus: u32,
    pub short_break: u32,
    pub long_break: u32,
    pub long_break_interval: u32,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            focus: 25,
            short_break: 5,
            long_break: 15,
            long_break_interval: 4,
        }
    }
}

impl PomodoroSettings {
    pub fn minutes(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Focus => self.focus,
            TimerMode::ShortBreak => self.short_break,
            TimerMode::LongBreak => self.long_break,
        }
    }
}

/// What a `tick()` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer is paused.
    Idle,
    /// One second elapsed.
    Running,
    /// The countdown hit zero and the timer moved to this mode.
    Switched(TimerMode),
}

#[derive(Debug, Clone)]
pub struct PomodoroTimer {
    settings: PomodoroSettings,
    mode: TimerMode,
    remaining_secs: u32,
    active: bool,
    completed: u32,
}

impl PomodoroTimer {
    pub fn new(settings: PomodoroSettings) -> Self {
        Self {
            remaining_secs: settings.focus * 60,
            settings,
            mode: TimerMode::Focus,
            active: false,
            completed: 0,
        }
    }

    pub fn start(&mut self) {
        self.active = true;
    }

    pub fn pause(&mut self) {
        self.active = false;
    }

    /// Start when paused, pause when running.
    pub fn toggle(&mut self) {
        self.active = !self.active;
    }

    /// Back to a paused focus session with no completed pomodoros.
    pub fn reset(&mut self) {
        self.active = false;
        self.mode = TimerMode::Focus;
        self.remaining_secs = self.settings.focus * 60;
        self.completed = 0;
    }

    /// Advance one second. When the countdown reaches zero the timer switches
    /// mode and keeps running: focus ends in a long break every
    /// `long_break_interval` completed sessions and a short break otherwise;
    /// any break ends in focus.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.active {
            return TickOutcome::Idle;
        }
        if self.remaining_secs > 1 {
            self.remaining_secs -= 1;
            return TickOutcome::Running;
        }

        let next = match self.mode {
            TimerMode::Focus => {
                self.completed += 1;
                if self.completed % self.settings.long_break_interval.max(1) == 0 {
                    TimerMode::LongBreak
                } else {
                    TimerMode::ShortBreak
                }
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => TimerMode::Focus,
        };
        debug!(from = ?self.mode, to = ?next, completed = self.completed, "Pomodoro mode switch");

        self.mode = next;
        self.remaining_secs = self.settings.minutes(next) * 60;
        TickOutcome::Switched(next)
    }

    /// Change one duration. Values outside 1..=180 minutes are ignored and
    /// `false` is returned. Changing the active mode's duration pauses the
    /// timer and restarts its countdown from the new value.
    pub fn set_minutes(&mut self, mode: TimerMode, minutes: u32) -> bool {
        if minutes == 0 || minutes > MAX_MINUTES {
            return false;
        }
        match mode {
            TimerMode::Focus => self.settings.focus = minutes,
            TimerMode::ShortBreak => self.settings.short_break = minutes,
            TimerMode::LongBreak => self.settings.long_break = minutes,
        }
        if mode == self.mode {
            self.active = false;
            self.remaining_secs = minutes * 60;
        }
        true
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }

    pub fn settings(&self) -> &PomodoroSettings {
        &self.settings
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format_time(self.remaining_secs)
    }
}

impl Default for PomodoroTimer {
    fn default() -> Self {
        Self::new(PomodoroSettings::default())
    }
}

/// `MM:SS`, minutes zero-padded to at least two digits.
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_out(timer: &mut PomodoroTimer) -> TimerMode {
        loop {
            if let TickOutcome::Switched(mode) = timer.tick() {
                return mode;
            }
        }
    }

    #[test]
    fn starts_paused_on_focus() {
        let mut timer = PomodoroTimer::default();
        assert_eq!(timer.mode(), TimerMode::Focus);
        assert_eq!(timer.display(), "25:00");
        assert_eq!(timer.tick(), TickOutcome::Idle);
        assert_eq!(timer.remaining_secs(), 1500);
    }

    #[test]
    fn counts_down_while_running() {
        let mut timer = PomodoroTimer::default();
        timer.start();
        assert_eq!(timer.tick(), TickOutcome::Running);
        assert_eq!(timer.display(), "24:59");
        timer.pause();
        timer.tick();
        assert_eq!(timer.display(), "24:59");
    }

    #[test]
    fn every_fourth_focus_earns_a_long_break() {
        let mut timer = PomodoroTimer::new(PomodoroSettings {
            focus: 1,
            short_break: 1,
            long_break: 2,
            long_break_interval: 4,
        });
        timer.start();

        let mut sequence = Vec::new();
        for _ in 0..8 {
            sequence.push(run_out(&mut timer));
        }
        use TimerMode::*;
        assert_eq!(
            sequence,
            vec![ShortBreak, Focus, ShortBreak, Focus, ShortBreak, Focus, LongBreak, Focus]
        );
        assert_eq!(timer.completed(), 4);
        assert!(timer.is_active(), "timer keeps running across switches");
    }

    #[test]
    fn switch_loads_next_duration() {
        let mut timer = PomodoroTimer::new(PomodoroSettings {
            focus: 1,
            ..Default::default()
        });
        timer.start();
        for _ in 0..59 {
            assert_eq!(timer.tick(), TickOutcome::Running);
        }
        assert_eq!(timer.tick(), TickOutcome::Switched(TimerMode::ShortBreak));
        assert_eq!(timer.display(), "05:00");
    }

    #[test]
    fn settings_bounds() {
        let mut timer = PomodoroTimer::default();
        assert!(!timer.set_minutes(TimerMode::Focus, 0));
        assert!(!timer.set_minutes(TimerMode::Focus, 181));
        assert!(timer.set_minutes(TimerMode::Focus, 180));
        assert_eq!(timer.display(), "180:00");
    }

    #[test]
    fn changing_active_duration_pauses_and_resets_countdown() {
        let mut timer = PomodoroTimer::default();
        timer.start();
        timer.tick();
        assert!(timer.set_minutes(TimerMode::Focus, 50));
        assert!(!timer.is_active());
        assert_eq!(timer.remaining_secs(), 3000);

        // Other modes do not touch the running countdown.
        timer.start();
        timer.tick();
        assert!(timer.set_minutes(TimerMode::LongBreak, 30));
        assert!(timer.is_active());
        assert_eq!(timer.remaining_secs(), 2999);
    }

    #[test]
    fn reset_clears_progress() {
        let mut timer = PomodoroTimer::new(PomodoroSettings {
            focus: 1,
            ..Default::default()
        });
        timer.start();
        run_out(&mut timer);
        timer.reset();
        assert_eq!(timer.mode(), TimerMode::Focus);
        assert_eq!(timer.completed(), 0);
        assert!(!timer.is_active());
        assert_eq!(timer.display(), "01:00");
    }

    #[test]
    fn time_formatting() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(1500), "25:00");
    }
}
