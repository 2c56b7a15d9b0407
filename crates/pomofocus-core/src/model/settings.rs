//! Pomodoro durations and accumulated time statistics.
//!
//! Both live in the dataset (not in host config) so they travel with
//! import and export.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::timer::TimerMode;

/// Phase durations in minutes.
///
/// Read by the timer engine whenever it enters a phase, so edits take
/// effect on the next phase transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_work_duration")]
    pub work_duration: u32,
    #[serde(default = "default_short_break")]
    pub short_break_duration: u32,
    #[serde(default = "default_long_break")]
    pub long_break_duration: u32,
    #[serde(default = "default_sessions_before_long_break")]
    pub sessions_before_long_break: u32,
}

fn default_work_duration() -> u32 {
    25
}
fn default_short_break() -> u32 {
    5
}
fn default_long_break() -> u32 {
    15
}
fn default_sessions_before_long_break() -> u32 {
    4
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_duration: default_work_duration(),
            short_break_duration: default_short_break(),
            long_break_duration: default_long_break(),
            sessions_before_long_break: default_sessions_before_long_break(),
        }
    }
}

impl Settings {
    /// Configured length of `mode` in minutes.
    pub fn duration_min(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Work => self.work_duration,
            TimerMode::ShortBreak => self.short_break_duration,
            TimerMode::LongBreak => self.long_break_duration,
        }
    }

    /// Configured length of `mode` in seconds.
    pub fn duration_secs(&self, mode: TimerMode) -> u64 {
        u64::from(self.duration_min(mode)) * 60
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("workDuration", self.work_duration),
            ("shortBreakDuration", self.short_break_duration),
            ("longBreakDuration", self.long_break_duration),
        ] {
            if value == 0 {
                return Err(ValidationError::invalid(field, "must be at least 1 minute"));
            }
        }
        if self.sessions_before_long_break == 0 {
            return Err(ValidationError::invalid(
                "sessionsBeforeLongBreak",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Apply `patch` key by key and validate the result.
    ///
    /// `self` is left untouched when the patched settings are invalid.
    pub fn patched(&self, patch: &SettingsPatch) -> Result<Settings, ValidationError> {
        let next = Settings {
            work_duration: patch.work_duration.unwrap_or(self.work_duration),
            short_break_duration: patch
                .short_break_duration
                .unwrap_or(self.short_break_duration),
            long_break_duration: patch
                .long_break_duration
                .unwrap_or(self.long_break_duration),
            sessions_before_long_break: patch
                .sessions_before_long_break
                .unwrap_or(self.sessions_before_long_break),
        };
        next.validate()?;
        Ok(next)
    }
}

/// Partial settings; absent keys keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default)]
    pub work_duration: Option<u32>,
    #[serde(default)]
    pub short_break_duration: Option<u32>,
    #[serde(default)]
    pub long_break_duration: Option<u32>,
    #[serde(default)]
    pub sessions_before_long_break: Option<u32>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == SettingsPatch::default()
    }
}

/// Accumulated phase time in seconds. Both counters only grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(default)]
    pub total_work_time: u64,
    #[serde(default)]
    pub total_break_time: u64,
}

impl Stats {
    pub fn add_work(&mut self, secs: u64) {
        self.total_work_time = self.total_work_time.saturating_add(secs);
    }

    pub fn add_break(&mut self, secs: u64) {
        self.total_break_time = self.total_break_time.saturating_add(secs);
    }
}

/// Partial stats as found in an import payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsPatch {
    #[serde(default)]
    pub total_work_time: Option<u64>,
    #[serde(default)]
    pub total_break_time: Option<u64>,
}

impl StatsPatch {
    pub fn over(&self, base: Stats) -> Stats {
        Stats {
            total_work_time: self.total_work_time.unwrap_or(base.total_work_time),
            total_break_time: self.total_break_time.unwrap_or(base.total_break_time),
        }
    }
}
