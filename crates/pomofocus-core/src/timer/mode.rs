use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The three timer phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    Work,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub const ALL: [TimerMode; 3] = [TimerMode::Work, TimerMode::ShortBreak, TimerMode::LongBreak];

    pub fn is_break(self) -> bool {
        match self {
            TimerMode::Work => false,
            TimerMode::ShortBreak | TimerMode::LongBreak => true,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Work => "Work",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimerMode::Work => "work",
            TimerMode::ShortBreak => "short_break",
            TimerMode::LongBreak => "long_break",
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimerMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "work" | "pomodoro" | "focus" => Ok(TimerMode::Work),
            "shortbreak" | "short" => Ok(TimerMode::ShortBreak),
            "longbreak" | "long" => Ok(TimerMode::LongBreak),
            _ => Err(ValidationError::invalid(
                "mode",
                format!("unknown timer mode '{s}' (expected work, short-break or long-break)"),
            )),
        }
    }
}
