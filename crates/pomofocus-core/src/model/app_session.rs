//! Per-day log of application usage.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Day key layout, e.g. `17Oct26`.
pub const DAY_KEY_FORMAT: &str = "%d%b%y";

/// Seconds of app usage accumulated for one calendar day.
///
/// At most one entry exists per `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSession {
    pub date: String,
    #[serde(with = "hms_duration")]
    pub duration: u64,
}

/// Day key of `instant` in the reporting timezone `zone`.
pub fn day_key(instant: DateTime<Utc>, zone: FixedOffset) -> String {
    instant.with_timezone(&zone).format(DAY_KEY_FORMAT).to_string()
}

/// Add `secs` to the entry for `date`, creating it when missing.
pub fn accumulate(sessions: &mut Vec<AppSession>, date: &str, secs: u64) -> AppSession {
    match sessions.iter_mut().find(|s| s.date == date) {
        Some(existing) => {
            existing.duration = existing.duration.saturating_add(secs);
            existing.clone()
        }
        None => {
            let entry = AppSession {
                date: date.to_string(),
                duration: secs,
            };
            sessions.push(entry.clone());
            entry
        }
    }
}

/// `HH:MM:SS` on the wire; plain seconds are accepted on input too.
pub(crate) mod hms_duration {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::format::{format_hms, parse_hms};

    pub fn serialize<S: Serializer>(secs: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_hms(*secs))
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Secs(u64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Secs(secs) => Ok(secs),
            Raw::Text(text) => parse_hms(&text).ok_or_else(|| {
                de::Error::custom(format!("invalid duration '{text}', expected HH:MM:SS"))
            }),
        }
    }
}
