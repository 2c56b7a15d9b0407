//! Read-only export projection of the dataset.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::format::format_hms;
use crate::model::{accumulate, day_key, Dataset};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub total_projects: usize,
    pub completed_subtasks: usize,
    pub incomplete_subtasks: usize,
    /// `HH:MM:SS`
    pub total_work_time: String,
    /// `HH:MM:SS`
    pub total_break_time: String,
}

/// A deep copy of the dataset plus a computed summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSnapshot {
    #[serde(flatten)]
    pub dataset: Dataset,
    pub summary: ExportSummary,
}

impl ExportSnapshot {
    /// Copy `dataset`, folding the uncommitted `(day key, seconds)` span into
    /// the copy's app session log with the same-day accumulation rule.
    pub fn build(dataset: &Dataset, in_progress: Option<(&str, u64)>) -> Self {
        let mut copy = dataset.clone();
        if let Some((date, secs)) = in_progress {
            accumulate(&mut copy.app_sessions, date, secs);
        }
        let (completed_subtasks, incomplete_subtasks) = copy.subtask_counts();
        let summary = ExportSummary {
            total_projects: copy.projects.len(),
            completed_subtasks,
            incomplete_subtasks,
            total_work_time: format_hms(copy.stats.total_work_time),
            total_break_time: format_hms(copy.stats.total_break_time),
        };
        Self {
            dataset: copy,
            summary,
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Default export file name, e.g. `pomodoro-data-17Oct26.json`.
pub fn export_file_name(now: DateTime<Utc>, zone: FixedOffset) -> String {
    format!("pomodoro-data-{}.json", day_key(now, zone))
}
