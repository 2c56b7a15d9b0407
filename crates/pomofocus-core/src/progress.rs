//! Aggregate time and progress metrics for a project.
//!
//! Recomputed on demand from the subtasks; nothing here is cached.

use serde::{Deserialize, Serialize};

use crate::model::{Project, Settings};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProgress {
    pub total_sessions: u64,
    pub completed_sessions: u64,
    /// Seconds of work credited so far.
    pub spent_time: u64,
    /// Seconds of work still planned.
    pub remaining_time: u64,
    /// 0.0 .. 100.0
    pub progress: f64,
}

impl ProjectProgress {
    /// Sum the subtasks of `project`, pricing each session at the current
    /// work duration.
    pub fn of(project: &Project, settings: &Settings) -> Self {
        let (total_sessions, completed_sessions) =
            project.subtasks.iter().fold((0u64, 0u64), |(total, done), st| {
                (
                    total + u64::from(st.total_sessions),
                    done + u64::from(st.completed_sessions),
                )
            });
        let session_secs = u64::from(settings.work_duration) * 60;
        let progress = if total_sessions > 0 {
            completed_sessions as f64 / total_sessions as f64 * 100.0
        } else {
            0.0
        };
        Self {
            total_sessions,
            completed_sessions,
            spent_time: completed_sessions.saturating_mul(session_secs),
            remaining_time: total_sessions
                .saturating_sub(completed_sessions)
                .saturating_mul(session_secs),
            progress,
        }
    }
}
