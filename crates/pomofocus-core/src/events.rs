use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reconcile::ImportMode;
use crate::timer::TimerMode;

/// Every state change in the system produces an Event.
/// Hosts render them; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    ModeChanged {
        from: TimerMode,
        to: TimerMode,
        remaining_secs: u64,
        session_index: u32,
        at: DateTime<Utc>,
    },
    /// A phase ran down to zero.
    PhaseCompleted {
        mode: TimerMode,
        duration_secs: u64,
        session_index: u32,
        at: DateTime<Utc>,
    },
    /// Work completion credited the active subtask.
    SubtaskProgressed {
        project_id: String,
        subtask_id: String,
        completed_sessions: u32,
        total_sessions: u32,
        is_completed: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: TimerMode,
        running: bool,
        remaining_secs: u64,
        total_secs: u64,
        session_index: u32,
        sessions_before_long_break: u32,
        session_label: String,
        at: DateTime<Utc>,
    },
    AppSessionCommitted {
        date: String,
        added_secs: u64,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    DataImported {
        mode: ImportMode,
        projects_added: usize,
        projects_skipped: usize,
        sessions_added: usize,
        sessions_skipped: usize,
        at: DateTime<Utc>,
    },
}
