//! Projects and the subtasks that own session targets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{RejectedAdjustment, ValidationError};

/// A unit of work that needs `total_sessions` completed work phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: String,
    pub name: String,
    pub total_sessions: u32,
    #[serde(default)]
    pub completed_sessions: u32,
    #[serde(default)]
    pub is_completed: bool,
}

impl Subtask {
    /// Fresh subtask with a new id and no completed sessions.
    pub fn new(name: impl Into<String>, total_sessions: u32) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::EmptyName("subtask"));
        }
        if total_sessions == 0 {
            return Err(ValidationError::invalid(
                "totalSessions",
                "must be at least 1",
            ));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name,
            total_sessions,
            completed_sessions: 0,
            is_completed: false,
        })
    }

    /// Credit one completed work phase.
    ///
    /// Returns `false` and leaves the counters alone once the target is met.
    pub fn record_session(&mut self) -> bool {
        if self.completed_sessions >= self.total_sessions {
            return false;
        }
        self.completed_sessions += 1;
        self.sync_completed();
        true
    }

    /// Move the session target by `delta`.
    ///
    /// The new total must stay `>= completed_sessions` and `>= 1`;
    /// otherwise nothing changes.
    pub fn adjust_session_target(&mut self, delta: i64) -> Result<(), RejectedAdjustment> {
        let rejected = RejectedAdjustment {
            total: self.total_sessions,
            completed: self.completed_sessions,
            delta,
        };
        let new_total = i64::from(self.total_sessions)
            .checked_add(delta)
            .ok_or(rejected)?;
        if new_total < i64::from(self.completed_sessions) || new_total < 1 {
            return Err(rejected);
        }
        self.total_sessions = u32::try_from(new_total).map_err(|_| rejected)?;
        self.sync_completed();
        Ok(())
    }

    /// Check the counter invariants of a record that came from outside.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName("subtask"));
        }
        if self.total_sessions == 0 {
            return Err(ValidationError::invalid(
                "totalSessions",
                format!("subtask {} must target at least 1 session", self.id),
            ));
        }
        if self.completed_sessions > self.total_sessions {
            return Err(ValidationError::CompletedExceedsTotal {
                id: self.id.clone(),
                completed: self.completed_sessions,
                total: self.total_sessions,
            });
        }
        Ok(())
    }

    pub(crate) fn sync_completed(&mut self) {
        self.is_completed = self.completed_sessions >= self.total_sessions;
    }
}

/// Input for a subtask at project creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubtask {
    pub name: String,
    pub sessions: u32,
}

impl NewSubtask {
    pub fn new(name: impl Into<String>, sessions: u32) -> Self {
        Self {
            name: name.into(),
            sessions,
        }
    }
}

/// A project owns an ordered list of subtasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Project {
    pub fn new(
        name: impl Into<String>,
        subtasks: Vec<NewSubtask>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::EmptyName("project"));
        }
        let subtasks = subtasks
            .into_iter()
            .map(|st| Subtask::new(st.name, st.sessions))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name,
            created_at,
            subtasks,
        })
    }

    pub fn subtask(&self, id: &str) -> Option<&Subtask> {
        self.subtasks.iter().find(|s| s.id == id)
    }

    pub fn subtask_mut(&mut self, id: &str) -> Option<&mut Subtask> {
        self.subtasks.iter_mut().find(|s| s.id == id)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName("project"));
        }
        self.subtasks.iter().try_for_each(Subtask::validate)
    }
}
