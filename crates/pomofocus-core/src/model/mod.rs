//! Domain model: projects, subtasks, settings, stats and the app session log.
//!
//! [`Dataset`] is the unit of persistence, import and export. It is the
//! single root of truth for a running process; ids (`Project::id`,
//! `Subtask::id`, `AppSession::date`) are stable keys and never
//! regenerated for an existing entity.

mod app_session;
mod project;
mod settings;

pub use app_session::{accumulate, day_key, AppSession, DAY_KEY_FORMAT};
pub use project::{NewSubtask, Project, Subtask};
pub use settings::{Settings, SettingsPatch, Stats, StatsPatch};

use serde::{Deserialize, Serialize};

/// The whole application dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub app_sessions: Vec<AppSession>,
}

/// Handle to the subtask credited by work-phase completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTarget {
    pub project_id: String,
    pub subtask_id: Option<String>,
}

impl Dataset {
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn project_mut(&mut self, id: &str) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == id)
    }

    /// Subtask addressed by `target`, if both ids resolve.
    pub fn target_subtask_mut(&mut self, target: &ActiveTarget) -> Option<&mut Subtask> {
        let subtask_id = target.subtask_id.as_deref()?;
        self.project_mut(&target.project_id)?.subtask_mut(subtask_id)
    }

    pub fn app_session(&self, date: &str) -> Option<&AppSession> {
        self.app_sessions.iter().find(|s| s.date == date)
    }

    /// `(completed, incomplete)` subtask counts across all projects.
    pub fn subtask_counts(&self) -> (usize, usize) {
        self.projects
            .iter()
            .flat_map(|p| p.subtasks.iter())
            .fold((0, 0), |(done, open), st| {
                if st.is_completed {
                    (done + 1, open)
                } else {
                    (done, open + 1)
                }
            })
    }
}
