//! Import of an external dataset into the current one.
//!
//! ## Modes
//!
//! - **Replace**: the incoming dataset wins. Missing settings/stats keys fall
//!   back to defaults key by key; `projects` and `appSessions` are taken
//!   as a whole (or default to empty).
//! - **Merge**: incoming projects and app sessions whose id/date is new are
//!   appended. Existing entries are authoritative and never touched, and
//!   durations are never summed.
//!
//! Reconciliation is a pure function from `(current, payload)` to a new
//! dataset; the caller swaps it in as a whole, so a failed import leaves
//! nothing behind.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ImportError, ValidationError};
use crate::model::{AppSession, Dataset, Project, Settings, SettingsPatch, Stats, StatsPatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportMode {
    Replace,
    Merge,
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImportMode::Replace => "replace",
            ImportMode::Merge => "merge",
        })
    }
}

impl FromStr for ImportMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(ImportMode::Replace),
            "merge" => Ok(ImportMode::Merge),
            _ => Err(ValidationError::invalid(
                "mode",
                format!("unknown import mode '{s}' (expected replace or merge)"),
            )),
        }
    }
}

/// Result of a successful reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub mode: ImportMode,
    pub dataset: Dataset,
    pub projects_added: usize,
    pub projects_skipped: usize,
    pub sessions_added: usize,
    pub sessions_skipped: usize,
}

/// Shape accepted on import. Unknown keys (e.g. an export `summary`) are
/// ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomingDataset {
    projects: Vec<Project>,
    #[serde(default)]
    settings: Option<SettingsPatch>,
    #[serde(default)]
    stats: Option<StatsPatch>,
    #[serde(default)]
    app_sessions: Option<Vec<AppSession>>,
}

/// Parse `payload` as JSON and reconcile it against `current`.
pub fn reconcile(current: &Dataset, payload: &str, mode: ImportMode) -> Result<ImportReport, ImportError> {
    let value: serde_json::Value = serde_json::from_str(payload)?;
    reconcile_value(current, value, mode)
}

/// Reconcile an already-parsed JSON document against `current`.
pub fn reconcile_value(
    current: &Dataset,
    value: serde_json::Value,
    mode: ImportMode,
) -> Result<ImportReport, ImportError> {
    let incoming = validate(value)?;
    let report = match mode {
        ImportMode::Replace => replace(incoming)?,
        ImportMode::Merge => merge(current, incoming),
    };
    tracing::info!(
        mode = %report.mode,
        projects_added = report.projects_added,
        projects_skipped = report.projects_skipped,
        sessions_added = report.sessions_added,
        sessions_skipped = report.sessions_skipped,
        "dataset reconciled"
    );
    Ok(report)
}

fn validate(value: serde_json::Value) -> Result<IncomingDataset, ImportError> {
    match value.get("projects") {
        Some(serde_json::Value::Array(_)) => {}
        _ => return Err(ImportError::Format("missing projects array".into())),
    }
    let mut incoming: IncomingDataset = serde_json::from_value(value)?;
    for project in &mut incoming.projects {
        project.validate()?;
        for subtask in &mut project.subtasks {
            subtask.sync_completed();
        }
    }
    Ok(incoming)
}

fn replace(incoming: IncomingDataset) -> Result<ImportReport, ImportError> {
    let settings = Settings::default().patched(&incoming.settings.unwrap_or_default())?;
    let stats = incoming.stats.unwrap_or_default().over(Stats::default());

    let mut dataset = Dataset {
        projects: Vec::new(),
        settings,
        stats,
        app_sessions: Vec::new(),
    };
    let (projects_added, projects_skipped) = append_new_projects(&mut dataset, incoming.projects);
    let (sessions_added, sessions_skipped) =
        append_new_sessions(&mut dataset, incoming.app_sessions.unwrap_or_default());

    Ok(ImportReport {
        mode: ImportMode::Replace,
        dataset,
        projects_added,
        projects_skipped,
        sessions_added,
        sessions_skipped,
    })
}

fn merge(current: &Dataset, incoming: IncomingDataset) -> ImportReport {
    let mut dataset = current.clone();
    let (projects_added, projects_skipped) = append_new_projects(&mut dataset, incoming.projects);
    let (sessions_added, sessions_skipped) =
        append_new_sessions(&mut dataset, incoming.app_sessions.unwrap_or_default());

    ImportReport {
        mode: ImportMode::Merge,
        dataset,
        projects_added,
        projects_skipped,
        sessions_added,
        sessions_skipped,
    }
}

/// Append projects whose id is not yet present. First occurrence wins.
fn append_new_projects(dataset: &mut Dataset, projects: Vec<Project>) -> (usize, usize) {
    let mut known: HashSet<String> = dataset.projects.iter().map(|p| p.id.clone()).collect();
    let (mut added, mut skipped) = (0, 0);
    for project in projects {
        if known.insert(project.id.clone()) {
            dataset.projects.push(project);
            added += 1;
        } else {
            tracing::warn!(id = %project.id, "import: project id already present, keeping existing");
            skipped += 1;
        }
    }
    (added, skipped)
}

/// Append app sessions whose date key is not yet present. First occurrence wins.
fn append_new_sessions(dataset: &mut Dataset, sessions: Vec<AppSession>) -> (usize, usize) {
    let mut known: HashSet<String> = dataset.app_sessions.iter().map(|s| s.date.clone()).collect();
    let (mut added, mut skipped) = (0, 0);
    for session in sessions {
        if known.insert(session.date.clone()) {
            dataset.app_sessions.push(session);
            added += 1;
        } else {
            skipped += 1;
        }
    }
    (added, skipped)
}
