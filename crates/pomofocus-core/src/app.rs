//! Application state root.
//!
//! [`FocusApp`] owns the dataset, the timer engine, the active target and
//! the session tracker, and routes every operation through them. Each
//! mutating operation ends with a save checkpoint. A failed save is
//! returned as [`CoreError::Storage`] *after* the in-memory change has been
//! applied; the app keeps working on its in-memory dataset.

use chrono::{FixedOffset, Offset, Utc};

use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::export::ExportSnapshot;
use crate::model::{ActiveTarget, AppSession, Dataset, NewSubtask, Project, Settings, SettingsPatch};
use crate::notify::Notifier;
use crate::progress::ProjectProgress;
use crate::reconcile::{self, ImportMode, ImportReport};
use crate::session::{Clock, SessionTracker, SystemClock};
use crate::storage::DataStore;
use crate::timer::{AutoStartPolicy, Cadence, PhaseContext, TimerEngine, TimerMode};

/// Options for assembling a [`FocusApp`].
#[derive(Debug, Clone, Copy)]
pub struct AppOptions {
    pub policy: AutoStartPolicy,
    pub reporting_zone: FixedOffset,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            policy: AutoStartPolicy::default(),
            // Europe/Istanbul
            reporting_zone: FixedOffset::east_opt(3 * 3600).unwrap_or_else(|| Utc.fix()),
        }
    }
}

pub struct FocusApp<S, N, C = SystemClock> {
    dataset: Dataset,
    engine: TimerEngine,
    target: Option<ActiveTarget>,
    tracker: SessionTracker<C>,
    store: S,
    notifier: N,
}

impl<S: DataStore, N: Notifier> FocusApp<S, N, SystemClock> {
    /// Load the dataset from `store` (or start empty) and begin an app session.
    pub fn open(store: S, notifier: N, options: AppOptions) -> Result<Self> {
        Self::open_with_clock(store, notifier, options, SystemClock)
    }
}

impl<S: DataStore, N: Notifier, C: Clock> FocusApp<S, N, C> {
    pub fn open_with_clock(store: S, notifier: N, options: AppOptions, clock: C) -> Result<Self> {
        let dataset = store.load()?.unwrap_or_default();
        let engine = TimerEngine::new(&dataset.settings).with_policy(options.policy);
        Ok(Self {
            dataset,
            engine,
            target: None,
            tracker: SessionTracker::with_clock(clock, options.reporting_zone),
            store,
            notifier,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn settings(&self) -> &Settings {
        &self.dataset.settings
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn target(&self) -> Option<&ActiveTarget> {
        self.target.as_ref()
    }

    pub fn tracker(&self) -> &SessionTracker<C> {
        &self.tracker
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn project(&self, id: &str) -> Result<&Project> {
        self.dataset
            .project(id)
            .ok_or_else(|| CoreError::project_not_found(id))
    }

    pub fn project_progress(&self, id: &str) -> Result<ProjectProgress> {
        Ok(ProjectProgress::of(self.project(id)?, &self.dataset.settings))
    }

    pub fn snapshot(&self) -> Event {
        self.engine.snapshot(&self.dataset.settings)
    }

    /// Read-only export including the uncommitted app session.
    pub fn export(&self) -> ExportSnapshot {
        let (date, secs) = self.tracker.in_progress();
        ExportSnapshot::build(&self.dataset, Some((&date, secs)))
    }

    // ── Projects ─────────────────────────────────────────────────────

    pub fn create_project(&mut self, name: &str, subtasks: Vec<NewSubtask>) -> Result<Project> {
        let project = Project::new(name, subtasks, Utc::now())?;
        tracing::info!(id = %project.id, subtasks = project.subtasks.len(), "project created");
        self.dataset.projects.push(project.clone());
        self.checkpoint()?;
        Ok(project)
    }

    /// Change a subtask's session target by `delta`.
    ///
    /// Rejected adjustments leave everything untouched and are not saved.
    pub fn adjust_session_target(
        &mut self,
        project_id: &str,
        subtask_id: &str,
        delta: i64,
    ) -> Result<()> {
        let subtask = self
            .dataset
            .project_mut(project_id)
            .ok_or_else(|| CoreError::project_not_found(project_id))?
            .subtask_mut(subtask_id)
            .ok_or_else(|| CoreError::subtask_not_found(subtask_id))?;
        subtask.adjust_session_target(delta)?;
        tracing::debug!(subtask = %subtask_id, total = subtask.total_sessions, "session target adjusted");
        self.checkpoint()
    }

    /// Make `project_id` current with no subtask selected.
    pub fn select_project(&mut self, project_id: &str) -> Result<()> {
        self.project(project_id)?;
        self.target = Some(ActiveTarget {
            project_id: project_id.to_string(),
            subtask_id: None,
        });
        Ok(())
    }

    /// Make `subtask_id` the target credited by work completions.
    pub fn select_subtask(&mut self, project_id: &str, subtask_id: &str) -> Result<()> {
        self.project(project_id)?
            .subtask(subtask_id)
            .ok_or_else(|| CoreError::subtask_not_found(subtask_id))?;
        self.target = Some(ActiveTarget {
            project_id: project_id.to_string(),
            subtask_id: Some(subtask_id.to_string()),
        });
        Ok(())
    }

    /// Restore a previously persisted selection; ids that no longer resolve
    /// are dropped.
    pub fn restore_target(&mut self, target: ActiveTarget) {
        let resolves = match self.dataset.project(&target.project_id) {
            Some(project) => target
                .subtask_id
                .as_deref()
                .map_or(true, |id| project.subtask(id).is_some()),
            None => false,
        };
        self.target = resolves.then_some(target);
    }

    pub fn clear_selection(&mut self) {
        self.target = None;
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// Patch the durations. The running phase keeps its remaining time;
    /// new values apply from the next transition.
    pub fn update_settings(&mut self, patch: &SettingsPatch) -> Result<Settings> {
        let next = self.dataset.settings.patched(patch)?;
        self.dataset.settings = next;
        self.checkpoint()?;
        Ok(next)
    }

    // ── Timer ────────────────────────────────────────────────────────

    /// Replace the engine with a previously persisted one.
    pub fn restore_engine(&mut self, engine: TimerEngine) {
        let policy = self.engine.policy();
        self.engine = engine.with_policy(policy);
    }

    pub fn set_policy(&mut self, policy: AutoStartPolicy) {
        self.engine.set_policy(policy);
    }

    pub fn start(&mut self) -> Option<Event> {
        self.engine.start()
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.engine.pause()
    }

    pub fn set_mode(&mut self, mode: TimerMode) -> Event {
        self.engine.set_mode(mode, &self.dataset.settings)
    }

    pub fn reset(&mut self) -> Event {
        self.engine.reset(&self.dataset.settings)
    }

    /// One second of cadence. Saves when the tick completed a phase.
    pub fn tick(&mut self) -> Result<Vec<Event>> {
        let events = self.advance();
        if !events.is_empty() {
            self.checkpoint()?;
        }
        Ok(events)
    }

    fn advance(&mut self) -> Vec<Event> {
        let mut ctx = PhaseContext {
            dataset: &mut self.dataset,
            target: self.target.as_ref(),
            notifier: &self.notifier,
        };
        self.engine.tick(&mut ctx)
    }

    /// Complete the current phase immediately.
    pub fn complete(&mut self) -> Result<Vec<Event>> {
        let events = {
            let mut ctx = PhaseContext {
                dataset: &mut self.dataset,
                target: self.target.as_ref(),
                notifier: &self.notifier,
            };
            self.engine.complete(&mut ctx)
        };
        self.checkpoint()?;
        Ok(events)
    }

    /// Tick on every cadence beat while the engine runs.
    ///
    /// Returns once the engine is at rest or the cadence gives up.
    /// `on_events` sees the app after each tick together with that tick's
    /// events (empty for an ordinary second). Save failures are logged
    /// and do not stop the timer.
    pub async fn drive<K, F>(&mut self, cadence: &mut K, mut on_events: F) -> Vec<Event>
    where
        K: Cadence,
        F: FnMut(&Self, &[Event]),
    {
        let mut all = Vec::new();
        while self.engine.is_running() {
            if !cadence.wait().await {
                break;
            }
            let events = self.advance();
            if !events.is_empty() {
                // Already logged by checkpoint; the timer keeps going.
                let _ = self.checkpoint();
            }
            on_events(self, &events);
            all.extend(events);
        }
        all
    }

    // ── Import / app session ─────────────────────────────────────────

    /// Reconcile `payload` into the dataset and swap the result in.
    ///
    /// Clears the selection. A rejected payload changes nothing.
    pub fn import(&mut self, payload: &str, mode: ImportMode) -> Result<(ImportReport, Event)> {
        let report = reconcile::reconcile(&self.dataset, payload, mode)?;
        self.dataset = report.dataset.clone();
        self.target = None;
        let event = Event::DataImported {
            mode,
            projects_added: report.projects_added,
            projects_skipped: report.projects_skipped,
            sessions_added: report.sessions_added,
            sessions_skipped: report.sessions_skipped,
            at: Utc::now(),
        };
        self.checkpoint()?;
        Ok((report, event))
    }

    /// Fold the time since the last commit into today's app session entry
    /// and restart the measurement.
    pub fn commit_app_session(&mut self) -> Result<(AppSession, Event)> {
        let (entry, added) = self.tracker.checkpoint(&mut self.dataset.app_sessions);
        let event = Event::AppSessionCommitted {
            date: entry.date.clone(),
            added_secs: added,
            total_secs: entry.duration,
            at: Utc::now(),
        };
        self.checkpoint()?;
        Ok((entry, event))
    }

    /// Save the dataset now.
    pub fn checkpoint(&self) -> Result<()> {
        self.store.save(&self.dataset).map_err(|e| {
            tracing::warn!(error = %e, "failed to save dataset");
            CoreError::from(e)
        })
    }
}
