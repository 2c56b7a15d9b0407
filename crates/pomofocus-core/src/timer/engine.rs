//! Timer engine implementation.
//!
//! The engine is a pure state machine. It owns no thread and no clock:
//! a cadence (see [`super::cadence`]) calls `tick()` once per elapsed
//! second while the engine is running.
//!
//! ## Phase cycle
//!
//! ```text
//! Work -(i < n)-> ShortBreak -> Work
//! Work -(i >= n)-> LongBreak -> Work     (i resets to 1)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(&dataset.settings);
//! engine.start();
//! // Once per second:
//! let events = engine.tick(&mut PhaseContext { dataset: &mut dataset, target: None, notifier: &NoopNotifier });
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::mode::TimerMode;
use crate::events::Event;
use crate::model::{ActiveTarget, Dataset, Settings};
use crate::notify::{NotificationKind, Notifier};

/// Whether the next phase starts by itself after a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoStartPolicy {
    /// Start the break that follows a completed work phase.
    pub breaks: bool,
    /// Start the work phase that follows a completed break.
    pub work: bool,
}

impl Default for AutoStartPolicy {
    fn default() -> Self {
        Self {
            breaks: true,
            work: false,
        }
    }
}

impl AutoStartPolicy {
    /// Whether the phase following a completed `mode` starts automatically.
    pub fn resumes_after(&self, completed: TimerMode) -> bool {
        if completed.is_break() {
            self.work
        } else {
            self.breaks
        }
    }
}

/// Everything a phase completion touches.
pub struct PhaseContext<'a> {
    pub dataset: &'a mut Dataset,
    pub target: Option<&'a ActiveTarget>,
    pub notifier: &'a dyn Notifier,
}

/// Core timer engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    mode: TimerMode,
    remaining_secs: u64,
    /// Process-local: a restored engine is always paused.
    #[serde(skip)]
    running: bool,
    session_index: u32,
    /// Host preference, re-applied after restore.
    #[serde(skip)]
    policy: AutoStartPolicy,
}

impl TimerEngine {
    /// Paused at the start of the first work phase.
    pub fn new(settings: &Settings) -> Self {
        Self {
            mode: TimerMode::Work,
            remaining_secs: settings.duration_secs(TimerMode::Work),
            running: false,
            session_index: 1,
            policy: AutoStartPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: AutoStartPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn set_policy(&mut self, policy: AutoStartPolicy) {
        self.policy = policy;
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn session_index(&self) -> u32 {
        self.session_index
    }

    pub fn policy(&self) -> AutoStartPolicy {
        self.policy
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, settings: &Settings) -> Event {
        Event::StateSnapshot {
            mode: self.mode,
            running: self.running,
            remaining_secs: self.remaining_secs,
            total_secs: settings.duration_secs(self.mode),
            session_index: self.session_index,
            sessions_before_long_break: settings.sessions_before_long_break,
            session_label: format!(
                "Session {} of {}",
                self.session_index, settings.sessions_before_long_break
            ),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        tracing::debug!(mode = ?self.mode, remaining_secs = self.remaining_secs, "timer started");
        Some(Event::TimerStarted {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        tracing::debug!(mode = ?self.mode, remaining_secs = self.remaining_secs, "timer paused");
        Some(Event::TimerPaused {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Switch phase manually. Pauses first; the session index and any
    /// subtask counters are left alone.
    pub fn set_mode(&mut self, mode: TimerMode, settings: &Settings) -> Event {
        self.running = false;
        self.enter(mode, settings)
    }

    /// Pause and rewind the current phase to its full configured length.
    pub fn reset(&mut self, settings: &Settings) -> Event {
        self.running = false;
        self.remaining_secs = settings.duration_secs(self.mode);
        tracing::debug!(mode = ?self.mode, "timer reset");
        Event::TimerReset {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Advance by one second. Completes the phase when it runs out.
    pub fn tick(&mut self, ctx: &mut PhaseContext<'_>) -> Vec<Event> {
        if !self.running {
            return Vec::new();
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return self.complete(ctx);
        }
        Vec::new()
    }

    /// Finish the current phase: notify, credit, account time, move on.
    ///
    /// Cannot be rolled back once invoked.
    pub fn complete(&mut self, ctx: &mut PhaseContext<'_>) -> Vec<Event> {
        self.running = false;
        let settings = ctx.dataset.settings;
        let finished = self.mode;
        let duration_secs = settings.duration_secs(finished);
        let now = Utc::now();

        let kind = NotificationKind::for_completed(finished);
        ctx.notifier.notify(kind, kind.title(), kind.body());

        let mut events = vec![Event::PhaseCompleted {
            mode: finished,
            duration_secs,
            session_index: self.session_index,
            at: now,
        }];

        let next = match finished {
            TimerMode::Work => {
                if let Some(target) = ctx.target {
                    if let Some(subtask) = ctx.dataset.target_subtask_mut(target) {
                        if subtask.record_session() {
                            events.push(Event::SubtaskProgressed {
                                project_id: target.project_id.clone(),
                                subtask_id: subtask.id.clone(),
                                completed_sessions: subtask.completed_sessions,
                                total_sessions: subtask.total_sessions,
                                is_completed: subtask.is_completed,
                                at: now,
                            });
                        }
                    }
                }
                ctx.dataset.stats.add_work(duration_secs);

                if self.session_index >= settings.sessions_before_long_break {
                    self.session_index = 1;
                    TimerMode::LongBreak
                } else {
                    self.session_index += 1;
                    TimerMode::ShortBreak
                }
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => {
                ctx.dataset.stats.add_break(duration_secs);
                TimerMode::Work
            }
        };
        tracing::info!(completed = ?finished, next = ?next, session_index = self.session_index, "phase completed");

        events.push(self.enter(next, &settings));
        if self.policy.resumes_after(finished) {
            events.extend(self.start());
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter(&mut self, mode: TimerMode, settings: &Settings) -> Event {
        let from = self.mode;
        self.mode = mode;
        self.remaining_secs = settings.duration_secs(mode);
        Event::ModeChanged {
            from,
            to: mode,
            remaining_secs: self.remaining_secs,
            session_index: self.session_index,
            at: Utc::now(),
        }
    }
}
