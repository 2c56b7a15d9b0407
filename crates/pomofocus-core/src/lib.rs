//! # Pomofocus Core Library
//!
//! Core business logic for Pomofocus: a Pomodoro timer that credits
//! completed work phases to subtasks of projects and keeps progress across
//! sessions. Hosts (the `pomofocus` CLI, or any other front end) own
//! rendering, notification delivery and the storage medium; everything
//! with invariants lives here.
//!
//! ## Architecture
//!
//! - **Domain model**: [`Dataset`] with projects, subtasks, settings, stats
//!   and the per-day app session log
//! - **Timer engine**: a pure state machine cycling Work / Short Break /
//!   Long Break, driven one second at a time by a [`Cadence`]
//! - **Session tracker**: wall-clock time the app has been open, per day
//! - **Reconciler**: replace/merge import of external datasets
//! - **Storage**: SQLite dataset storage and TOML host configuration
//!
//! ## Key Components
//!
//! - [`FocusApp`]: application state root tying the pieces together
//! - [`TimerEngine`]: core timer state machine
//! - [`ProjectProgress`]: derived project metrics
//! - [`Database`]: SQLite-backed [`DataStore`]
//! - [`Config`]: host configuration management

pub mod app;
pub mod error;
pub mod events;
pub mod export;
pub mod format;
pub mod model;
pub mod notify;
pub mod progress;
pub mod reconcile;
pub mod session;
pub mod storage;
pub mod timer;

pub use app::{AppOptions, FocusApp};
pub use error::{
    ConfigError, CoreError, ImportError, RejectedAdjustment, StorageError, ValidationError,
};
pub use events::Event;
pub use export::{export_file_name, ExportSnapshot, ExportSummary};
pub use format::{format_clock, format_hms, parse_hms};
pub use model::{
    ActiveTarget, AppSession, Dataset, NewSubtask, Project, Settings, SettingsPatch, Stats,
    Subtask,
};
pub use notify::{NotificationKind, Notifier, NoopNotifier, RecordingNotifier};
pub use progress::ProjectProgress;
pub use reconcile::{reconcile, ImportMode, ImportReport};
pub use session::{Clock, ManualClock, SessionTracker, SystemClock};
pub use storage::{Config, DataStore, Database, MemoryStore};
pub use timer::{
    AutoStartPolicy, Cadence, IntervalCadence, ManualCadence, PhaseContext, TimerEngine, TimerMode,
};
