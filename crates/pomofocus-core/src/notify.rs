//! Notification contract for phase completion.
//!
//! `notify` is invoked synchronously from the timer engine. It returns
//! nothing: an implementation that fails must swallow (and log) the
//! failure instead of propagating it into the engine.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::timer::TimerMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    WorkComplete,
    BreakComplete,
}

impl NotificationKind {
    /// The signal emitted when a phase of `mode` completes.
    pub fn for_completed(mode: TimerMode) -> Self {
        if mode.is_break() {
            NotificationKind::BreakComplete
        } else {
            NotificationKind::WorkComplete
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            NotificationKind::WorkComplete => "Time for a break!",
            NotificationKind::BreakComplete => "Time to focus!",
        }
    }

    pub fn body(self) -> &'static str {
        match self {
            NotificationKind::WorkComplete => "Great work! Take a well-deserved break.",
            NotificationKind::BreakComplete => "Break is over. Let's get back to work!",
        }
    }
}

pub trait Notifier {
    fn notify(&self, kind: NotificationKind, title: &str, body: &str);
}

/// Drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _kind: NotificationKind, _title: &str, _body: &str) {}
}

/// Keeps every notification in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: RefCell<Vec<NotificationKind>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<NotificationKind> {
        self.sent.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NotificationKind, _title: &str, _body: &str) {
        self.sent.borrow_mut().push(kind);
    }
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, kind: NotificationKind, title: &str, body: &str) {
        (**self).notify(kind, title, body)
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&self, kind: NotificationKind, title: &str, body: &str) {
        (**self).notify(kind, title, body)
    }
}
