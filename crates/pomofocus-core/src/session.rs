//! Per-day tracking of how long the application has been open.
//!
//! Independent of the timer: a tracker measures wall-clock time since a
//! reference instant and folds it into the dataset's app session log.
//!
//! `commit` adds everything since the reference instant. Calling it twice
//! without [`SessionTracker::reset_reference`] counts the same span twice;
//! [`SessionTracker::checkpoint`] does both in one step.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Duration, FixedOffset, Utc};

use crate::model::{accumulate, day_key, AppSession};

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-driven clock; clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

#[derive(Debug, Clone)]
pub struct SessionTracker<C = SystemClock> {
    clock: C,
    started_at: DateTime<Utc>,
    zone: FixedOffset,
}

impl<C: Clock> SessionTracker<C> {
    pub fn with_clock(clock: C, zone: FixedOffset) -> Self {
        let started_at = clock.now();
        Self {
            clock,
            started_at,
            zone,
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn zone(&self) -> FixedOffset {
        self.zone
    }

    /// Whole seconds since the reference instant. Display only.
    pub fn elapsed_since_start(&self) -> u64 {
        let elapsed = self.clock.now().signed_duration_since(self.started_at);
        u64::try_from(elapsed.num_seconds()).unwrap_or(0)
    }

    /// Day key for "now" in the reporting timezone.
    pub fn today_key(&self) -> String {
        day_key(self.clock.now(), self.zone)
    }

    /// The uncommitted span as `(day key, seconds)`.
    pub fn in_progress(&self) -> (String, u64) {
        (self.today_key(), self.elapsed_since_start())
    }

    /// Add the elapsed span to today's entry in `log`.
    ///
    /// Does not move the reference instant.
    pub fn commit(&self, log: &mut Vec<AppSession>) -> AppSession {
        let (date, secs) = self.in_progress();
        let entry = accumulate(log, &date, secs);
        tracing::info!(date = %entry.date, added_secs = secs, total_secs = entry.duration, "app session committed");
        entry
    }

    /// Move the reference instant to now.
    pub fn reset_reference(&mut self) {
        self.started_at = self.clock.now();
    }

    /// `commit` followed by `reset_reference`; returns the entry and the
    /// seconds that were added.
    pub fn checkpoint(&mut self, log: &mut Vec<AppSession>) -> (AppSession, u64) {
        let added = self.elapsed_since_start();
        let entry = self.commit(log);
        self.reset_reference();
        (entry, added)
    }
}
