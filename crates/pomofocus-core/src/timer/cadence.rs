//! Cadence sources that drive `TimerEngine::tick`.
//!
//! The engine never waits on its own. A host picks a cadence:
//! [`IntervalCadence`] for real one-second ticking, [`ManualCadence`] when
//! time should pass instantly (tests, simulations).

use std::future::Future;
use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval};

/// Resolves once per tick. `false` means the cadence is exhausted or was
/// cancelled and the driver should stop.
pub trait Cadence {
    fn wait(&mut self) -> impl Future<Output = bool>;
}

/// Fires once per `period` of wall-clock time. The first tick is one full
/// period after creation.
#[derive(Debug)]
pub struct IntervalCadence {
    interval: Interval,
}

impl IntervalCadence {
    pub fn new(period: Duration) -> Self {
        Self {
            interval: interval_at(Instant::now() + period, period),
        }
    }

    pub fn every_second() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Cadence for IntervalCadence {
    async fn wait(&mut self) -> bool {
        self.interval.tick().await;
        true
    }
}

/// Ticks immediately, optionally for a bounded number of ticks.
#[derive(Debug, Clone, Default)]
pub struct ManualCadence {
    budget: Option<u64>,
    fired: u64,
}

impl ManualCadence {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_budget(ticks: u64) -> Self {
        Self {
            budget: Some(ticks),
            fired: 0,
        }
    }

    pub fn fired(&self) -> u64 {
        self.fired
    }
}

impl Cadence for ManualCadence {
    async fn wait(&mut self) -> bool {
        if self.budget.is_some_and(|b| self.fired >= b) {
            return false;
        }
        self.fired += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn manual_cadence_respects_budget() {
        let mut cadence = ManualCadence::with_budget(2);
        assert!(cadence.wait().await);
        assert!(cadence.wait().await);
        assert!(!cadence.wait().await);
        assert_eq!(cadence.fired(), 2);
    }

    #[tokio::test]
    async fn interval_cadence_ticks() {
        let mut cadence = IntervalCadence::new(Duration::from_millis(5));
        assert!(cadence.wait().await);
    }
}
