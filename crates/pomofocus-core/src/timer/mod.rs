mod cadence;
mod engine;
mod mode;

pub use cadence::{Cadence, IntervalCadence, ManualCadence};
pub use engine::{AutoStartPolicy, PhaseContext, TimerEngine};
pub use mode::TimerMode;
