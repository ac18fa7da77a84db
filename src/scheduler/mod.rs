//! Cadence-driven job scheduling.
//!
//! A single scheduling authority evaluates due jobs at each tick. Job bodies
//! run concurrently relative to each other, but no two executions of the same
//! job name ever overlap: a job still running at its next due tick is skipped
//! with a recorded warning and re-attempted only after it completes.

pub mod cadence;
pub mod engine;
pub mod in_flight;

pub use cadence::Cadence;
pub use engine::Scheduler;
pub use in_flight::InFlightTracker;

use serde::{Deserialize, Serialize};

/// Execution state of a registered job. There is no sticky failed state; a
/// job always returns to Idle and is re-attempted on its normal cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    Idle,
    Running,
}
