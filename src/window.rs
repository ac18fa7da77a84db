//! Relative time windows for windowed queries.
//!
//! Windows are always derived from the execution instant, never from a stored
//! last-run checkpoint. A delayed tick therefore shifts the window instead of
//! catching up a gap; reconciliation jobs tolerate that.

use chrono::{DateTime, Duration, Utc};

/// A closed time range `[start, end]` ending at the instant it was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Window of the given length ending at `now`.
    pub fn ending_at(now: DateTime<Utc>, length: Duration) -> Self {
        Self {
            start: now - length,
            end: now,
        }
    }

    /// Convenience for the common "last N days" case.
    pub fn last_days(now: DateTime<Utc>, days: i64) -> Self {
        Self::ending_at(now, Duration::days(days))
    }

    /// Inclusive on both ends: an order dated exactly `start` is in range.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}
