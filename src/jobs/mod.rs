//! Schedulable units of work against the CRM service.
//!
//! A job is a pure function of (current time, remote client) into a
//! [`JobResult`]; it never writes logs itself and must be safe to re-run for
//! the same logical period, because scheduling is at-least-once.

pub mod heartbeat;
pub mod low_stock;
pub mod order_reminders;
pub mod weekly_report;

pub use heartbeat::HeartbeatJob;
pub use low_stock::LowStockJob;
pub use order_reminders::OrderRemindersJob;
pub use weekly_report::WeeklyReportJob;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::{FailureKind, RemoteError};
use crate::remote::RemoteClient;

/// Outcome of one job execution. Exactly one variant per execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum JobOutcome {
    Success {
        /// Short counts/metrics line, e.g. `customers=5, orders=2`
        summary: String,
        /// One human-readable fact per line, in discovery order from the
        /// remote response
        detail_lines: Vec<String>,
    },
    Failure {
        kind: FailureKind,
        message: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    pub job_name: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: JobOutcome,
}

impl JobResult {
    pub fn success(
        job_name: &str,
        started_at: DateTime<Utc>,
        summary: impl Into<String>,
        detail_lines: Vec<String>,
    ) -> Self {
        Self {
            job_name: job_name.to_string(),
            started_at,
            finished_at: Utc::now(),
            outcome: JobOutcome::Success {
                summary: summary.into(),
                detail_lines,
            },
        }
    }

    pub fn failure(
        job_name: &str,
        started_at: DateTime<Utc>,
        kind: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            job_name: job_name.to_string(),
            started_at,
            finished_at: Utc::now(),
            outcome: JobOutcome::Failure {
                kind,
                message: message.into(),
            },
        }
    }

    pub fn from_remote_error(job_name: &str, started_at: DateTime<Utc>, error: RemoteError) -> Self {
        Self::failure(job_name, started_at, error.kind.into(), error.message)
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, JobOutcome::Success { .. })
    }
}

/// A named, schedulable unit of idempotent work.
#[async_trait]
pub trait JobSpec: Send + Sync {
    fn name(&self) -> &str;

    /// Side-effect-free except through `client`. Remote failures are folded
    /// into the returned result; `run` itself never errors out.
    async fn run(&self, now: DateTime<Utc>, client: &RemoteClient) -> JobResult;
}

/// All jobs this engine ships with, keyed by the names used in configuration
/// and on the `run-job` CLI.
pub fn builtin_jobs() -> Vec<Arc<dyn JobSpec>> {
    vec![
        Arc::new(LowStockJob),
        Arc::new(HeartbeatJob),
        Arc::new(OrderRemindersJob),
        Arc::new(WeeklyReportJob),
    ]
}
