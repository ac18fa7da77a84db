use chrono::{DateTime, Utc};
use futures::FutureExt;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::{Cadence, InFlightTracker, JobState};
use crate::audit::AuditLog;
use crate::errors::{ConfigError, FailureKind};
use crate::jobs::{JobResult, JobSpec};
use crate::remote::RemoteClient;

struct JobEntry {
    job: Arc<dyn JobSpec>,
    cadence: Cadence,
    /// None once a cron schedule has no future occurrences.
    next_due: Option<DateTime<Utc>>,
}

/// Owns the only loop in the engine. Jobs never write logs or retry
/// themselves; the scheduler triggers them at their due time, isolates their
/// failures and hands every outcome to the audit log.
pub struct Scheduler {
    registry: HashMap<String, JobEntry>,
    client: Arc<RemoteClient>,
    audit: Arc<AuditLog>,
    in_flight: InFlightTracker,
    skips: Arc<RwLock<HashMap<String, u64>>>,
    tick_interval: std::time::Duration,
}

impl Scheduler {
    pub fn new(
        client: Arc<RemoteClient>,
        audit: Arc<AuditLog>,
        tick_interval: std::time::Duration,
    ) -> Self {
        Self {
            registry: HashMap::new(),
            client,
            audit,
            in_flight: InFlightTracker::new(),
            skips: Arc::new(RwLock::new(HashMap::new())),
            tick_interval,
        }
    }

    /// Register a job with its cadence. Duplicate names fail fast here,
    /// before the loop ever starts.
    pub fn register(
        &mut self,
        job: Arc<dyn JobSpec>,
        cadence: Cadence,
    ) -> Result<(), ConfigError> {
        let name = job.name().to_string();
        if self.registry.contains_key(&name) {
            return Err(ConfigError::DuplicateJob { name });
        }

        let now = Utc::now();
        let next_due = match &cadence {
            // Interval jobs are due on the first tick; the interval governs
            // the gap between starts after that.
            Cadence::Every(_) => Some(now),
            Cadence::Cron(_) => cadence.next_after(now),
        };

        info!("Registered job '{}' (first due: {:?})", name, next_due);
        self.registry.insert(
            name,
            JobEntry {
                job,
                cadence,
                next_due,
            },
        );
        Ok(())
    }

    pub async fn job_state(&self, job_name: &str) -> JobState {
        if self.in_flight.is_running(job_name).await {
            JobState::Running
        } else {
            JobState::Idle
        }
    }

    /// How many due ticks were skipped because the previous execution of the
    /// same job was still in flight.
    pub async fn skip_count(&self, job_name: &str) -> u64 {
        let skips = self.skips.read().await;
        skips.get(job_name).copied().unwrap_or(0)
    }

    /// Evaluate due jobs once. Each due job is started inside a failure
    /// boundary; nothing a job body does can abort this method or another
    /// job.
    pub async fn tick(&mut self, now: DateTime<Utc>) {
        for (name, entry) in self.registry.iter_mut() {
            let due = match entry.next_due {
                Some(due) if due <= now => due,
                _ => continue,
            };

            // Claiming the name and checking it is one atomic step, so a
            // concurrent completion cannot slip a second execution in.
            if !self.in_flight.try_start(name).await {
                warn!(
                    "Skipping '{}' (due {}): previous execution still running",
                    name, due
                );
                let mut skips = self.skips.write().await;
                *skips.entry(name.clone()).or_insert(0) += 1;
                // next_due stays in the past; the job is re-attempted on the
                // first tick after the running execution completes.
                continue;
            }

            // Advance on start, success or failure alike. A persistently
            // failing job retries on its normal cadence, never hot-loops.
            entry.next_due = entry.cadence.next_after(now);
            if entry.next_due.is_none() {
                warn!("Schedule for '{}' has no future occurrences", name);
            }

            let job = entry.job.clone();
            let client = self.client.clone();
            let audit = self.audit.clone();
            let in_flight = self.in_flight.clone();
            let job_name = name.clone();

            tokio::spawn(async move {
                let result = run_with_boundary(&job_name, job, now, client).await;

                match &result.outcome {
                    crate::jobs::JobOutcome::Success { summary, .. } => {
                        info!("Job '{}' succeeded: {}", job_name, summary);
                    }
                    crate::jobs::JobOutcome::Failure { kind, message } => {
                        warn!("Job '{}' failed ({}): {}", job_name, kind, message);
                    }
                }

                // A log-write failure is reported but never crashes the
                // scheduler or marks the job failed retroactively.
                if let Err(e) = audit.append(&result).await {
                    error!("Failed to append audit entry for '{}': {}", job_name, e);
                }

                in_flight.finish(&job_name).await;
            });
        }
    }

    /// Daemon mode: evaluate due jobs at every tick, forever.
    pub async fn run(mut self) {
        info!(
            "Scheduler started with {} jobs (tick interval {:?})",
            self.registry.len(),
            self.tick_interval
        );

        let mut interval = tokio::time::interval(self.tick_interval);
        loop {
            interval.tick().await;
            self.tick(Utc::now()).await;
        }
    }
}

/// Run one job execution, converting panics into a Failure result so they
/// never propagate into the scheduler.
async fn run_with_boundary(
    job_name: &str,
    job: Arc<dyn JobSpec>,
    now: DateTime<Utc>,
    client: Arc<RemoteClient>,
) -> JobResult {
    let outcome = AssertUnwindSafe(job.run(now, client.as_ref()))
        .catch_unwind()
        .await;

    match outcome {
        Ok(result) => result,
        Err(panic) => {
            let message = panic_message(panic);
            error!("Job '{}' panicked: {}", job_name, message);
            JobResult::failure(job_name, now, FailureKind::Unexpected, message)
        }
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "job body panicked".to_string()
    }
}
