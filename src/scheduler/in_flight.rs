//! Tracks which jobs are currently executing.
//!
//! Enforces at-most-one-in-flight per job name; jobs with different names may
//! run concurrently with no ordering guarantee between them.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

pub struct InFlightTracker {
    running: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
}

impl InFlightTracker {
    pub fn new() -> Self {
        Self {
            running: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Claim the job name for execution. Returns false if an execution of the
    /// same name is already in flight.
    pub async fn try_start(&self, job_name: &str) -> bool {
        let mut running = self.running.write().await;
        if running.contains_key(job_name) {
            return false;
        }
        running.insert(job_name.to_string(), Utc::now());
        true
    }

    pub async fn finish(&self, job_name: &str) {
        let mut running = self.running.write().await;
        if let Some(started_at) = running.remove(job_name) {
            let duration = Utc::now().signed_duration_since(started_at);
            info!(
                "Finished execution of '{}' (took {}s)",
                job_name,
                duration.num_seconds()
            );
        }
    }

    pub async fn is_running(&self, job_name: &str) -> bool {
        let running = self.running.read().await;
        running.contains_key(job_name)
    }

    pub async fn active_count(&self) -> usize {
        let running = self.running.read().await;
        running.len()
    }
}

impl Default for InFlightTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InFlightTracker {
    fn clone(&self) -> Self {
        Self {
            running: self.running.clone(),
        }
    }
}
