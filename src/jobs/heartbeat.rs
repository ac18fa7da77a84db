//! Liveness probe against the CRM endpoint.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{JobResult, JobSpec};
use crate::remote::{Operation, RemoteClient};

pub const HEARTBEAT_JOB: &str = "heartbeat";

pub struct HeartbeatJob;

#[async_trait]
impl JobSpec for HeartbeatJob {
    fn name(&self) -> &str {
        HEARTBEAT_JOB
    }

    async fn run(&self, now: DateTime<Utc>, client: &RemoteClient) -> JobResult {
        let operation = Operation::query("{ hello }");

        match client.execute(&operation).await {
            Ok(data) => {
                let payload = data
                    .get("hello")
                    .map(|v| match v.as_str() {
                        Some(s) => s.to_string(),
                        None => v.to_string(),
                    })
                    .unwrap_or_default();
                let summary = format!("CRM is alive (response: {})", payload);
                JobResult::success(HEARTBEAT_JOB, now, summary, Vec::new())
            }
            // A dead endpoint is a Failure result, nothing more; isolation in
            // the scheduler keeps other jobs and future heartbeats running.
            Err(e) => JobResult::from_remote_error(HEARTBEAT_JOB, now, e),
        }
    }
}
