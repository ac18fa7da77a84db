//! Append-only audit trail of job executions.
//!
//! One text destination per job name under a shared directory. Files are
//! created lazily on first write and never truncated, rewritten or reordered
//! by the engine; retention and rotation belong to the operator.

use anyhow::{anyhow, Result};
use chrono::Local;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::jobs::{JobOutcome, JobResult};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct AuditLog {
    base_dir: PathBuf,
    // Serializes appends so entries from concurrent jobs never interleave
    // mid-line.
    writer: Mutex<()>,
}

impl AuditLog {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            writer: Mutex::new(()),
        }
    }

    pub fn destination_for(&self, job_name: &str) -> PathBuf {
        self.base_dir.join(format!("{}.log", job_name))
    }

    /// Append one physical record for one execution. Errors are returned to
    /// the caller (the scheduler reports them and carries on); the log is
    /// never a reason to stop running jobs.
    pub async fn append(&self, result: &JobResult) -> Result<()> {
        let entry = render_entry(result);
        let path = self.destination_for(&result.job_name);

        let _guard = self.writer.lock().await;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| anyhow!("Failed to create log dir {}: {}", parent.display(), e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| anyhow!("Failed to open log {}: {}", path.display(), e))?;

        file.write_all(entry.as_bytes())
            .await
            .map_err(|e| anyhow!("Failed to append to {}: {}", path.display(), e))?;
        file.flush()
            .await
            .map_err(|e| anyhow!("Failed to flush {}: {}", path.display(), e))?;

        Ok(())
    }
}

fn render_entry(result: &JobResult) -> String {
    let timestamp = result
        .finished_at
        .with_timezone(&Local)
        .format(TIMESTAMP_FORMAT);

    match &result.outcome {
        JobOutcome::Success {
            summary,
            detail_lines,
        } => {
            let mut entry = format!("{} [{}] {}\n", timestamp, result.job_name, summary);
            for line in detail_lines {
                entry.push_str(&format!(" - {}\n", line));
            }
            entry
        }
        JobOutcome::Failure { kind, message } => {
            format!(
                "{} [{}] ERROR ({}): {}\n",
                timestamp, result.job_name, kind, message
            )
        }
    }
}
