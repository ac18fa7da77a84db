pub mod manager;
pub use manager::ConfigManager;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// GraphQL endpoint of the CRM backend
    pub endpoint: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Total attempts per remote call, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff_base")]
    pub backoff_base_seconds: u64,
    /// How often the scheduler evaluates due jobs
    #[serde(default = "default_tick_interval")]
    pub tick_interval_seconds: u64,
    /// Directory holding one append-only log file per job
    pub log_dir: String,
    #[serde(default)]
    pub jobs: HashMap<String, JobConfig>,
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base() -> u64 {
    1
}

fn default_tick_interval() -> u64 {
    1
}

/// Per-job scheduling configuration. Exactly one of `interval_seconds` and
/// `schedule` must be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Fixed cadence in seconds
    pub interval_seconds: Option<u64>,
    /// Cron expression (6-field, or 5-field with seconds assumed 0)
    pub schedule: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl Config {
    /// Startup validation. Runs before the scheduler loop; any error here is
    /// fatal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "endpoint".to_string(),
            });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_attempts".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.tick_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tick_interval_seconds".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.log_dir.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "log_dir".to_string(),
            });
        }

        for (name, job) in &self.jobs {
            match (&job.interval_seconds, &job.schedule) {
                (Some(_), Some(_)) => {
                    return Err(ConfigError::InvalidValue {
                        field: format!("jobs.{}", name),
                        reason: "set either interval_seconds or schedule, not both".to_string(),
                    });
                }
                (None, None) => {
                    return Err(ConfigError::InvalidValue {
                        field: format!("jobs.{}", name),
                        reason: "one of interval_seconds or schedule is required".to_string(),
                    });
                }
                (Some(0), None) => {
                    return Err(ConfigError::InvalidValue {
                        field: format!("jobs.{}.interval_seconds", name),
                        reason: "must be at least 1".to_string(),
                    });
                }
                _ => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            endpoint: "http://localhost:8000/graphql".to_string(),
            request_timeout_seconds: 30,
            max_attempts: 3,
            backoff_base_seconds: 1,
            tick_interval_seconds: 1,
            log_dir: "/tmp/crm-audit".to_string(),
            jobs: HashMap::new(),
        }
    }

    #[test]
    fn valid_config_passes() {
        let mut config = base_config();
        config.jobs.insert(
            "heartbeat".to_string(),
            JobConfig {
                enabled: true,
                interval_seconds: Some(60),
                schedule: None,
            },
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn job_needs_exactly_one_cadence() {
        let mut config = base_config();
        config.jobs.insert(
            "heartbeat".to_string(),
            JobConfig {
                enabled: true,
                interval_seconds: Some(60),
                schedule: Some("0 * * * * *".to_string()),
            },
        );
        assert!(config.validate().is_err());

        let mut config = base_config();
        config.jobs.insert(
            "heartbeat".to_string(),
            JobConfig {
                enabled: true,
                interval_seconds: None,
                schedule: None,
            },
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_attempts_rejected() {
        let mut config = base_config();
        config.max_attempts = 0;
        assert!(config.validate().is_err());
    }
}
