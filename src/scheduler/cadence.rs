//! When a job becomes due.

use chrono::{DateTime, Duration, Utc};
use cron::Schedule;
use std::str::FromStr;

use crate::config::JobConfig;
use crate::errors::ConfigError;

/// Fixed interval or cron schedule.
#[derive(Debug, Clone)]
pub enum Cadence {
    Every(Duration),
    Cron(Box<Schedule>),
}

impl Cadence {
    pub fn every_seconds(seconds: u64) -> Self {
        Cadence::Every(Duration::seconds(seconds as i64))
    }

    /// Parse a cron expression. Accepts the 6-field form used throughout the
    /// engine's configs (sec min hour day month dow); a 5-field expression is
    /// accepted by assuming seconds = 0.
    pub fn cron(expr: &str) -> Result<Self, ConfigError> {
        let schedule = Schedule::from_str(expr)
            .or_else(|_| Schedule::from_str(&format!("0 {}", expr)))
            .map_err(|e| ConfigError::InvalidValue {
                field: "schedule".to_string(),
                reason: format!("invalid cron expression '{}': {}", expr, e),
            })?;
        Ok(Cadence::Cron(Box::new(schedule)))
    }

    pub fn from_job_config(name: &str, config: &JobConfig) -> Result<Self, ConfigError> {
        match (&config.interval_seconds, &config.schedule) {
            (Some(seconds), None) => Ok(Cadence::every_seconds(*seconds)),
            (None, Some(expr)) => Cadence::cron(expr),
            _ => Err(ConfigError::InvalidValue {
                field: format!("jobs.{}", name),
                reason: "exactly one of interval_seconds or schedule is required".to_string(),
            }),
        }
    }

    /// Next due instant strictly after `now`. `None` means the schedule has
    /// no future occurrences.
    pub fn next_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Cadence::Every(interval) => Some(now + *interval),
            Cadence::Cron(schedule) => schedule.after(&now).next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn interval_advances_by_fixed_amount() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
        let cadence = Cadence::every_seconds(300);
        assert_eq!(
            cadence.next_after(now),
            Some(Utc.with_ymd_and_hms(2024, 3, 15, 10, 5, 0).unwrap())
        );
    }

    #[test]
    fn six_field_cron_parses() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 1).unwrap();
        let cadence = Cadence::cron("0 0 2 * * *").unwrap();
        let next = cadence.next_after(now).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 3, 16, 2, 0, 0).unwrap());
    }

    #[test]
    fn five_field_cron_gets_zero_seconds() {
        let cadence = Cadence::cron("0 6 * * Mon").unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
        // 2024-03-15 is a Friday; the next Monday is the 18th.
        let next = cadence.next_after(now).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 3, 18, 6, 0, 0).unwrap());
    }

    #[test]
    fn garbage_cron_is_a_config_error() {
        assert!(Cadence::cron("not a schedule").is_err());
    }
}
