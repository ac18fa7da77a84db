pub mod audit;
pub mod config;
pub mod errors;
pub mod jobs;
pub mod remote;
pub mod scheduler;
pub mod window;

// Re-export commonly used types
pub use audit::AuditLog;
pub use config::{Config, ConfigManager, JobConfig};
pub use errors::{ConfigError, FailureKind, RemoteError, RemoteErrorKind};
pub use jobs::{JobOutcome, JobResult, JobSpec};
pub use remote::{Operation, RemoteClient};
pub use scheduler::{Cadence, JobState, Scheduler};
pub use window::TimeWindow;
