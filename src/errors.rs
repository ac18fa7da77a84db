//! Custom error types for the reconciliation engine
//!
//! Provides structured error handling with context for the transport layer,
//! configuration loading and job execution.

use std::fmt;

/// Classification of a failed remote call.
///
/// Transient kinds (timeout, connection refused, 5xx) are worth retrying;
/// the rest indicate a request or response problem that a retry cannot fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RemoteErrorKind {
    /// Request exceeded the transport timeout
    Timeout,

    /// TCP connection to the endpoint was refused or dropped
    ConnectionRefused,

    /// Endpoint answered with a 5xx status
    ServerError,

    /// Response body could not be parsed as the expected shape
    InvalidResponse,

    /// Endpoint reported a validation error for the operation itself
    RemoteValidation,
}

impl RemoteErrorKind {
    /// Whether a retry has any chance of succeeding
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RemoteErrorKind::Timeout
                | RemoteErrorKind::ConnectionRefused
                | RemoteErrorKind::ServerError
        )
    }
}

impl fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteErrorKind::Timeout => write!(f, "timeout"),
            RemoteErrorKind::ConnectionRefused => write!(f, "connection refused"),
            RemoteErrorKind::ServerError => write!(f, "server error"),
            RemoteErrorKind::InvalidResponse => write!(f, "invalid response"),
            RemoteErrorKind::RemoteValidation => write!(f, "remote validation"),
        }
    }
}

/// Error returned by [`crate::remote::RemoteClient`] after retries are exhausted
/// or a non-transient failure is hit.
#[derive(Debug, Clone)]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub message: String,
}

impl RemoteError {
    pub fn new(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Configuration error variants. Fatal during startup, never raised once the
/// scheduler loop is running.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to load configuration file
    LoadFailed { path: String, reason: String },

    /// Invalid configuration value
    InvalidValue { field: String, reason: String },

    /// Missing required configuration
    MissingRequired { field: String },

    /// A job name was registered twice
    DuplicateJob { name: String },

    /// Configuration parsing error
    ParseError { reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path, reason)
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
            ConfigError::MissingRequired { field } => {
                write!(f, "Missing required field: {}", field)
            }
            ConfigError::DuplicateJob { name } => {
                write!(f, "Job '{}' is already registered", name)
            }
            ConfigError::ParseError { reason } => {
                write!(f, "Failed to parse config: {}", reason)
            }
        }
    }
}

/// What made a job execution fail. Stored in the audit trail alongside the
/// literal error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FailureKind {
    /// The remote call failed (after the transport's own retries)
    Remote(RemoteErrorKind),

    /// The job body itself faulted; caught at the scheduler boundary
    Unexpected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Remote(kind) => write!(f, "{}", kind),
            FailureKind::Unexpected => write!(f, "unexpected"),
        }
    }
}

impl From<RemoteErrorKind> for FailureKind {
    fn from(kind: RemoteErrorKind) -> Self {
        FailureKind::Remote(kind)
    }
}

impl std::error::Error for RemoteError {}
impl std::error::Error for ConfigError {}
