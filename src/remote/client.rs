use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::Config;
use crate::errors::{RemoteError, RemoteErrorKind};

/// A single query or mutation against the CRM endpoint.
#[derive(Debug, Clone)]
pub struct Operation {
    pub query: String,
    pub variables: Option<Value>,
}

impl Operation {
    pub fn query(document: impl Into<String>) -> Self {
        Self {
            query: document.into(),
            variables: None,
        }
    }

    pub fn with_variables(document: impl Into<String>, variables: Value) -> Self {
        Self {
            query: document.into(),
            variables: Some(variables),
        }
    }
}

/// Request/response client owning the retry, backoff and timeout policy for
/// calls to the remote data service.
///
/// Holds no mutable cross-call state, so one instance can be shared across
/// jobs. The client never logs; converting outcomes into audit entries is the
/// caller's job.
pub struct RemoteClient {
    client: Client,
    endpoint: String,
    max_attempts: u32,
    backoff_base: Duration,
}

impl RemoteClient {
    pub fn new(config: &Config) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                RemoteError::new(
                    RemoteErrorKind::InvalidResponse,
                    format!("Failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            max_attempts: config.max_attempts.max(1),
            backoff_base: Duration::from_secs(config.backoff_base_seconds),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Execute an operation with the configured timeout.
    pub async fn execute(&self, operation: &Operation) -> Result<Value, RemoteError> {
        self.execute_with_timeout(operation, None).await
    }

    /// Execute an operation, optionally overriding the transport timeout for
    /// this call only.
    ///
    /// Transient failures are retried up to `max_attempts` total attempts with
    /// exponential backoff (base, base*2, base*4, ...). Non-transient failures
    /// surface immediately.
    pub async fn execute_with_timeout(
        &self,
        operation: &Operation,
        timeout: Option<Duration>,
    ) -> Result<Value, RemoteError> {
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                let backoff = self.backoff_base * 2u32.pow(attempt - 2);
                sleep(backoff).await;
            }

            match self.execute_once(operation, timeout).await {
                Ok(data) => return Ok(data),
                Err(e) if e.kind.is_transient() => {
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            RemoteError::new(RemoteErrorKind::ServerError, "no attempts were made")
        }))
    }

    async fn execute_once(
        &self,
        operation: &Operation,
        timeout: Option<Duration>,
    ) -> Result<Value, RemoteError> {
        let mut payload = json!({ "query": operation.query });
        if let Some(variables) = &operation.variables {
            payload["variables"] = variables.clone();
        }

        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(classify_transport_error)?;

        let status = response.status();
        if status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::new(
                RemoteErrorKind::ServerError,
                format!("endpoint returned HTTP {}: {}", status, body),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::new(
                RemoteErrorKind::RemoteValidation,
                format!("endpoint rejected request with HTTP {}: {}", status, body),
            ));
        }

        let body: Value = response.json().await.map_err(|e| {
            RemoteError::new(
                RemoteErrorKind::InvalidResponse,
                format!("Failed to parse response: {}", e),
            )
        })?;

        // GraphQL-style error payloads arrive with HTTP 200; retrying them
        // would not help.
        if let Some(errors) = body.get("errors").and_then(|v| v.as_array()) {
            if !errors.is_empty() {
                let message = errors[0]
                    .get("message")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown remote error");
                return Err(RemoteError::new(
                    RemoteErrorKind::RemoteValidation,
                    message.to_string(),
                ));
            }
        }

        match body.get("data") {
            Some(data) if !data.is_null() => Ok(data.clone()),
            _ => Err(RemoteError::new(
                RemoteErrorKind::InvalidResponse,
                "response carried no data field",
            )),
        }
    }
}

fn classify_transport_error(error: reqwest::Error) -> RemoteError {
    if error.is_timeout() {
        RemoteError::new(RemoteErrorKind::Timeout, error.to_string())
    } else if error.is_connect() {
        RemoteError::new(RemoteErrorKind::ConnectionRefused, error.to_string())
    } else {
        RemoteError::new(RemoteErrorKind::ServerError, error.to_string())
    }
}
