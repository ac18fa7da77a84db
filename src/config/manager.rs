use super::Config;
use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio::fs;
use tracing::info;

/// Loads the engine configuration once at startup and hands out shared
/// references. There is no ambient/global config state; everything that needs
/// configuration receives it explicitly.
pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    pub async fn new(config_path: &str) -> Result<Self> {
        let config = Self::load_configuration(config_path).await?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    async fn load_configuration(config_path: &str) -> Result<Config> {
        let content = fs::read_to_string(config_path)
            .await
            .map_err(|e| anyhow!("Failed to read config {}: {}", config_path, e))?;

        let mut config: Config =
            toml::from_str(&content).map_err(|e| anyhow!("Failed to parse config: {}", e))?;

        // Environment overrides for the two deployment-specific knobs
        if let Ok(endpoint) = std::env::var("CRM_ENDPOINT") {
            if !endpoint.is_empty() {
                config.endpoint = endpoint;
            }
        }
        if let Ok(log_dir) = std::env::var("CRM_LOG_DIR") {
            if !log_dir.is_empty() {
                config.log_dir = log_dir;
            }
        }

        config
            .validate()
            .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

        info!(
            "Configuration loaded: endpoint={}, {} jobs, log_dir={}",
            config.endpoint,
            config.jobs.len(),
            config.log_dir
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn loads_and_validates_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
endpoint = "http://localhost:8000/graphql"
log_dir = "/tmp/crm-audit"

[jobs.heartbeat]
interval_seconds = 60

[jobs.weekly-report]
schedule = "0 0 6 * * Mon"
"#
        )
        .unwrap();

        let manager = ConfigManager::new(file.path().to_str().unwrap())
            .await
            .expect("config should load");
        let config = manager.get_current_config();

        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.jobs.len(), 2);
        assert_eq!(config.jobs["heartbeat"].interval_seconds, Some(60));
        assert!(config.jobs["weekly-report"].schedule.is_some());
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let result = ConfigManager::new("/nonexistent/engine.toml").await;
        assert!(result.is_err());
    }
}
