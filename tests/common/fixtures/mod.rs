pub mod mock_crm;

pub use mock_crm::MockCrmServer;

use crm_reconciler::config::Config;
use std::collections::HashMap;

/// Config pointing at a mock endpoint, with zero backoff so retry tests run
/// fast.
pub fn test_config(endpoint: &str, log_dir: &str) -> Config {
    Config {
        endpoint: endpoint.to_string(),
        request_timeout_seconds: 5,
        max_attempts: 3,
        backoff_base_seconds: 0,
        tick_interval_seconds: 1,
        log_dir: log_dir.to_string(),
        jobs: HashMap::new(),
    }
}
