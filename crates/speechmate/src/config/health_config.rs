use crate::config::default_health_timeout_ms;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Host health-check configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Upper bound for one health check, in milliseconds.
    #[serde(default = "default_health_timeout_ms")]
    pub timeout_ms: u64,
}

impl HealthConfig {
    /// Timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_health_timeout_ms(),
        }
    }
}
