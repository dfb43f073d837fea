use crate::config::default_open_settings_on_start;

use serde::{Deserialize, Serialize};

/// Application behavior configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// Whether to show the settings window once the bridge is ready.
    #[serde(default = "default_open_settings_on_start")]
    pub open_settings_on_start: bool,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            open_settings_on_start: default_open_settings_on_start(),
        }
    }
}
