mod behaviour_config;
#[allow(clippy::module_inception)]
mod config;
mod health_config;
mod server_config;

pub(crate) use {
    behaviour_config::BehaviourConfig, config::Config, health_config::HealthConfig,
    server_config::ServerConfig,
};

pub(crate) const DEFAULT_OPEN_SETTINGS_ON_START: bool = true;
pub(crate) const DEFAULT_PORT: u16 = 7878;

pub(crate) fn default_open_settings_on_start() -> bool {
    DEFAULT_OPEN_SETTINGS_ON_START
}

pub(crate) fn default_port() -> u16 {
    DEFAULT_PORT
}

pub(crate) fn default_health_timeout_ms() -> u64 {
    speechmate_core::DEFAULT_HEALTH_TIMEOUT_MS
}
