mod health_checker;

pub use health_checker::HealthChecker;

/// Health-check timeout when none is configured.
pub const DEFAULT_HEALTH_TIMEOUT_MS: u64 = 5000;
