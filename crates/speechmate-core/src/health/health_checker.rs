use crate::{CoreError, CoreResult};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument};

/// Probes `{base_url}/health` on the host service.
///
/// Every request carries the configured timeout, so a check against an
/// unreachable host resolves to failure instead of hanging.
#[derive(Debug, Clone)]
pub struct HealthChecker {
    client: reqwest::Client,
    timeout: Duration,
}

impl HealthChecker {
    /// Create a checker whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::HealthClient`] if the HTTP client cannot be built.
    #[track_caller]
    pub fn new(timeout: Duration) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|source| CoreError::HealthClient {
                source,
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self { client, timeout })
    }

    /// Configured per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Health endpoint for `base_url`, ignoring trailing slashes.
    pub fn health_url(base_url: &str) -> String {
        format!("{}/health", base_url.trim().trim_end_matches('/'))
    }

    /// Whether `base_url` names an http(s) host at all.
    pub fn is_checkable(base_url: &str) -> bool {
        reqwest::Url::parse(base_url.trim())
            .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
    }

    /// Returns `true` only for a 2xx answer. Network errors, timeouts,
    /// invalid or non-http URLs and non-2xx statuses all count as failure;
    /// the cause is only logged.
    #[instrument(skip(self))]
    pub async fn check(&self, base_url: &str) -> bool {
        if !Self::is_checkable(base_url) {
            debug!(base_url, "Not an http(s) address, nothing to check");
            return false;
        }

        let url = Self::health_url(base_url);

        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                info!(url = %url, status = %response.status(), "Host reachable");
                true
            }
            Ok(response) => {
                debug!(url = %url, status = %response.status(), "Host answered with failure status");
                false
            }
            Err(e) => {
                debug!(url = %url, timed_out = e.is_timeout(), error = %e, "Host unreachable");
                false
            }
        }
    }
}
