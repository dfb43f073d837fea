use crate::{
    ClipboardSink, ConnectedWindows, HealthChecker, ShellState,
    bridge::access::{allowed_hosts, allowed_origins},
};

use std::sync::Arc;

use axum::http::HeaderValue;
use tokio::sync::watch;

/// Handles the bridge handlers are allowed to use.
#[derive(Clone)]
pub struct BridgeState {
    pub(crate) shell: Arc<ShellState>,
    pub(crate) clipboard: Arc<dyn ClipboardSink>,
    pub(crate) health: HealthChecker,
    pub(crate) hosts: Arc<Vec<HeaderValue>>,
    pub(crate) origins: Arc<Vec<HeaderValue>>,
    pub(crate) windows: ConnectedWindows,
    pub(crate) shutdown_rx: watch::Receiver<bool>,
}

impl BridgeState {
    /// Bundle the shell handles for the bridge.
    ///
    /// Until [`Self::bound_to`] is called every request is refused.
    /// `shutdown_rx` flipping to `true` closes open event streams.
    pub fn new(
        shell: Arc<ShellState>,
        clipboard: Arc<dyn ClipboardSink>,
        health: HealthChecker,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            shell,
            clipboard,
            health,
            hosts: Arc::new(Vec::new()),
            origins: Arc::new(Vec::new()),
            windows: ConnectedWindows::default(),
            shutdown_rx,
        }
    }

    /// Accept requests addressed to the loopback bridge on `port`, from
    /// pages it served.
    pub fn bound_to(mut self, port: u16) -> Self {
        self.hosts = Arc::new(allowed_hosts(port));
        self.origins = Arc::new(allowed_origins(port));
        self
    }

    /// Shared count of connected settings windows.
    pub fn windows(&self) -> ConnectedWindows {
        self.windows.clone()
    }
}
