use crate::{
    BridgeState, ClipboardSink, CoreError, CoreResult, HealthChecker, SettingsStore, ShellState,
};

use std::{
    panic::Location,
    sync::{Arc, Mutex},
    time::Duration,
};

use error_location::ErrorLocation;
use tempfile::TempDir;
use tokio::sync::watch;

/// Port the oneshot bridge state believes it is bound to.
pub(crate) const TEST_PORT: u16 = 7878;
/// `Host` header of requests addressed to [`TEST_PORT`].
pub(crate) const TEST_HOST: &str = "127.0.0.1:7878";
/// Origin of the settings page served on [`TEST_PORT`].
pub(crate) const TEST_ORIGIN: &str = "http://127.0.0.1:7878";

/// Clipboard double that remembers every write.
#[derive(Default)]
pub(crate) struct RecordingClipboard {
    pub(crate) writes: Mutex<Vec<String>>,
}

impl ClipboardSink for RecordingClipboard {
    fn write_text(&self, text: &str) -> CoreResult<()> {
        if let Ok(mut writes) = self.writes.lock() {
            writes.push(text.to_string());
        }
        Ok(())
    }
}

/// Clipboard double that always fails.
pub(crate) struct BrokenClipboard;

impl ClipboardSink for BrokenClipboard {
    fn write_text(&self, _text: &str) -> CoreResult<()> {
        Err(CoreError::Clipboard {
            reason: "no display".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// Shell state persisting into a fresh temporary directory.
#[allow(clippy::unwrap_used)]
pub(crate) fn temp_shell() -> (TempDir, Arc<ShellState>) {
    let dir = tempfile::tempdir().unwrap();
    let shell = ShellState::load(SettingsStore::in_dir(dir.path()));
    (dir, Arc::new(shell))
}

/// Bridge state around `shell` with a short health-check timeout, accepting
/// requests for [`TEST_HOST`].
#[allow(clippy::unwrap_used)]
pub(crate) fn bridge_state(
    shell: Arc<ShellState>,
    clipboard: Arc<dyn ClipboardSink>,
) -> (watch::Sender<bool>, BridgeState) {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let health = HealthChecker::new(Duration::from_millis(500)).unwrap();
    let state = BridgeState::new(shell, clipboard, health, shutdown_rx).bound_to(TEST_PORT);
    (shutdown_tx, state)
}
