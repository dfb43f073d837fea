//! Shell-owned state: the settings record and the recording flag.
//!
//! Both live behind their own lock. Recording events are broadcast while the
//! flag lock is held, so every subscriber observes changes in the order they
//! were made.

use crate::{
    CoreError, CoreResult, HotkeyAction, PartialSettings, RecordingEvent, Settings, SettingsStore,
    shell::EVENT_CHANNEL_CAPACITY,
};

use std::panic::Location;

use error_location::ErrorLocation;
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, info, instrument};

/// Settings and recording state owned by the shell controller.
///
/// Shared with the bridge and the hotkey path through an `Arc` handle.
pub struct ShellState {
    store: SettingsStore,
    settings: Mutex<Settings>,
    recording: Mutex<bool>,
    events_tx: broadcast::Sender<RecordingEvent>,
}

impl ShellState {
    /// Create shell state around an already loaded settings record.
    pub fn new(store: SettingsStore, settings: Settings) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            store,
            settings: Mutex::new(settings),
            recording: Mutex::new(false),
            events_tx,
        }
    }

    /// Create shell state by loading settings from `store`.
    ///
    /// A missing or corrupt file degrades to defaults.
    pub fn load(store: SettingsStore) -> Self {
        let settings = store.load_or_default();
        Self::new(store, settings)
    }

    /// Current settings record (get-config).
    pub async fn settings(&self) -> Settings {
        self.settings.lock().await.clone()
    }

    /// Merge `partial` over the current record and persist the result
    /// (save-config).
    ///
    /// The in-memory record only changes once the file write succeeded.
    /// The write runs on the blocking pool; the settings lock is held across
    /// it so concurrent saves land on disk in order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::SettingsWrite`] if persisting fails.
    #[instrument(skip(self, partial))]
    pub async fn save_settings(&self, partial: PartialSettings) -> CoreResult<Settings> {
        let mut settings = self.settings.lock().await;
        let merged = settings.merged(partial);

        let store = self.store.clone();
        let to_write = merged.clone();
        tokio::task::spawn_blocking(move || store.save(&to_write))
            .await
            .map_err(|e| CoreError::SettingsWrite {
                path: self.store.path().to_path_buf(),
                reason: format!("Settings write task failed: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })??;

        *settings = merged.clone();

        info!("Settings updated");

        Ok(merged)
    }

    /// Current value of the recording flag.
    pub async fn is_recording(&self) -> bool {
        *self.recording.lock().await
    }

    /// Overwrite the recording flag and notify subscribers (set-recording).
    #[instrument(skip(self))]
    pub async fn set_recording(&self, recording: bool) {
        let mut flag = self.recording.lock().await;
        *flag = recording;
        self.broadcast(recording);

        info!(recording, "Recording flag set");
    }

    /// Start recording on behalf of a hotkey.
    ///
    /// Returns `false` and emits nothing if recording is already active.
    #[instrument(skip(self))]
    pub async fn trigger(&self, action: HotkeyAction) -> bool {
        let mut flag = self.recording.lock().await;

        if *flag {
            debug!(action = %action, "Already recording, hotkey ignored");
            return false;
        }

        *flag = true;
        self.broadcast(true);

        info!(action = %action, "Recording started");

        true
    }

    /// Subscribe to recording-state changes.
    ///
    /// Only changes made after this call are delivered.
    pub fn subscribe(&self) -> broadcast::Receiver<RecordingEvent> {
        self.events_tx.subscribe()
    }

    fn broadcast(&self, recording: bool) {
        // No subscribers is normal while the settings window is closed.
        if self.events_tx.send(RecordingEvent { recording }).is_err() {
            debug!(recording, "No recording subscribers");
        }
    }
}
