//! SpeechMate Core Library
//!
//! Everything the SpeechMate tray shell does that does not need a desktop
//! session: the settings record and its JSON store, the shell-owned recording
//! state with its event fan-out, the host health check, and the bridge the
//! settings UI talks through.
//!
//! # Example
//!
//! ```no_run
//! use speechmate_core::{HotkeyAction, SettingsStore, ShellState};
//!
//! # async fn run() {
//! let shell = ShellState::load(SettingsStore::new("config.json"));
//! let mut events = shell.subscribe();
//!
//! assert!(shell.trigger(HotkeyAction::Asr).await);
//! assert!(events.recv().await.map(|e| e.recording).unwrap_or(false));
//! # }
//! ```

mod bridge;
mod error;
mod health;
mod hotkey;
mod settings;
mod shell;

pub use {
    bridge::{
        BridgeError, BridgeServer, BridgeState, ClipboardRequest, ConnectedWindows,
        HealthCheckRequest, HealthCheckResponse, SetRecordingRequest, WindowGuard, router,
    },
    error::{CoreError, Result as CoreResult},
    health::{DEFAULT_HEALTH_TIMEOUT_MS, HealthChecker},
    hotkey::HotkeyAction,
    settings::{PartialSettings, SETTINGS_FILE_NAME, Settings, SettingsStore},
    shell::{ClipboardSink, RecordingEvent, ShellState},
};

#[cfg(test)]
mod tests;
