//! Global hotkey registration and event forwarding.
//!
//! Bindings come from the settings loaded at startup and stay fixed for the
//! lifetime of the process. Each press of a registered hotkey is forwarded to
//! the main application as an [`AppCommand::HotkeyTriggered`]; the shell
//! state decides whether it starts a recording.

use crate::{AppCommand, AppError, AppResult, hotkey_binding::parse_binding};

use std::{collections::HashMap, panic::Location, time::Duration};

use error_location::ErrorLocation;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState, hotkey::HotKey};
use speechmate_core::{HotkeyAction, Settings};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// OS-level hotkey registrations owned by the main thread.
///
/// Must stay alive on the thread that pumps the platform event loop.
pub struct HotkeyRegistry {
    manager: GlobalHotKeyManager,
    registered: Vec<HotKey>,
}

impl HotkeyRegistry {
    /// Unregister every hotkey this registry registered.
    #[instrument(skip(self))]
    pub fn unregister_all(&mut self) {
        if self.registered.is_empty() {
            return;
        }

        match self.manager.unregister_all(&self.registered) {
            Ok(()) => info!(count = self.registered.len(), "Global hotkeys unregistered"),
            Err(e) => error!(error = %e, "Failed to unregister global hotkeys"),
        }

        self.registered.clear();
    }

    /// Number of hotkeys currently registered.
    pub fn count(&self) -> usize {
        self.registered.len()
    }
}

/// Global hotkey handler.
pub struct HotkeyHandler {
    actions: HashMap<u32, HotkeyAction>,
    command_tx: mpsc::Sender<AppCommand>,
}

impl HotkeyHandler {
    /// Register the hotkeys bound in `settings`.
    ///
    /// Must be called on a thread with a message pump (e.g. the main thread
    /// running a `tao` event loop) so that `WM_HOTKEY` messages are
    /// dispatched on Windows.
    ///
    /// A binding that fails to parse or register is logged and skipped; the
    /// remaining hotkeys still work. Only failing to create the manager
    /// itself is an error.
    #[track_caller]
    #[instrument(skip(settings))]
    pub fn register_hotkeys(
        settings: &Settings,
    ) -> AppResult<(HotkeyRegistry, HashMap<u32, HotkeyAction>)> {
        let manager =
            GlobalHotKeyManager::new().map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to create manager: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let mut registered = Vec::new();
        let mut actions = HashMap::new();

        for action in HotkeyAction::ALL {
            let binding = settings.binding_for(action);

            let hotkey = match parse_binding(binding) {
                Ok(hotkey) => hotkey,
                Err(e) => {
                    error!(action = %action, binding, error = %e, "Hotkey binding ignored");
                    continue;
                }
            };

            if !action.is_registered() {
                info!(action = %action, binding, "Hotkey stored but not registered");
                continue;
            }

            match manager.register(hotkey) {
                Ok(()) => {
                    info!(action = %action, binding, "Global hotkey registered");
                    registered.push(hotkey);
                    actions.insert(hotkey.id(), action);
                }
                Err(e) => {
                    error!(
                        action = %action,
                        binding,
                        error = %e,
                        "Failed to register hotkey, continuing without it"
                    );
                }
            }
        }

        Ok((
            HotkeyRegistry {
                manager,
                registered,
            },
            actions,
        ))
    }

    /// Create a handler for previously registered hotkeys.
    ///
    /// `actions` maps hotkey ids from [`Self::register_hotkeys`] to actions.
    /// This struct is `Send` and can live on any thread; it only listens on
    /// the global [`GlobalHotKeyEvent`] channel.
    pub fn new(actions: HashMap<u32, HotkeyAction>, command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self {
            actions,
            command_tx,
        }
    }

    /// Run the hotkey handler event loop until shutdown is signalled.
    #[instrument(skip_all)]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let receiver = GlobalHotKeyEvent::receiver().clone();
        let (event_tx, mut event_rx) = mpsc::channel(32);

        // GlobalHotKeyEvent::receiver() is a blocking crossbeam receiver;
        // one blocking task forwards it into the async world. It exits on
        // the first send after event_rx is dropped.
        let handle = tokio::task::spawn_blocking(move || {
            while let Ok(event) = receiver.recv() {
                if event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Hotkey handler shutting down");
                    break;
                }
                Some(event) = event_rx.recv() => {
                    if let Err(e) = self.handle_event(event).await {
                        warn!(error = ?e, "Failed to forward hotkey");
                    }
                }
            }
        }

        drop(event_rx);

        // The blocking task may be parked in recv() until the next hotkey
        // event; it is cleaned up on process exit regardless.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Hotkey event forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Hotkey event forwarder task panicked"),
            Err(_) => debug!(
                "Hotkey event forwarder did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }

        Ok(())
    }

    /// Action bound to a key-press event, if any. Releases are ignored.
    pub fn action_for(&self, event: &GlobalHotKeyEvent) -> Option<HotkeyAction> {
        if !matches!(event.state, HotKeyState::Pressed) {
            return None;
        }
        self.actions.get(&event.id).copied()
    }

    #[instrument(skip_all)]
    pub(crate) async fn handle_event(&self, event: GlobalHotKeyEvent) -> AppResult<()> {
        let Some(action) = self.action_for(&event) else {
            return Ok(());
        };

        let session_id = Uuid::new_v4();

        self.command_tx
            .send(AppCommand::HotkeyTriggered { action, session_id })
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send HotkeyTriggered: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(action = %action, session_id = %session_id, "Hotkey pressed");

        Ok(())
    }
}
