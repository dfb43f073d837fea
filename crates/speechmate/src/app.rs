use crate::{
    AppCommand, AppResult, SettingsWindow, TrayCommand, TrayIconState, TrayMenuIds,
    config::Config,
};

use std::{sync::Arc, time::Duration};

use speechmate_core::{BridgeServer, BridgeState, ClipboardSink, HealthChecker, ShellState};
use tao::event_loop::EventLoopProxy;
use tokio::{
    sync::{broadcast::error::RecvError, mpsc, watch},
    task::JoinHandle,
};
use tracing::{debug, error, info, instrument, warn};
use tray_icon::{MouseButton, TrayIconEvent, menu::MenuEvent};

/// How long shutdown waits for a background task before moving on.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Main application state.
///
/// Runs on the async runtime thread. Tray updates and process exit go back
/// to the main thread through `tray_proxy` because `TrayIcon` is `!Send`
/// and must remain on the UI thread.
pub struct App {
    pub(crate) shell: Arc<ShellState>,
    pub(crate) clipboard: Arc<dyn ClipboardSink>,
    pub(crate) config: Config,
    pub(crate) tray_proxy: EventLoopProxy<TrayCommand>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) menu_ids: TrayMenuIds,
}

/// Tray interactions the app reacts to.
#[derive(Debug)]
enum TrayInput {
    Menu(MenuEvent),
    Icon(TrayIconEvent),
}

impl App {
    /// Run the main application event loop until quit.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("SpeechMate starting");

        let mut window = SettingsWindow::hidden();
        let bridge_handle = self.start_bridge(&mut window).await;
        let tray_state_handle = self.spawn_tray_state_follower();

        if self.config.behavior.open_settings_on_start
            && window.is_ready()
            && let Err(e) = window.show()
        {
            error!(error = ?e, "Failed to show settings window");
        }

        // Tray event forwarding via persistent blocking tasks.
        //
        // MenuEvent::receiver() and TrayIconEvent::receiver() are blocking
        // crossbeam receivers. Each forwarder exits on its first send after
        // tray_rx is dropped.
        let (tray_tx, mut tray_rx) = mpsc::channel(32);
        let menu_tx = tray_tx.clone();
        let menu_handle = tokio::task::spawn_blocking(move || {
            let receiver = MenuEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if menu_tx.blocking_send(TrayInput::Menu(event)).is_err() {
                    break;
                }
            }
        });
        let icon_handle = tokio::task::spawn_blocking(move || {
            let receiver = TrayIconEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if tray_tx.blocking_send(TrayInput::Icon(event)).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                Some(input) = tray_rx.recv() => {
                    if self.handle_tray_input(input, &window) {
                        info!("Quit requested from tray menu");
                        break;
                    }
                }

                Some(AppCommand::HotkeyTriggered { action, session_id }) = self.command_rx.recv() => {
                    if self.shell.trigger(action).await {
                        info!(session_id = %session_id, action = %action, "Recording session started");
                    }
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        drop(tray_rx);

        let _ = self.shutdown_tx.send(true);

        if let Some(handle) = bridge_handle {
            join_with_grace("Bridge server", handle).await;
        }
        join_with_grace("Tray state follower", tray_state_handle).await;
        join_with_grace("Tray menu forwarder", menu_handle).await;
        join_with_grace("Tray icon forwarder", icon_handle).await;

        // Hotkeys are unregistered on the main thread before it exits.
        if self.tray_proxy.send_event(TrayCommand::Shutdown).is_err() {
            warn!("Event loop already closed");
        }

        info!("SpeechMate shut down successfully");

        Ok(())
    }

    /// Bind and start the bridge. On failure the shell keeps running from
    /// the tray, without a settings window.
    async fn start_bridge(&self, window: &mut SettingsWindow) -> Option<JoinHandle<()>> {
        let health = match HealthChecker::new(self.config.health.timeout()) {
            Ok(health) => health,
            Err(e) => {
                error!(error = ?e, "Failed to create health checker, settings window disabled");
                return None;
            }
        };

        let server = match BridgeServer::bind(self.config.server.port).await {
            Ok(server) => server,
            Err(e) => {
                error!(error = ?e, "Failed to bind bridge, settings window disabled");
                return None;
            }
        };

        let state = BridgeState::new(
            Arc::clone(&self.shell),
            Arc::clone(&self.clipboard),
            health,
            self.shutdown_tx.subscribe(),
        );
        window.ready(server.url(), state.windows());

        let shutdown_rx = self.shutdown_tx.subscribe();

        Some(tokio::spawn(async move {
            if let Err(e) = server.serve(state, shutdown_rx).await {
                error!(error = ?e, "Bridge server error");
            }
        }))
    }

    /// Mirror the recording flag onto the tray icon.
    fn spawn_tray_state_follower(&self) -> JoinHandle<()> {
        let mut events = self.shell.subscribe();
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let tray_proxy = self.tray_proxy.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    event = events.recv() => match event {
                        Ok(event) => {
                            let state = TrayIconState::from(event.recording);
                            if tray_proxy.send_event(TrayCommand::SetState(state)).is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            debug!(skipped, "Tray state follower lagged");
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
        })
    }

    /// Handle one tray interaction. Returns `true` when quit was chosen.
    #[instrument(skip(self, window))]
    fn handle_tray_input(&self, input: TrayInput, window: &SettingsWindow) -> bool {
        match input {
            TrayInput::Menu(event) => {
                let ids = &self.menu_ids;
                if event.id == ids.quit {
                    return true;
                }
                if event.id == ids.show || event.id == ids.settings {
                    show_window(window);
                }
            }
            TrayInput::Icon(TrayIconEvent::DoubleClick {
                button: MouseButton::Left,
                ..
            }) => show_window(window),
            TrayInput::Icon(_) => {}
        }

        false
    }
}

fn show_window(window: &SettingsWindow) {
    if let Err(e) = window.show() {
        error!(error = ?e, "Failed to show settings window");
    }
}

async fn join_with_grace(name: &str, handle: JoinHandle<()>) {
    match tokio::time::timeout(SHUTDOWN_GRACE, handle).await {
        Ok(Ok(())) => debug!(task = name, "Stopped cleanly"),
        Ok(Err(e)) => error!(task = name, error = ?e, "Task panicked"),
        Err(_) => debug!(
            task = name,
            "Did not stop within timeout, will be cleaned up on exit"
        ),
    }
}
