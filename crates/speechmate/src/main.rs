//! SpeechMate: tray shell with global hotkeys and a settings window.

mod app;
mod app_command;
mod clipboard_writer;
mod config;
mod error;
mod hotkey_binding;
mod hotkey_handler;
mod logging;
mod settings_window;
mod tray_command;
mod tray_icon_state;
mod tray_manager;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    clipboard_writer::ClipboardWriter,
    error::{AppError, Result as AppResult},
    hotkey_handler::{HotkeyHandler, HotkeyRegistry},
    settings_window::SettingsWindow,
    tray_command::TrayCommand,
    tray_icon_state::TrayIconState,
    tray_manager::{TrayManager, TrayMenuIds},
};

use crate::config::Config;

use std::{collections::HashMap, sync::Arc};

use speechmate_core::{ClipboardSink, SettingsStore, ShellState};
use tao::{
    event::{Event, StartCause},
    event_loop::{ControlFlow, EventLoopBuilder},
};
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

/// Application entry point.
fn main() {
    let log_dir = Config::log_dir().ok();
    // Flushed explicitly on quit: the event loop never returns.
    let mut log_guard = logging::init(log_dir.as_deref());

    let event_loop = EventLoopBuilder::<TrayCommand>::with_user_event().build();
    let tray_proxy = event_loop.create_proxy();

    // TrayManager lives on the main thread - TrayIcon is !Send on all platforms.
    let mut tray_manager = match TrayManager::new() {
        Ok(tm) => tm,
        Err(e) => {
            error!("Failed to create TrayManager: {:?}", e);
            std::process::exit(1);
        }
    };

    // Persists across event loop iterations; unregistered on quit.
    let mut hotkey_registry: Option<HotkeyRegistry> = None;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(cmd) => match cmd {
                TrayCommand::SetState(state) => {
                    if let Err(e) = tray_manager.update_state(state) {
                        error!(error = ?e, "Failed to update tray icon");
                    }
                }
                TrayCommand::Shutdown => {
                    if let Some(registry) = hotkey_registry.as_mut() {
                        registry.unregister_all();
                    }
                    info!("Exiting");
                    drop(log_guard.take());
                    *control_flow = ControlFlow::ExitWithCode(0);
                }
            },
            Event::NewEvents(StartCause::Init) => {
                let config = Config::load().unwrap_or_else(|e| {
                    warn!(error = ?e, "Shell config unusable, using defaults");
                    Config::default()
                });

                let store = Config::settings_store().unwrap_or_else(|e| {
                    error!(error = ?e, "No settings directory, using working directory");
                    SettingsStore::in_dir(".")
                });
                let settings = store.load_or_default();

                // Register hotkeys on the main thread: tao's event loop pumps
                // the Windows messages needed for WM_HOTKEY delivery.
                let actions = match HotkeyHandler::register_hotkeys(&settings) {
                    Ok((registry, actions)) => {
                        info!(count = registry.count(), "Hotkeys ready");
                        hotkey_registry = Some(registry);
                        actions
                    }
                    Err(e) => {
                        error!(error = ?e, "Global hotkeys unavailable, continuing without them");
                        HashMap::new()
                    }
                };

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                let shell = Arc::new(ShellState::new(store, settings));
                let clipboard: Arc<dyn ClipboardSink> = Arc::new(ClipboardWriter::new());
                let (command_tx, command_rx) = mpsc::channel(32);
                let (shutdown_tx, shutdown_rx) = watch::channel(false);

                let tray_proxy = tray_proxy.clone();
                let menu_ids = tray_manager.menu_ids().clone();

                // Spawn tokio runtime on separate thread.
                // TrayManager and hotkey registrations stay on the main thread.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(async {
                        let hotkey_handler = HotkeyHandler::new(actions, command_tx);

                        let app = App {
                            shell,
                            clipboard,
                            config,
                            tray_proxy,
                            command_rx,
                            shutdown_tx,
                            menu_ids,
                        };

                        tokio::join!(
                            async {
                                if let Err(e) = hotkey_handler.run(shutdown_rx).await {
                                    error!(error = ?e, "Hotkey handler error");
                                }
                            },
                            async {
                                if let Err(e) = app.run().await {
                                    error!(error = ?e, "App error");
                                }
                            }
                        );
                    });
                });
            }
            _ => {}
        }
    });
}
