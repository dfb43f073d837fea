use crate::TrayIconState;

/// Commands sent from the async runtime to the main UI thread.
///
/// The main thread owns `TrayManager` (because `TrayIcon` is `!Send`) and the
/// hotkey registrations, so tray mutations and process exit flow through here.
#[derive(Debug, Clone, Copy)]
pub enum TrayCommand {
    /// Update the tray icon to a new state.
    SetState(TrayIconState),
    /// Unregister hotkeys and exit the event loop.
    Shutdown,
}
