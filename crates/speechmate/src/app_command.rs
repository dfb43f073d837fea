use speechmate_core::HotkeyAction;
use uuid::Uuid;

/// Commands sent from the hotkey handler to the main application.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// A registered global hotkey was pressed.
    HotkeyTriggered {
        /// Action bound to the hotkey.
        action: HotkeyAction,
        /// Session ID for log correlation if this starts a recording.
        session_id: Uuid,
    },
}
