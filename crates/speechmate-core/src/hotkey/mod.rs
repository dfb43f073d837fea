mod hotkey_action;

pub use hotkey_action::HotkeyAction;
