/// Tray icon states, following the recording flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIconState {
    /// Waiting for a hotkey.
    Idle,
    /// A recording session is active.
    Recording,
}

impl From<bool> for TrayIconState {
    fn from(recording: bool) -> Self {
        if recording {
            TrayIconState::Recording
        } else {
            TrayIconState::Idle
        }
    }
}
