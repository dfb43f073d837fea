use serde::{Deserialize, Serialize};

/// Push notification sent to subscribers whenever the recording flag is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "recording-status")]
pub struct RecordingEvent {
    /// New value of the recording flag.
    pub recording: bool,
}
