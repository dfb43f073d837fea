mod clipboard_sink;
mod recording_event;
mod shell_state;

pub use {
    clipboard_sink::ClipboardSink, recording_event::RecordingEvent, shell_state::ShellState,
};

/// Buffered recording events per subscriber before it starts lagging.
pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 32;
