//! OS clipboard access for the `write-clipboard` bridge operation.

use std::{panic::Location, sync::Mutex};

use arboard::Clipboard;
use error_location::ErrorLocation;
use speechmate_core::{ClipboardSink, CoreError, CoreResult};
use tracing::{debug, info, instrument, warn};

/// Clipboard writer backed by `arboard`.
///
/// The `Clipboard` handle is kept alive for the whole session: on X11 the
/// written text disappears once the owning handle is dropped. If the
/// clipboard is unavailable at startup, opening it is retried on each write.
pub struct ClipboardWriter {
    pub(crate) clipboard: Mutex<Option<Clipboard>>,
}

impl ClipboardWriter {
    /// Create a clipboard writer, opening the clipboard if possible.
    #[instrument]
    pub fn new() -> Self {
        let clipboard = match Clipboard::new() {
            Ok(clipboard) => {
                info!("Clipboard initialized");
                Some(clipboard)
            }
            Err(e) => {
                warn!(error = %e, "Clipboard unavailable, will retry on first write");
                None
            }
        };

        Self {
            clipboard: Mutex::new(clipboard),
        }
    }
}

impl Default for ClipboardWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardSink for ClipboardWriter {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    fn write_text(&self, text: &str) -> CoreResult<()> {
        let clipboard_err = |reason: String| CoreError::Clipboard {
            reason,
            location: ErrorLocation::from(Location::caller()),
        };

        let mut guard = self
            .clipboard
            .lock()
            .map_err(|e| clipboard_err(format!("Clipboard lock poisoned: {}", e)))?;

        if guard.is_none() {
            let clipboard = Clipboard::new()
                .map_err(|e| clipboard_err(format!("Failed to initialize clipboard: {}", e)))?;
            *guard = Some(clipboard);
        }

        let clipboard = guard
            .as_mut()
            .ok_or_else(|| clipboard_err("Clipboard not initialized".to_string()))?;

        clipboard
            .set_text(text)
            .map_err(|e| clipboard_err(format!("Failed to set clipboard: {}", e)))?;

        debug!("Text copied to clipboard");

        Ok(())
    }
}
