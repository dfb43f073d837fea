use crate::CoreResult;

/// OS clipboard access, provided by the binary that owns the desktop session.
///
/// Kept behind a trait so the bridge never holds a platform handle directly.
pub trait ClipboardSink: Send + Sync {
    /// Replace the clipboard contents with `text`.
    fn write_text(&self, text: &str) -> CoreResult<()>;
}
