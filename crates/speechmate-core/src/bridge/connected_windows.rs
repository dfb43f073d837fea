use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

/// Number of settings windows currently holding an event stream.
///
/// Cloned handles share one count.
#[derive(Debug, Clone, Default)]
pub struct ConnectedWindows {
    count: Arc<AtomicUsize>,
}

impl ConnectedWindows {
    /// Windows connected right now.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Whether at least one window is connected.
    pub fn any(&self) -> bool {
        self.count() > 0
    }

    /// Count one window for as long as the returned guard lives.
    pub fn connect(&self) -> WindowGuard {
        self.count.fetch_add(1, Ordering::SeqCst);
        WindowGuard {
            count: Arc::clone(&self.count),
        }
    }
}

/// One connected window; decrements the count on drop.
#[derive(Debug)]
pub struct WindowGuard {
    count: Arc<AtomicUsize>,
}

impl Drop for WindowGuard {
    fn drop(&mut self) {
        self.count.fetch_sub(1, Ordering::SeqCst);
    }
}
