//! The settings window: the bridge's settings page, shown in the user's browser.
//!
//! The window stays hidden until the bridge is bound. Closing the page only
//! hides it; the shell keeps running in the tray. While a page is connected,
//! showing the window again does not open another one.

use crate::{AppError, AppResult};

use std::panic::Location;

use error_location::ErrorLocation;
use speechmate_core::ConnectedWindows;
use tracing::{debug, info, instrument, warn};

/// Handle for showing the settings window.
#[derive(Debug, Clone, Default)]
pub struct SettingsWindow {
    url: Option<String>,
    connected: ConnectedWindows,
}

impl SettingsWindow {
    /// A window that cannot be shown until [`Self::ready`] is called.
    pub fn hidden() -> Self {
        Self::default()
    }

    /// Mark the window ready to be shown at `url`. `connected` counts the
    /// pages currently attached to the bridge.
    pub fn ready(&mut self, url: impl Into<String>, connected: ConnectedWindows) {
        self.url = Some(url.into());
        self.connected = connected;
    }

    /// Whether the bridge behind the window is up.
    pub fn is_ready(&self) -> bool {
        self.url.is_some()
    }

    /// Whether [`Self::show`] would open a new page right now.
    pub(crate) fn should_open(&self) -> bool {
        self.is_ready() && !self.connected.any()
    }

    /// Bring up the settings page.
    ///
    /// Does nothing but log if the bridge never came up, or if a page is
    /// already connected.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn show(&self) -> AppResult<()> {
        let Some(url) = &self.url else {
            warn!("Settings window not ready, bridge is not running");
            return Ok(());
        };

        if !self.should_open() {
            debug!(windows = self.connected.count(), "Settings window already open");
            return Ok(());
        }

        open::that(url).map_err(|e| AppError::WindowError {
            reason: format!("Failed to open {}: {}", url, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(url = %url, "Settings window shown");

        Ok(())
    }
}
