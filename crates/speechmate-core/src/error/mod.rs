use error_location::ErrorLocation;
use thiserror::Error;

/// Shell core errors with source location tracking.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Settings file could not be read or parsed.
    #[error("Failed to load settings from {path:?}: {reason} {location}")]
    SettingsLoad {
        /// Path of the settings file.
        path: std::path::PathBuf,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Settings file could not be written.
    #[error("Failed to save settings to {path:?}: {reason} {location}")]
    SettingsWrite {
        /// Path of the settings file.
        path: std::path::PathBuf,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Writing to the OS clipboard failed.
    #[error("Clipboard write failed: {reason} {location}")]
    Clipboard {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The health-check HTTP client could not be built.
    #[error("Health check client error: {source} {location}")]
    HealthClient {
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The bridge server failed to bind or serve.
    #[error("Bridge server error: {source} {location}")]
    BridgeServer {
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
