//! JSON persistence for [`Settings`].
//!
//! Reads tolerate a missing file (defaults) and a field of the wrong type
//! (that field alone takes its default). Callers may choose to degrade an
//! unparseable file to defaults via
//! [`SettingsStore::load_or_default`]. Writes
//! go through a temp file and rename so a crash never leaves a truncated file.

use crate::{CoreError, CoreResult, PartialSettings, Settings, settings::SETTINGS_FILE_NAME};

use std::{
    fs,
    io::{ErrorKind, Write},
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use serde::{Deserialize, de::IgnoredAny};
use tracing::{debug, info, instrument, warn};

/// One stored field: text, or something else that is dropped on load.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredField {
    Text(String),
    Invalid(#[allow(dead_code)] IgnoredAny),
}

/// Settings file as found on disk. `null` reads as absent.
#[derive(Default, Deserialize)]
#[serde(default)]
struct StoredSettings {
    base_url: Option<StoredField>,
    api_key: Option<StoredField>,
    hotkey_asr: Option<StoredField>,
    hotkey_translate_zh_en: Option<StoredField>,
    hotkey_translate_en_zh: Option<StoredField>,
}

impl StoredSettings {
    fn into_partial(self) -> PartialSettings {
        PartialSettings {
            base_url: text("base_url", self.base_url),
            api_key: text("api_key", self.api_key),
            hotkey_asr: text("hotkey_asr", self.hotkey_asr),
            hotkey_translate_zh_en: text("hotkey_translate_zh_en", self.hotkey_translate_zh_en),
            hotkey_translate_en_zh: text("hotkey_translate_en_zh", self.hotkey_translate_en_zh),
        }
    }
}

fn text(field: &str, stored: Option<StoredField>) -> Option<String> {
    match stored? {
        StoredField::Text(value) => Some(value),
        StoredField::Invalid(_) => {
            warn!(field, "Settings field is not a string, using its default");
            None
        }
    }
}

/// Location of the settings file plus load/save operations on it.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store backed by an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by `config.json` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(SETTINGS_FILE_NAME))
    }

    /// Path of the settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings from disk.
    ///
    /// A missing file yields defaults. Fields absent from the file, `null` or
    /// not a string take their defaults; unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SettingsLoad`] if the file exists but cannot be
    /// read or is not a settings record.
    #[track_caller]
    #[instrument(skip(self), fields(path = ?self.path))]
    pub fn load(&self) -> CoreResult<Settings> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No settings file found, using defaults");
                return Ok(Settings::default());
            }
            Err(e) => {
                return Err(CoreError::SettingsLoad {
                    path: self.path.clone(),
                    reason: format!("Failed to read settings: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        let stored: StoredSettings =
            serde_json::from_str(&contents).map_err(|e| CoreError::SettingsLoad {
                path: self.path.clone(),
                reason: format!("Failed to parse settings: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        let settings = Settings::default().merged(stored.into_partial());

        info!("Settings loaded");

        Ok(settings)
    }

    /// Load settings, degrading any failure to defaults.
    ///
    /// Startup must never fail on a bad settings file, so the error is
    /// logged and the defaults are returned instead.
    #[instrument(skip(self), fields(path = ?self.path))]
    pub fn load_or_default(&self) -> Settings {
        match self.load() {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "Settings unusable, falling back to defaults");
                Settings::default()
            }
        }
    }

    /// Persist `settings`, replacing the whole file.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SettingsWrite`] if the directory cannot be
    /// created or any step of the atomic write fails.
    #[track_caller]
    #[instrument(skip(self, settings), fields(path = ?self.path))]
    pub fn save(&self, settings: &Settings) -> CoreResult<()> {
        let write_err = |reason: String| CoreError::SettingsWrite {
            path: self.path.clone(),
            reason,
            location: ErrorLocation::from(Location::caller()),
        };

        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
            && !dir.exists()
        {
            fs::create_dir_all(dir)
                .map_err(|e| write_err(format!("Failed to create settings directory: {}", e)))?;
            debug!(dir = ?dir, "Created settings directory");
        }

        let contents = serde_json::to_string_pretty(settings)
            .map_err(|e| write_err(format!("Failed to serialize settings: {}", e)))?;

        let temp_path = self.path.with_extension("json.tmp");

        let mut temp_file = fs::File::create(&temp_path)
            .map_err(|e| write_err(format!("Failed to create temp settings file: {}", e)))?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| write_err(format!("Failed to write temp settings file: {}", e)))?;

        temp_file
            .sync_all()
            .map_err(|e| write_err(format!("Failed to sync temp settings file: {}", e)))?;

        fs::rename(&temp_path, &self.path)
            .map_err(|e| write_err(format!("Failed to rename temp settings to final: {}", e)))?;

        info!("Settings saved (atomic write)");

        Ok(())
    }
}
