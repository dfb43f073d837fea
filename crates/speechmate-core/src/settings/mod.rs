mod partial_settings;
#[allow(clippy::module_inception)]
mod settings;
mod settings_store;

pub use {
    partial_settings::PartialSettings, settings::Settings, settings_store::SettingsStore,
};

pub(crate) const DEFAULT_BASE_URL: &str = "http://localhost:3456";
pub(crate) const DEFAULT_API_KEY: &str = "";
pub(crate) const DEFAULT_HOTKEY_ASR: &str = "alt";
pub(crate) const DEFAULT_HOTKEY_TRANSLATE_ZH_EN: &str = "shift";
pub(crate) const DEFAULT_HOTKEY_TRANSLATE_EN_ZH: &str = "shift+a";

/// File name of the persisted settings inside the settings directory.
pub const SETTINGS_FILE_NAME: &str = "config.json";
