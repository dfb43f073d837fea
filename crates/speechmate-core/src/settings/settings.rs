use crate::{
    HotkeyAction, PartialSettings,
    settings::{
        DEFAULT_API_KEY, DEFAULT_BASE_URL, DEFAULT_HOTKEY_ASR, DEFAULT_HOTKEY_TRANSLATE_EN_ZH,
        DEFAULT_HOTKEY_TRANSLATE_ZH_EN,
    },
};

use serde::{Deserialize, Serialize};

/// Connection settings and hotkey bindings shared with the settings UI.
///
/// Every field has a default, so a file missing some keys still yields a
/// fully populated record. Unknown keys are ignored on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base address of the SpeechMate host service.
    pub base_url: String,
    /// Bearer credential for the host service. May be empty.
    pub api_key: String,
    /// Binding for speech recognition.
    pub hotkey_asr: String,
    /// Binding for Chinese to English translation.
    pub hotkey_translate_zh_en: String,
    /// Binding for English to Chinese translation.
    pub hotkey_translate_en_zh: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            hotkey_asr: DEFAULT_HOTKEY_ASR.to_string(),
            hotkey_translate_zh_en: DEFAULT_HOTKEY_TRANSLATE_ZH_EN.to_string(),
            hotkey_translate_en_zh: DEFAULT_HOTKEY_TRANSLATE_EN_ZH.to_string(),
        }
    }
}

impl Settings {
    /// Return a copy of `self` with every field present in `partial` replaced.
    pub fn merged(&self, partial: PartialSettings) -> Self {
        let PartialSettings {
            base_url,
            api_key,
            hotkey_asr,
            hotkey_translate_zh_en,
            hotkey_translate_en_zh,
        } = partial;

        Self {
            base_url: base_url.unwrap_or_else(|| self.base_url.clone()),
            api_key: api_key.unwrap_or_else(|| self.api_key.clone()),
            hotkey_asr: hotkey_asr.unwrap_or_else(|| self.hotkey_asr.clone()),
            hotkey_translate_zh_en: hotkey_translate_zh_en
                .unwrap_or_else(|| self.hotkey_translate_zh_en.clone()),
            hotkey_translate_en_zh: hotkey_translate_en_zh
                .unwrap_or_else(|| self.hotkey_translate_en_zh.clone()),
        }
    }

    /// Binding string configured for `action`.
    pub fn binding_for(&self, action: HotkeyAction) -> &str {
        match action {
            HotkeyAction::Asr => &self.hotkey_asr,
            HotkeyAction::TranslateZhEn => &self.hotkey_translate_zh_en,
            HotkeyAction::TranslateEnZh => &self.hotkey_translate_en_zh,
        }
    }
}
