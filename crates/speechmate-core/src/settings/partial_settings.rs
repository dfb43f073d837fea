use serde::{Deserialize, Serialize};

/// A settings update where absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialSettings {
    /// New base address, if changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// New API credential, if changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// New speech recognition binding, if changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotkey_asr: Option<String>,
    /// New Chinese to English binding, if changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotkey_translate_zh_en: Option<String>,
    /// New English to Chinese binding, if changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotkey_translate_en_zh: Option<String>,
}
