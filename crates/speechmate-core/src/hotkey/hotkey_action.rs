use std::fmt;

use serde::{Deserialize, Serialize};

/// Actions a global hotkey can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HotkeyAction {
    /// Speech recognition.
    Asr,
    /// Translate Chinese to English.
    TranslateZhEn,
    /// Translate English to Chinese.
    TranslateEnZh,
}

impl HotkeyAction {
    /// All actions, in display order.
    pub const ALL: [HotkeyAction; 3] = [
        HotkeyAction::Asr,
        HotkeyAction::TranslateZhEn,
        HotkeyAction::TranslateEnZh,
    ];

    /// Whether the shell registers an OS hotkey for this action.
    ///
    /// English to Chinese has a stored binding but no registered handler yet.
    pub fn is_registered(self) -> bool {
        !matches!(self, HotkeyAction::TranslateEnZh)
    }
}

impl fmt::Display for HotkeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HotkeyAction::Asr => "ASR",
            HotkeyAction::TranslateZhEn => "Translate ZH->EN",
            HotkeyAction::TranslateEnZh => "Translate EN->ZH",
        };
        f.write_str(label)
    }
}
