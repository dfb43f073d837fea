//! Parsing of hotkey binding strings such as `alt`, `shift+a` or `ctrl+shift+space`.
//!
//! Parts are `+`-separated and case-insensitive. A binding made of a single
//! modifier binds the (left) modifier key itself.

use crate::{AppError, AppResult};

use std::panic::Location;

use error_location::ErrorLocation;
use global_hotkey::hotkey::{Code, HotKey, Modifiers};

const LETTERS: [Code; 26] = [
    Code::KeyA,
    Code::KeyB,
    Code::KeyC,
    Code::KeyD,
    Code::KeyE,
    Code::KeyF,
    Code::KeyG,
    Code::KeyH,
    Code::KeyI,
    Code::KeyJ,
    Code::KeyK,
    Code::KeyL,
    Code::KeyM,
    Code::KeyN,
    Code::KeyO,
    Code::KeyP,
    Code::KeyQ,
    Code::KeyR,
    Code::KeyS,
    Code::KeyT,
    Code::KeyU,
    Code::KeyV,
    Code::KeyW,
    Code::KeyX,
    Code::KeyY,
    Code::KeyZ,
];

const DIGITS: [Code; 10] = [
    Code::Digit0,
    Code::Digit1,
    Code::Digit2,
    Code::Digit3,
    Code::Digit4,
    Code::Digit5,
    Code::Digit6,
    Code::Digit7,
    Code::Digit8,
    Code::Digit9,
];

const FUNCTION_KEYS: [Code; 12] = [
    Code::F1,
    Code::F2,
    Code::F3,
    Code::F4,
    Code::F5,
    Code::F6,
    Code::F7,
    Code::F8,
    Code::F9,
    Code::F10,
    Code::F11,
    Code::F12,
];

/// Parse a binding string into a registrable [`HotKey`].
#[track_caller]
pub fn parse_binding(binding: &str) -> AppResult<HotKey> {
    let invalid = |reason: String| AppError::InvalidHotkeyBinding {
        binding: binding.to_string(),
        reason,
        location: ErrorLocation::from(Location::caller()),
    };

    let normalized: String = binding
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    if normalized.is_empty() {
        return Err(invalid("binding is empty".to_string()));
    }

    let mut modifiers = Modifiers::empty();
    let mut modifier_count = 0;
    let mut key: Option<Code> = None;

    for part in normalized.split('+') {
        if part.is_empty() {
            return Err(invalid("empty key between '+'".to_string()));
        }

        if let Some(modifier) = modifier(part) {
            modifiers |= modifier;
            modifier_count += 1;
            continue;
        }

        let code = key_code(part).ok_or_else(|| invalid(format!("unknown key {:?}", part)))?;
        if key.replace(code).is_some() {
            return Err(invalid("more than one non-modifier key".to_string()));
        }
    }

    match key {
        Some(code) => {
            let mods = (!modifiers.is_empty()).then_some(modifiers);
            Ok(HotKey::new(mods, code))
        }
        None if modifier_count == 1 => {
            let code = bare_modifier_code(modifiers)
                .ok_or_else(|| invalid("unsupported bare modifier".to_string()))?;
            Ok(HotKey::new(None, code))
        }
        None => Err(invalid("modifiers without a key".to_string())),
    }
}

fn modifier(part: &str) -> Option<Modifiers> {
    match part {
        "alt" | "option" => Some(Modifiers::ALT),
        "shift" => Some(Modifiers::SHIFT),
        "ctrl" | "control" => Some(Modifiers::CONTROL),
        "cmd" | "command" | "super" | "meta" | "win" => Some(Modifiers::SUPER),
        _ => None,
    }
}

fn key_code(part: &str) -> Option<Code> {
    let mut chars = part.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_lowercase() {
            return LETTERS.get(usize::from(c as u8 - b'a')).copied();
        }
        if c.is_ascii_digit() {
            return DIGITS.get(usize::from(c as u8 - b'0')).copied();
        }
        return None;
    }

    match part {
        "space" => Some(Code::Space),
        "enter" | "return" => Some(Code::Enter),
        "tab" => Some(Code::Tab),
        "esc" | "escape" => Some(Code::Escape),
        _ => part
            .strip_prefix('f')
            .and_then(|n| n.parse::<usize>().ok())
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| FUNCTION_KEYS.get(i).copied()),
    }
}

fn bare_modifier_code(modifiers: Modifiers) -> Option<Code> {
    if modifiers == Modifiers::ALT {
        Some(Code::AltLeft)
    } else if modifiers == Modifiers::SHIFT {
        Some(Code::ShiftLeft)
    } else if modifiers == Modifiers::CONTROL {
        Some(Code::ControlLeft)
    } else if modifiers == Modifiers::SUPER {
        Some(Code::MetaLeft)
    } else {
        None
    }
}
