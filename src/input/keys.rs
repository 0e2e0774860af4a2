//! Key names, key codes and modifier state tracking
//!
//! Provides the key constants the classifier inspects and a struct for the
//! modifier keys active when a key event fired.

use serde::{Deserialize, Serialize};

/// Key code reported for every key while an input method editor owns the
/// keystroke (and by most virtual keyboards)
pub const IME_PLACEHOLDER_KEY_CODE: u32 = 229;

/// Keys that on-screen keyboards rarely dispatch as standalone key events
pub const HARDWARE_KEYS: [&str; 8] = [
    "Tab",
    "CapsLock",
    "Shift",
    "Control",
    "Alt",
    "Meta",
    "Enter",
    "Backspace",
];

/// Check whether a key name is one of [`HARDWARE_KEYS`]
pub fn is_hardware_key(key: &str) -> bool {
    HARDWARE_KEYS.contains(&key)
}

/// Tracks which modifier keys were held when a key event fired
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierState {
    /// Control key is held
    pub control: bool,
    /// Alt/Option key is held
    pub alt: bool,
    /// Meta/Command/Windows key is held
    pub meta: bool,
    /// Shift key is held
    pub shift: bool,
}

impl ModifierState {
    /// Check if all modifiers are released
    pub fn is_empty(&self) -> bool {
        !self.control && !self.alt && !self.meta && !self.shift
    }

    /// Check if any modifier is held
    pub fn any(&self) -> bool {
        !self.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state() {
        let state = ModifierState::default();
        assert!(state.is_empty());
        assert!(!state.any());
    }

    #[test]
    fn test_any_modifier() {
        let state = ModifierState {
            shift: true,
            ..Default::default()
        };
        assert!(state.any());
    }

    #[test]
    fn test_partial_modifiers_deserialize() {
        let state: ModifierState = serde_json::from_str(r#"{"control":true}"#).unwrap();
        assert!(state.control);
        assert!(!state.alt && !state.meta && !state.shift);
    }

    #[test]
    fn test_hardware_keys() {
        assert!(is_hardware_key("Tab"));
        assert!(is_hardware_key("Backspace"));
        assert!(!is_hardware_key("a"));
        assert!(!is_hardware_key("Escape"));
    }
}
