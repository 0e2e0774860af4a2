//! Modality and device-class vocabulary shared by the classifier and the
//! state machine.

use serde::{Deserialize, Serialize};

/// The physical input hardware believed to be in use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    /// No interaction observed yet
    Unknown,
    /// Hardware keyboard
    PhysicalKeyboard,
    /// On-screen keyboard
    VirtualKeyboard,
    /// Finger on a touchscreen
    Touchscreen,
    /// Mouse or trackpad
    Mouse,
    /// Pen or stylus
    Stylus,
}

impl Default for Modality {
    fn default() -> Self {
        Self::Unknown
    }
}

impl Modality {
    /// Coarse grouping used by consumers that only distinguish keyboard-like
    /// from touch-like input. `Unknown` has no bucket.
    pub fn coarse(self) -> Option<CoarseModality> {
        match self {
            Modality::Unknown => None,
            Modality::PhysicalKeyboard | Modality::VirtualKeyboard | Modality::Mouse => {
                Some(CoarseModality::Keyboard)
            }
            Modality::Touchscreen | Modality::Stylus => Some(CoarseModality::Touchscreen),
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Modality::Unknown => "Unknown",
            Modality::PhysicalKeyboard => "Physical Keyboard",
            Modality::VirtualKeyboard => "Virtual Keyboard",
            Modality::Touchscreen => "Touchscreen",
            Modality::Mouse => "Mouse",
            Modality::Stylus => "Stylus",
        }
    }
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Two-bucket grouping of [`Modality`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoarseModality {
    Keyboard,
    Touchscreen,
}

impl std::fmt::Display for CoarseModality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoarseModality::Keyboard => write!(f, "Keyboard"),
            CoarseModality::Touchscreen => write!(f, "Touchscreen"),
        }
    }
}

/// Form factor of the host, derived once per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Desktop,
    Mobile,
    Tablet,
    /// Not yet detected; classified with desktop policy
    Unknown,
}

impl Default for DeviceClass {
    fn default() -> Self {
        Self::Unknown
    }
}

impl DeviceClass {
    /// Mobile and tablet form factors, where virtual keyboards can synthesize
    /// most physical-looking key signals
    pub fn is_handheld(self) -> bool {
        matches!(self, DeviceClass::Mobile | DeviceClass::Tablet)
    }
}

impl std::fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceClass::Desktop => write!(f, "Desktop"),
            DeviceClass::Mobile => write!(f, "Mobile"),
            DeviceClass::Tablet => write!(f, "Tablet"),
            DeviceClass::Unknown => write!(f, "Unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coarse_buckets() {
        assert_eq!(Modality::Unknown.coarse(), None);
        assert_eq!(Modality::Mouse.coarse(), Some(CoarseModality::Keyboard));
        assert_eq!(Modality::VirtualKeyboard.coarse(), Some(CoarseModality::Keyboard));
        assert_eq!(Modality::Stylus.coarse(), Some(CoarseModality::Touchscreen));
        assert_eq!(Modality::Touchscreen.coarse(), Some(CoarseModality::Touchscreen));
    }

    #[test]
    fn test_modality_serialization() {
        let json = serde_json::to_string(&Modality::VirtualKeyboard).unwrap();
        assert_eq!(json, "\"virtual_keyboard\"");
        assert_eq!(Modality::PhysicalKeyboard.to_string(), "Physical Keyboard");
    }

    #[test]
    fn test_handheld_classes() {
        assert!(DeviceClass::Mobile.is_handheld());
        assert!(DeviceClass::Tablet.is_handheld());
        assert!(!DeviceClass::Desktop.is_handheld());
        assert!(!DeviceClass::Unknown.is_handheld());
    }
}
