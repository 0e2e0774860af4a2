//! Read-only classification snapshot handed to the presentation layer

use serde::{Deserialize, Serialize};

use crate::modality::{CoarseModality, DeviceClass, Modality};

/// What the presentation layer sees after each processed event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// `Unknown` until the user has interacted
    pub current_modality: Modality,
    pub last_confirmed_modality: Option<CoarseModality>,
    pub has_interacted: bool,
    pub device_class: DeviceClass,
}

impl Snapshot {
    pub fn is_physical_keyboard(&self) -> bool {
        self.current_modality == Modality::PhysicalKeyboard
    }

    pub fn is_virtual_keyboard(&self) -> bool {
        self.current_modality == Modality::VirtualKeyboard
    }

    pub fn is_stylus(&self) -> bool {
        self.current_modality == Modality::Stylus
    }
}

impl std::fmt::Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} on {}", self.current_modality, self.device_class)?;
        if let Some(coarse) = self.last_confirmed_modality {
            write!(f, " (last: {})", coarse)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers_and_display() {
        let snapshot = Snapshot {
            current_modality: Modality::Stylus,
            last_confirmed_modality: Some(CoarseModality::Touchscreen),
            has_interacted: true,
            device_class: DeviceClass::Tablet,
        };
        assert!(snapshot.is_stylus());
        assert!(!snapshot.is_physical_keyboard());
        assert!(!snapshot.is_virtual_keyboard());
        assert_eq!(snapshot.to_string(), "Stylus on Tablet (last: Touchscreen)");
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = Snapshot {
            current_modality: Modality::Unknown,
            last_confirmed_modality: None,
            has_interacted: false,
            device_class: DeviceClass::Desktop,
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"current_modality\":\"unknown\""));
        assert!(json.contains("\"last_confirmed_modality\":null"));
    }
}
