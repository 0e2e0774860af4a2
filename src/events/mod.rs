//! Events module for classification notifications
//!
//! Every processed event pushes one [`ModalityEvent`] carrying the fresh
//! snapshot. Ignored events push nothing.

use serde::{Deserialize, Serialize};

use crate::modality::Modality;
use crate::state::Snapshot;

/// Notifications emitted by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModalityEvent {
    /// The exposed modality changed
    Changed {
        previous: Modality,
        snapshot: Snapshot,
    },

    /// An event was processed and the exposed modality held
    Confirmed { snapshot: Snapshot },

    /// The blur debounce fired with no text input focused; the on-screen
    /// keyboard is no longer assumed
    VirtualKeyboardReleased { snapshot: Snapshot },
}

impl ModalityEvent {
    pub fn snapshot(&self) -> &Snapshot {
        match self {
            ModalityEvent::Changed { snapshot, .. }
            | ModalityEvent::Confirmed { snapshot }
            | ModalityEvent::VirtualKeyboardReleased { snapshot } => snapshot,
        }
    }
}

impl std::fmt::Display for ModalityEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModalityEvent::Changed { previous, snapshot } => {
                write!(f, "MODALITY_CHANGED ({} -> {})", previous, snapshot.current_modality)
            }
            ModalityEvent::Confirmed { snapshot } => {
                write!(f, "MODALITY_CONFIRMED ({})", snapshot.current_modality)
            }
            ModalityEvent::VirtualKeyboardReleased { snapshot } => {
                write!(f, "VIRTUAL_KEYBOARD_RELEASED ({})", snapshot.current_modality)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modality::{CoarseModality, DeviceClass};

    fn snapshot(modality: Modality) -> Snapshot {
        Snapshot {
            current_modality: modality,
            last_confirmed_modality: modality.coarse(),
            has_interacted: true,
            device_class: DeviceClass::Desktop,
        }
    }

    #[test]
    fn test_event_serialization() {
        let event = ModalityEvent::Changed {
            previous: Modality::Unknown,
            snapshot: snapshot(Modality::Mouse),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"changed\""));
        assert!(json.contains("\"previous\":\"unknown\""));
        assert!(json.contains("\"current_modality\":\"mouse\""));
    }

    #[test]
    fn test_event_deserialization() {
        let json = r#"{"type":"confirmed","snapshot":{"current_modality":"stylus","last_confirmed_modality":"touchscreen","has_interacted":true,"device_class":"tablet"}}"#;
        let event: ModalityEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.snapshot().current_modality, Modality::Stylus);
        assert_eq!(
            event.snapshot().last_confirmed_modality,
            Some(CoarseModality::Touchscreen)
        );
    }

    #[test]
    fn test_display() {
        let event = ModalityEvent::Changed {
            previous: Modality::PhysicalKeyboard,
            snapshot: snapshot(Modality::Stylus),
        };
        assert_eq!(event.to_string(), "MODALITY_CHANGED (Physical Keyboard -> Stylus)");
    }
}
