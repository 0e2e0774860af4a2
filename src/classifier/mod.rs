//! Event classifier
//!
//! Stateless judgment functions over one event plus a read-only context:
//! - keyboard signals (hardware vs. on-screen keyboard evidence)
//! - pointer and touch mapping
//! - device class and tablet-mode posture probes

mod device;
mod pointer;
mod signals;

pub use device::{
    detect_device_class, is_tablet_mode_posture, Environment, EnvironmentProbe, PlatformHints,
    StaticProbe,
};
pub use pointer::{classify_pointer_event, PointerInput};
pub use signals::{
    is_composing, is_physical_keyboard_signal, is_virtual_keyboard_signal, key_evidence,
    required_virtual_score, virtual_evidence_score, KeyEvidence, SignalContext,
};
