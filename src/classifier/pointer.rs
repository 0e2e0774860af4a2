//! Pointer and touch classification
//!
//! Pointer evidence is single-shot: one event decides the modality without
//! hysteresis.

use crate::input::{PointerEvent, PointerType, TouchEvent, TouchType};
use crate::modality::Modality;

use super::device::Environment;

/// A pointer-down or touch-start event
#[derive(Debug, Clone, Copy)]
pub enum PointerInput<'a> {
    Pointer(&'a PointerEvent),
    Touch(&'a TouchEvent),
}

/// Map a pointer or touch event to a modality
///
/// Returns `None` for a pointer event whose type is absent or unrecognized.
/// A touch event always classifies: without type information it is treated
/// as a finger.
pub fn classify_pointer_event(event: PointerInput<'_>, environment: &Environment) -> Option<Modality> {
    let touch_target = if environment.tablet_mode() {
        Modality::VirtualKeyboard
    } else {
        Modality::Touchscreen
    };

    let (pointer_type, touch_type) = match event {
        PointerInput::Pointer(p) => (p.pointer_type, None),
        PointerInput::Touch(t) => (t.pointer_type, t.touch_type),
    };

    match pointer_type {
        Some(PointerType::Mouse) => Some(Modality::Mouse),
        Some(PointerType::Pen) => Some(Modality::Stylus),
        _ if touch_type == Some(TouchType::Stylus) => Some(Modality::Stylus),
        Some(PointerType::Touch) => Some(touch_target),
        _ => match event {
            PointerInput::Touch(_) => Some(touch_target),
            PointerInput::Pointer(_) => None,
        },
    }
}
