//! Input event records delivered by the event source
//!
//! Every record carries [`EventMeta`]; the `kind` tag selects the variant.
//! Records with an unknown `kind` decode to [`InputEvent::Unrecognized`].

use serde::{Deserialize, Serialize};

use super::keys::{ModifierState, IME_PLACEHOLDER_KEY_CODE};

/// Milliseconds on a clock that is monotonic for one surface
pub type Timestamp = u64;

/// Attributes shared by every event kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMeta {
    pub timestamp: Timestamp,
    /// The platform reports the event as user-generated
    #[serde(default)]
    pub is_trusted: bool,
    /// Whether the originating pointer capability habitually fires touch
    /// events; `None` when the platform does not say
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_fires_touch_events: Option<bool>,
}

impl EventMeta {
    /// True only when the source positively reports touch events
    pub fn fires_touch_events(&self) -> bool {
        self.source_fires_touch_events == Some(true)
    }
}

/// One input event, tagged by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    Key(KeyEvent),
    Pointer(PointerEvent),
    Touch(TouchEvent),
    Composition(CompositionEvent),
    Focus(FocusEvent),
    Blur(BlurEvent),
    ViewportGeometry(ViewportGeometryEvent),
    /// Any kind this crate does not understand
    #[serde(other)]
    Unrecognized,
}

impl InputEvent {
    /// Shared attributes, absent for unrecognized events
    pub fn meta(&self) -> Option<&EventMeta> {
        match self {
            InputEvent::Key(e) => Some(&e.meta),
            InputEvent::Pointer(e) => Some(&e.meta),
            InputEvent::Touch(e) => Some(&e.meta),
            InputEvent::Composition(e) => Some(&e.meta),
            InputEvent::Focus(e) => Some(&e.meta),
            InputEvent::Blur(e) => Some(&e.meta),
            InputEvent::ViewportGeometry(e) => Some(&e.meta),
            InputEvent::Unrecognized => None,
        }
    }

    pub fn timestamp(&self) -> Option<Timestamp> {
        self.meta().map(|m| m.timestamp)
    }

    /// Short kind name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            InputEvent::Key(_) => "key",
            InputEvent::Pointer(_) => "pointer",
            InputEvent::Touch(_) => "touch",
            InputEvent::Composition(_) => "composition",
            InputEvent::Focus(_) => "focus",
            InputEvent::Blur(_) => "blur",
            InputEvent::ViewportGeometry(_) => "viewport_geometry",
            InputEvent::Unrecognized => "unrecognized",
        }
    }
}

/// A key press
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    #[serde(flatten)]
    pub meta: EventMeta,
    /// Key name, e.g. `"a"`, `"Enter"`, `"Unidentified"`
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub key_code: u32,
    #[serde(default)]
    pub modifiers: ModifierState,
    /// 0 = unspecified, >0 = a specific physical key cluster
    #[serde(default)]
    pub location: u32,
    #[serde(default)]
    pub is_composing: bool,
}

impl KeyEvent {
    pub fn is_ime_placeholder(&self) -> bool {
        self.key_code == IME_PLACEHOLDER_KEY_CODE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerType {
    Touch,
    Mouse,
    Pen,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchType {
    Direct,
    Stylus,
}

/// A pointer-down style event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerEvent {
    #[serde(flatten)]
    pub meta: EventMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer_type: Option<PointerType>,
}

/// A touch-start style event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchEvent {
    #[serde(flatten)]
    pub meta: EventMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer_type: Option<PointerType>,
    /// Type of the first changed touch point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub touch_type: Option<TouchType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionPhase {
    Start,
    Update,
    End,
}

/// IME composition session signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionEvent {
    #[serde(flatten)]
    pub meta: EventMeta,
    pub phase: CompositionPhase,
}

/// Focus moved onto an element of the surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusEvent {
    #[serde(flatten)]
    pub meta: EventMeta,
    /// The focused element accepts text input
    #[serde(default)]
    pub accepts_text: bool,
}

/// Focus left the surface's current element
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlurEvent {
    #[serde(flatten)]
    pub meta: EventMeta,
}

/// Visual vs. layout viewport geometry
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewportGeometryEvent {
    #[serde(flatten)]
    pub meta: EventMeta,
    pub visual_height: f64,
    pub layout_height: f64,
    /// Height of the on-screen keyboard's bounding rectangle, when the host
    /// exposes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard_inset_height: Option<f64>,
}

impl ViewportGeometryEvent {
    /// The visible viewport shrank, or an on-screen keyboard reports a
    /// non-empty rectangle
    pub fn indicates_keyboard(&self) -> bool {
        self.visual_height < self.layout_height
            || self.keyboard_inset_height.map_or(false, |h| h > 0.0)
    }
}
