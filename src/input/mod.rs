//! Input module: event records and the source that delivers them
//!
//! The source decodes JSON lines from any async reader; the records are the
//! raw, ambiguous evidence the classifier judges.

mod event;
mod keys;
mod source;

pub use event::{
    BlurEvent, CompositionEvent, CompositionPhase, EventMeta, FocusEvent, InputEvent, KeyEvent,
    PointerEvent, PointerType, Timestamp, TouchEvent, TouchType, ViewportGeometryEvent,
};
pub use keys::{is_hardware_key, ModifierState, HARDWARE_KEYS, IME_PLACEHOLDER_KEY_CODE};
pub use source::{decode_line, EventSource, SourceError, SourceStats};
