//! Keyboard signal judgment
//!
//! Decides whether one key event is evidence of a hardware keyboard or of an
//! on-screen keyboard. Both functions are pure; the state machine applies
//! the verdicts.

use std::collections::BTreeSet;

use tracing::trace;

use crate::config::Thresholds;
use crate::input::{is_hardware_key, KeyEvent};

use super::device::Environment;

/// Read-only view of the state machine the classifier judges against
#[derive(Debug, Clone, Copy)]
pub struct SignalContext<'a> {
    /// An IME composition session is open
    pub composition_active: bool,
    /// Distinct `source_fires_touch_events` values seen recently, including
    /// the event being judged
    pub recent_source_kinds: &'a BTreeSet<bool>,
    pub environment: &'a Environment,
    /// Milliseconds since the previously processed event
    pub gap_since_last_ms: Option<u64>,
    pub thresholds: &'a Thresholds,
}

/// An IME session is open, either signalled by composition events or
/// reported on the key itself
pub fn is_composing(event: &KeyEvent, ctx: &SignalContext<'_>) -> bool {
    ctx.composition_active || event.is_composing
}

/// True when the key event carries hardware-keyboard evidence
///
/// The event must look user-generated and non-touch, outside any IME
/// session, and show at least one hardware trait. On mobile and tablet
/// devices only a held modifier counts, since their on-screen keyboards can
/// synthesize the other traits.
pub fn is_physical_keyboard_signal(event: &KeyEvent, ctx: &SignalContext<'_>) -> bool {
    if !event.meta.is_trusted
        || event.meta.fires_touch_events()
        || event.is_ime_placeholder()
        || is_composing(event, ctx)
    {
        return false;
    }

    if ctx.environment.device_class.is_handheld() {
        return event.modifiers.any();
    }

    event.modifiers.any() || is_hardware_key(&event.key) || event.location > 0
}

/// Count of on-screen keyboard indicators present on the event
///
/// Does not consult the physical signal; see [`is_virtual_keyboard_signal`].
pub fn virtual_evidence_score(event: &KeyEvent, ctx: &SignalContext<'_>) -> u32 {
    let burst = ctx.environment.touch_capable
        && ctx
            .gap_since_last_ms
            .map_or(false, |gap| gap < ctx.thresholds.touch_burst_gap_ms);

    let indicators = [
        event.is_ime_placeholder(),
        !event.meta.is_trusted,
        event.meta.fires_touch_events(),
        is_composing(event, ctx),
        burst,
        ctx.recent_source_kinds.len() > 1,
    ];

    indicators.iter().filter(|&&hit| hit).count() as u32
}

/// Score required for a virtual verdict on this device class
pub fn required_virtual_score(ctx: &SignalContext<'_>) -> u32 {
    if ctx.environment.device_class.is_handheld() {
        ctx.thresholds.handheld_virtual_score
    } else {
        ctx.thresholds.desktop_virtual_score
    }
}

/// Everything the keyboard rules need to know about one key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvidence {
    pub physical: bool,
    /// Zero when `physical` is set
    pub score: u32,
    /// Score reached the device class's requirement; never set alongside
    /// `physical`
    pub virtual_signal: bool,
}

/// Judge one key event; physical evidence on the event always wins
pub fn key_evidence(event: &KeyEvent, ctx: &SignalContext<'_>) -> KeyEvidence {
    if is_physical_keyboard_signal(event, ctx) {
        return KeyEvidence {
            physical: true,
            score: 0,
            virtual_signal: false,
        };
    }

    let score = virtual_evidence_score(event, ctx);
    let required = required_virtual_score(ctx);
    trace!(score, required, key = %event.key, "virtual keyboard score");
    KeyEvidence {
        physical: false,
        score,
        virtual_signal: score >= required,
    }
}

/// True when the key event carries enough on-screen keyboard evidence
///
/// Physical evidence on the same event always wins.
pub fn is_virtual_keyboard_signal(event: &KeyEvent, ctx: &SignalContext<'_>) -> bool {
    key_evidence(event, ctx).virtual_signal
}
