//! Classification state machine
//!
//! Owns the per-surface [`ClassifierState`] and turns classifier verdicts
//! into a stable modality:
//! - key evidence passes through a hysteresis counter
//! - pointer, touch, focus and viewport evidence commit directly
//! - a blur schedules a debounced release of the on-screen keyboard

mod machine;
mod snapshot;

pub use machine::{ClassifierState, StateMachine};
pub use snapshot::Snapshot;
