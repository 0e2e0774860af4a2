//! modality-daemon: real-time input modality classification
//!
//! Decides which physical input hardware a user is driving a surface with:
//! - physical or on-screen keyboard
//! - touchscreen
//! - mouse
//! - stylus
//!
//! The [`classifier`] judges single events; the [`state`] machine integrates
//! those judgments with hysteresis and debounce and pushes a [`Snapshot`]
//! after each processed event.

pub mod classifier;
pub mod config;
pub mod events;
pub mod input;
pub mod lifecycle;
pub mod modality;
pub mod sink;
pub mod state;

pub use config::{Config, Thresholds};
pub use events::ModalityEvent;
pub use input::InputEvent;
pub use modality::{CoarseModality, DeviceClass, Modality};
pub use state::{ClassifierState, Snapshot, StateMachine};
