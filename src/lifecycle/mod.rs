//! Lifecycle: process signals and surface detachment

mod detach;
mod shutdown;

pub use detach::{detach_pair, DetachHandle, DetachSignal};
pub use shutdown::ShutdownSignal;
