//! Process signals that end the session
//!
//! Handlers are installed up front so a registration failure surfaces before
//! the main loop starts. A received signal detaches the surface, which lets
//! the state machine drain and exit through its normal path.

use std::io;

use tokio::signal::unix::{signal, Signal, SignalKind};
use tracing::info;

use super::detach::DetachHandle;

/// Installed SIGTERM and SIGINT handlers
#[derive(Debug)]
pub struct ShutdownSignal {
    terminate: Signal,
    interrupt: Signal,
}

impl ShutdownSignal {
    /// Install the handlers; must run inside a tokio runtime
    pub fn register() -> io::Result<Self> {
        Ok(Self {
            terminate: signal(SignalKind::terminate())?,
            interrupt: signal(SignalKind::interrupt())?,
        })
    }

    /// Wait for the next signal and return its name
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.terminate.recv() => "SIGTERM",
            _ = self.interrupt.recv() => "SIGINT",
        }
    }

    /// Detach the surface on the first signal
    pub async fn detach_on_signal(mut self, handle: DetachHandle) {
        let name = self.recv().await;
        info!(signal = name, "shutdown signal received");
        handle.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::detach_pair;
    use std::time::Duration;

    #[tokio::test]
    async fn test_register_installs_handlers() {
        assert!(ShutdownSignal::register().is_ok());
    }

    #[tokio::test]
    async fn test_no_signal_leaves_surface_attached() {
        let shutdown = ShutdownSignal::register().unwrap();
        let (handle, signal) = detach_pair();

        let outcome = tokio::time::timeout(
            Duration::from_millis(20),
            shutdown.detach_on_signal(handle),
        )
        .await;
        assert!(outcome.is_err());
        assert!(!signal.is_detached());
    }
}
