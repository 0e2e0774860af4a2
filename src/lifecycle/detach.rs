//! Surface detachment
//!
//! A [`DetachHandle`] tells the state machine that its surface went away.
//! The machine stops taking events and cancels its pending blur check.

use tokio::sync::watch;
use tracing::debug;

/// Create a connected handle/signal pair
pub fn detach_pair() -> (DetachHandle, DetachSignal) {
    let (tx, rx) = watch::channel(false);
    (DetachHandle { tx }, DetachSignal { rx })
}

/// Requests detachment; cloneable so several lifecycle sources can share it
#[derive(Debug, Clone)]
pub struct DetachHandle {
    tx: watch::Sender<bool>,
}

impl DetachHandle {
    pub fn detach(&self) {
        debug!("detach requested");
        self.tx.send_replace(true);
    }
}

/// Observed by the state machine's run loop
#[derive(Debug)]
pub struct DetachSignal {
    rx: watch::Receiver<bool>,
}

impl DetachSignal {
    pub fn is_detached(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once detachment is requested
    ///
    /// Never resolves if every handle is dropped without detaching.
    pub async fn detached(&mut self) {
        if self.rx.wait_for(|detached| *detached).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_detach_resolves_signal() {
        let (handle, mut signal) = detach_pair();
        assert!(!signal.is_detached());

        handle.clone().detach();
        signal.detached().await;
        assert!(signal.is_detached());
    }

    #[tokio::test]
    async fn test_dropped_handle_never_resolves() {
        let (handle, mut signal) = detach_pair();
        drop(handle);

        let outcome = tokio::time::timeout(Duration::from_millis(20), signal.detached()).await;
        assert!(outcome.is_err());
    }
}
