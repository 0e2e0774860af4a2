//! Notification sink
//!
//! Writes every pushed [`ModalityEvent`] as one JSON line, the stream the
//! presentation layer reads.

use anyhow::{Context, Result};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::events::ModalityEvent;

/// Forwards notifications to an async writer
pub struct NotificationSink<W> {
    writer: W,
    written: u64,
}

impl<W> NotificationSink<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of notifications written so far
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Write one notification and flush it
    pub async fn write(&mut self, event: &ModalityEvent) -> Result<()> {
        let mut line = serde_json::to_vec(event).context("failed to encode notification")?;
        line.push(b'\n');

        self.writer
            .write_all(&line)
            .await
            .context("failed to write notification")?;
        self.writer.flush().await.context("failed to flush notification")?;
        self.written += 1;
        Ok(())
    }

    /// Drain `event_rx` until every sender is gone
    pub async fn run(&mut self, mut event_rx: broadcast::Receiver<ModalityEvent>) -> Result<()> {
        loop {
            match event_rx.recv().await {
                Ok(event) => {
                    debug!(%event, "notification");
                    self.write(&event).await?;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "notification receiver lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    break;
                }
            }
        }

        info!(written = self.written, "notification sink closed");
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
