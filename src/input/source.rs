//! Event source decoding newline-delimited JSON input records
//!
//! Runs on its own task and forwards decoded events to the state machine.
//! Blank lines are skipped; lines that fail to decode are logged and dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::event::InputEvent;

/// Reads input records from an async reader and forwards them in arrival order
pub struct EventSource {
    event_tx: Option<mpsc::Sender<InputEvent>>,
    running: Arc<AtomicBool>,
}

/// Counters reported when the source finishes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceStats {
    pub delivered: u64,
    pub skipped: u64,
}

impl EventSource {
    /// Create a new event source feeding `event_tx`
    pub fn new(event_tx: mpsc::Sender<InputEvent>) -> Self {
        Self {
            event_tx: Some(event_tx),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start reading `reader` on a dedicated task
    ///
    /// The task ends at end of input, when [`stop`](Self::stop) is called, or
    /// when the receiving side of the channel is dropped. The sender moves
    /// into the task, so its exit tells the state machine that delivery has
    /// ended. A source starts at most once.
    pub fn start<R>(&mut self, reader: R) -> Result<JoinHandle<Result<SourceStats, SourceError>>, SourceError>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let event_tx = self.event_tx.take().ok_or(SourceError::AlreadyStarted)?;
        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);

        Ok(tokio::spawn(async move {
            info!("event source started");
            let result = read_events(reader, event_tx, Arc::clone(&running)).await;
            running.store(false, Ordering::SeqCst);
            match &result {
                Ok(stats) => info!(delivered = stats.delivered, skipped = stats.skipped, "event source stopped"),
                Err(e) => warn!(?e, "event source failed"),
            }
            result
        }))
    }

    /// Stop forwarding; the task exits before the next record
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the source is currently running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Errors that can occur in the event source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("event source was already started")]
    AlreadyStarted,

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("state machine stopped accepting events")]
    ChannelClosed,
}

/// Decode one line; `None` for blank or undecodable lines
pub fn decode_line(line: &str, line_no: u64) -> Option<InputEvent> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<InputEvent>(trimmed) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!(line_no, error = %e, "skipping undecodable input record");
            None
        }
    }
}

async fn read_events<R>(
    reader: R,
    event_tx: mpsc::Sender<InputEvent>,
    running: Arc<AtomicBool>,
) -> Result<SourceStats, SourceError>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut stats = SourceStats::default();
    let mut line_no = 0u64;

    while running.load(Ordering::SeqCst) {
        let Some(line) = lines.next_line().await? else {
            break;
        };
        line_no += 1;

        let Some(event) = decode_line(&line, line_no) else {
            if !line.trim().is_empty() {
                stats.skipped += 1;
            }
            continue;
        };

        debug!(line_no, kind = event.kind(), "input record decoded");
        event_tx
            .send(event)
            .await
            .map_err(|_| SourceError::ChannelClosed)?;
        stats.delivered += 1;
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_creation() {
        let (tx, _rx) = mpsc::channel(32);
        let source = EventSource::new(tx);
        assert!(!source.is_running());
    }

    #[test]
    fn test_decode_line_skips_blank_and_garbage() {
        assert!(decode_line("   ", 1).is_none());
        assert!(decode_line("{not json", 2).is_none());
        assert!(matches!(
            decode_line(r#"{"kind":"blur","timestamp":5}"#, 3),
            Some(InputEvent::Blur(_))
        ));
    }

    #[tokio::test]
    async fn test_forwards_records_in_order() {
        let reader = tokio_test::io::Builder::new()
            .read(b"{\"kind\":\"pointer\",\"timestamp\":1,\"pointer_type\":\"mouse\"}\n")
            .read(b"\n{\"kind\":\"key\",\"timestamp\":2,\"key\":\"a\",\"key_code\":65}\n")
            .read(b"garbage\n")
            .build();

        let (tx, mut rx) = mpsc::channel(8);
        let mut source = EventSource::new(tx);
        let handle = source.start(reader).unwrap();

        let stats = handle.await.unwrap().unwrap();
        assert_eq!(stats, SourceStats { delivered: 2, skipped: 1 });

        assert_eq!(rx.recv().await.and_then(|e| e.timestamp()), Some(1));
        assert!(matches!(rx.recv().await, Some(InputEvent::Key(_))));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_start_twice_fails() {
        let (tx, _rx) = mpsc::channel(8);
        let mut source = EventSource::new(tx);
        let handle = source.start(tokio::io::empty()).unwrap();
        // Current-thread runtime: the spawned task has not been polled yet.
        assert!(source.is_running());
        assert!(matches!(source.start(tokio::io::empty()), Err(SourceError::AlreadyStarted)));

        let stats = handle.await.unwrap().unwrap();
        assert_eq!(stats, SourceStats::default());
        assert!(!source.is_running());
    }
}
