//! modality-daemon: input modality classifier for one input surface
//!
//! Reads newline-delimited JSON input events (stdin or `MODALITY_INPUT`),
//! classifies the modality in real time and writes one JSON notification
//! per processed event to stdout. Logs go to stderr.

use anyhow::{Context, Result};
use tokio::io::AsyncRead;
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use modality_daemon::classifier::Environment;
use modality_daemon::input::EventSource;
use modality_daemon::lifecycle::{detach_pair, ShutdownSignal};
use modality_daemon::sink::NotificationSink;
use modality_daemon::{Config, ModalityEvent, StateMachine};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout carries notifications
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "modality-daemon starting"
    );

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;
    info!(input = ?config.input_path, thresholds = ?config.thresholds, "configuration loaded");

    // Probe the environment once per session
    let environment = Environment::detect(&config.probe);
    info!(
        device_class = %environment.device_class,
        touch_capable = environment.touch_capable,
        tablet_mode = environment.tablet_mode(),
        "environment detected"
    );

    // Event source -> state machine
    let (input_tx, input_rx) = mpsc::channel(32);
    // State machine -> notification sink
    let (event_tx, event_rx) = broadcast::channel::<ModalityEvent>(64);

    let mut state_machine = StateMachine::new(environment, config.thresholds, event_tx);

    let mut sink = NotificationSink::new(tokio::io::stdout());
    let sink_task = tokio::spawn(async move {
        let result = sink.run(event_rx).await;
        if let Err(e) = &result {
            error!(?e, "notification sink failed");
        }
        result
    });

    let reader: Box<dyn AsyncRead + Unpin + Send> = match &config.input_path {
        Some(path) => Box::new(
            tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open input trace {}", path.display()))?,
        ),
        None => Box::new(tokio::io::stdin()),
    };

    let mut source = EventSource::new(input_tx);
    let source_task = source.start(reader)?;

    let (detach_handle, detach_signal) = detach_pair();
    let signal_task = match ShutdownSignal::register() {
        Ok(shutdown) => Some(tokio::spawn(shutdown.detach_on_signal(detach_handle))),
        Err(e) => {
            warn!(?e, "failed to register signal handlers, running until end of input");
            None
        }
    };

    info!("daemon initialized, entering main loop");
    state_machine.run(input_rx, detach_signal).await;

    // Cleanup
    info!("shutting down...");
    source.stop();
    if let Some(task) = signal_task {
        task.abort();
    }

    if source_task.is_finished() {
        match source_task.await {
            Ok(Ok(stats)) => info!(delivered = stats.delivered, skipped = stats.skipped, "input drained"),
            Ok(Err(e)) => warn!(?e, "event source ended with error"),
            Err(e) => warn!(?e, "event source task failed"),
        }
    } else {
        // Blocked on a read that will not complete before exit
        source_task.abort();
    }

    let final_snapshot = state_machine.snapshot();
    drop(state_machine);
    sink_task.await.context("notification sink task panicked")??;

    info!(snapshot = %final_snapshot, "modality-daemon stopped");

    Ok(())
}
