//! Core classification state machine
//!
//! Integrates per-event classifier verdicts over time. Key evidence goes
//! through a confidence counter; pointer, focus and viewport evidence commit
//! directly. A blur schedules a deferred check that releases an assumed
//! on-screen keyboard once the quiet period passes without focus returning
//! to a text input.

use std::collections::BTreeSet;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;
use tracing::{debug, info, trace};

use crate::classifier::{
    classify_pointer_event, is_composing, key_evidence, Environment, PointerInput, SignalContext,
};
use crate::config::Thresholds;
use crate::events::ModalityEvent;
use crate::input::{CompositionPhase, InputEvent, KeyEvent, Timestamp};
use crate::lifecycle::DetachSignal;
use crate::modality::{CoarseModality, Modality};

use super::snapshot::Snapshot;

/// Mutable classification state for one input surface
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifierState {
    /// Internal modality; exposed only once `has_interacted` is set
    pub current_modality: Modality,
    pub last_confirmed_modality: Option<CoarseModality>,
    pub has_interacted: bool,
    /// Hysteresis counter of virtual-leaning key events
    pub consecutive_virtual_evidence: u32,
    pub last_event_timestamp: Option<Timestamp>,
    pub last_key_timestamp: Option<Timestamp>,
    /// Between composition start and end
    pub composition_active: bool,
    /// Distinct `source_fires_touch_events` values seen in the current window
    pub recent_event_source_kinds: BTreeSet<bool>,
    /// Focus currently rests on a text-input element
    pub focused_text_input: bool,
    /// The on-screen keyboard is believed to be open
    pub virtual_keyboard_assumed: bool,
    /// Modality in effect before the on-screen keyboard was assumed
    pub modality_before_virtual: Modality,
    /// Deadline of the deferred blur check
    pub pending_blur_check: Option<Timestamp>,
    last_event: Option<InputEvent>,
}

/// The state machine that owns one surface's classification
pub struct StateMachine {
    state: ClassifierState,
    environment: Environment,
    thresholds: Thresholds,
    detached: bool,
    /// Channel for pushing classification updates
    event_tx: broadcast::Sender<ModalityEvent>,
}

impl StateMachine {
    /// Create a new state machine
    pub fn new(
        environment: Environment,
        thresholds: Thresholds,
        event_tx: broadcast::Sender<ModalityEvent>,
    ) -> Self {
        Self {
            state: ClassifierState::default(),
            environment,
            thresholds,
            detached: false,
            event_tx,
        }
    }

    pub fn state(&self) -> &ClassifierState {
        &self.state
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Modality reported to consumers; `Unknown` before any interaction
    pub fn exposed_modality(&self) -> Modality {
        if self.state.has_interacted {
            self.state.current_modality
        } else {
            Modality::Unknown
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current_modality: self.exposed_modality(),
            last_confirmed_modality: self.state.last_confirmed_modality,
            has_interacted: self.state.has_interacted,
            device_class: self.environment.device_class,
        }
    }

    pub fn blur_check_pending(&self) -> bool {
        self.state.pending_blur_check.is_some()
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Run the state machine, processing events until delivery ends or the
    /// surface is detached
    pub async fn run(&mut self, mut event_rx: mpsc::Receiver<InputEvent>, mut detach: DetachSignal) {
        info!(
            device_class = %self.environment.device_class,
            touch_capable = self.environment.touch_capable,
            tablet_mode = self.environment.tablet_mode(),
            "state machine started"
        );

        let mut timer: Option<(Timestamp, Instant)> = None;

        loop {
            let blur_timer = async move {
                match timer {
                    Some((_, deadline)) => tokio::time::sleep_until(deadline).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                maybe_event = event_rx.recv() => match maybe_event {
                    Some(event) => {
                        self.handle_event(event);
                    }
                    None => {
                        info!("event delivery ended");
                        break;
                    }
                },

                _ = blur_timer => {
                    timer = None;
                    self.fire_blur_check();
                }

                _ = detach.detached() => {
                    break;
                }
            }

            // Re-arm whenever the machine schedules a different blur check.
            timer = match (self.state.pending_blur_check, timer) {
                (None, _) => None,
                (Some(due), Some((armed, deadline))) if due == armed => Some((armed, deadline)),
                (Some(due), _) => Some((
                    due,
                    Instant::now() + Duration::from_millis(self.thresholds.blur_debounce_ms),
                )),
            };
        }

        self.detach();
    }

    /// Stop processing: cancel the pending blur check and ignore further
    /// events
    pub fn detach(&mut self) {
        if !self.detached {
            self.detached = true;
            self.state.pending_blur_check = None;
            info!(modality = %self.exposed_modality(), "surface detached");
        }
    }

    /// Process one input event
    ///
    /// Returns the notification pushed for it, or `None` when the event was
    /// ignored or produced no transition.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<ModalityEvent> {
        if self.detached {
            trace!(kind = event.kind(), "event after detach ignored");
            return None;
        }

        let Some(meta) = event.meta().copied() else {
            debug!("unrecognized event ignored");
            return None;
        };

        if self.state.last_event.as_ref() == Some(&event) {
            debug!(kind = event.kind(), timestamp = meta.timestamp, "duplicate event ignored");
            return None;
        }

        // A check that came due before this event runs first.
        if self
            .state
            .pending_blur_check
            .map_or(false, |due| due <= meta.timestamp)
        {
            self.fire_blur_check();
        }

        let gap = self
            .state
            .last_event_timestamp
            .map(|last| meta.timestamp.saturating_sub(last));
        if gap.map_or(false, |g| g > self.thresholds.source_window_ms) {
            self.state.recent_event_source_kinds.clear();
        }
        if matches!(event, InputEvent::Key(_) | InputEvent::Pointer(_) | InputEvent::Touch(_)) {
            if let Some(kind) = meta.source_fires_touch_events {
                self.state.recent_event_source_kinds.insert(kind);
            }
        }

        let verdict = match &event {
            InputEvent::Key(key) => Some(self.judge_key(key, gap)),
            InputEvent::Pointer(pointer) => {
                classify_pointer_event(PointerInput::Pointer(pointer), &self.environment)
            }
            InputEvent::Touch(touch) => {
                classify_pointer_event(PointerInput::Touch(touch), &self.environment)
            }
            InputEvent::Composition(composition) => {
                self.state.composition_active = composition.phase != CompositionPhase::End;
                None
            }
            InputEvent::Focus(focus) => {
                self.state.focused_text_input = focus.accepts_text;
                if focus.accepts_text && self.environment.tablet_mode() {
                    self.state.recent_event_source_kinds.clear();
                    self.state.consecutive_virtual_evidence = 0;
                    Some(Modality::VirtualKeyboard)
                } else {
                    None
                }
            }
            InputEvent::Blur(_) => {
                self.state.focused_text_input = false;
                let due = meta.timestamp.saturating_add(self.thresholds.blur_debounce_ms);
                self.state.pending_blur_check = Some(due);
                debug!(due, "blur check scheduled");
                None
            }
            InputEvent::ViewportGeometry(geometry) => geometry
                .indicates_keyboard()
                .then_some(Modality::VirtualKeyboard),
            InputEvent::Unrecognized => None,
        };

        self.state.last_event_timestamp = Some(meta.timestamp);
        if matches!(event, InputEvent::Key(_)) {
            self.state.last_key_timestamp = Some(meta.timestamp);
        }
        debug!(kind = event.kind(), ?verdict, "event classified");
        self.state.last_event = Some(event);

        verdict.map(|modality| self.commit(modality))
    }

    /// Run the deferred blur check
    ///
    /// A no-op unless a check is pending, focus has not returned to a text
    /// input, and an on-screen keyboard is assumed.
    pub fn fire_blur_check(&mut self) -> Option<ModalityEvent> {
        self.state.pending_blur_check.take()?;

        if self.state.focused_text_input {
            debug!("focus returned before blur check, keeping classification");
            return None;
        }
        if !self.state.virtual_keyboard_assumed {
            return None;
        }

        self.state.virtual_keyboard_assumed = false;
        self.state.consecutive_virtual_evidence = 0;
        if self.state.current_modality == Modality::VirtualKeyboard {
            let restored = match self.state.modality_before_virtual {
                Modality::Unknown | Modality::VirtualKeyboard => {
                    if self.environment.touch_capable {
                        Modality::Touchscreen
                    } else {
                        Modality::PhysicalKeyboard
                    }
                }
                other => other,
            };
            self.state.current_modality = restored;
            self.state.last_confirmed_modality = restored.coarse();
        }

        let event = ModalityEvent::VirtualKeyboardReleased {
            snapshot: self.snapshot(),
        };
        info!(to = %self.exposed_modality(), "virtual keyboard released after blur");
        let _ = self.event_tx.send(event);
        Some(event)
    }

    /// Apply the keyboard rules and return the committed modality
    fn judge_key(&mut self, key: &KeyEvent, gap: Option<u64>) -> Modality {
        let ctx = SignalContext {
            composition_active: self.state.composition_active,
            recent_source_kinds: &self.state.recent_event_source_kinds,
            environment: &self.environment,
            gap_since_last_ms: gap,
            thresholds: &self.thresholds,
        };

        let evidence = key_evidence(key, &ctx);
        if evidence.physical {
            self.state.consecutive_virtual_evidence = 0;
            return Modality::PhysicalKeyboard;
        }

        let handheld = self.environment.device_class.is_handheld();
        let tablet_mode = self.environment.tablet_mode();
        let ime_in_composition = is_composing(key, &ctx) && key.is_ime_placeholder();

        // Rapid ambiguous keys on a touch device look like suggestion or
        // autocorrect insertion.
        let fast_burst = self.environment.touch_capable
            && self
                .state
                .last_key_timestamp
                .map_or(false, |last| {
                    key.meta.timestamp.saturating_sub(last) < self.thresholds.fast_typing_gap_ms
                });

        let threshold = self.thresholds.virtual_evidence_threshold;
        if evidence.score > 0 || fast_burst {
            // Never above the threshold
            self.state.consecutive_virtual_evidence =
                self.state.consecutive_virtual_evidence.saturating_add(1).min(threshold);
        } else {
            self.state.consecutive_virtual_evidence =
                self.state.consecutive_virtual_evidence.saturating_sub(1);
        }
        let threshold_met = self.state.consecutive_virtual_evidence >= threshold;

        trace!(
            score = evidence.score,
            virtual_signal = evidence.virtual_signal,
            counter = self.state.consecutive_virtual_evidence,
            "key evidence"
        );

        // Desktop keys only commit to the on-screen keyboard through the
        // counter; handheld devices trust a single virtual signal.
        if (evidence.virtual_signal && handheld) || threshold_met || tablet_mode || ime_in_composition {
            Modality::VirtualKeyboard
        } else {
            Modality::PhysicalKeyboard
        }
    }

    /// Commit a verdict and push the resulting snapshot
    fn commit(&mut self, modality: Modality) -> ModalityEvent {
        let previous = self.exposed_modality();

        if modality == Modality::VirtualKeyboard {
            if self.state.current_modality != Modality::VirtualKeyboard {
                self.state.modality_before_virtual = self.state.current_modality;
            }
            self.state.virtual_keyboard_assumed = true;
        } else {
            self.state.virtual_keyboard_assumed = false;
        }

        self.state.current_modality = modality;
        self.state.has_interacted = true;
        self.state.last_confirmed_modality = modality.coarse();

        let snapshot = self.snapshot();
        let event = if previous != modality {
            info!(from = %previous, to = %modality, "modality transition");
            ModalityEvent::Changed { previous, snapshot }
        } else {
            debug!(modality = %modality, "modality confirmed");
            ModalityEvent::Confirmed { snapshot }
        };

        let _ = self.event_tx.send(event);
        event
    }
}
