//! Per-frame session orchestration.
//!
//! `SessionController` owns the selector, blink classifier, navigator and
//! session recorder. Each frame it reads the gaze provider once, stamps the
//! sample with the frame's single timestamp, and routes dwell selections
//! and blinks according to the current mode:
//!
//! - deck inactive: dwell is disabled; a triple blink activates the deck.
//! - deck active: single blinks advance cards, `upper_left` dwell
//!   deactivates, `upper_right` dwell selects the current card.
//! - emergency: `upper_right` is disabled; `upper_left` dwell leaves
//!   emergency mode and deactivates the deck.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clock::FrameTime;
use crate::config::AppConfig;
use crate::deck::navigator::DeckNavigator;
use crate::deck::Deck;
use crate::gaze::blink::{BlinkClassifier, BlinkKind};
use crate::gaze::selector::{DwellEvent, DwellSelector, SelectorSnapshot};
use crate::gaze::{GazeSample, TargetId};
use crate::input_source::GazeProvider;
use crate::session::{
    CardRecord, DwellRecord, SessionEvent, SessionRecorder, SessionReport, SessionSummary,
};

/// Label of the card whose selection enters emergency mode.
const EMERGENCY_LABEL: &str = "emergency";

/// What happened during one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub dwell_event: Option<DwellEvent>,
    pub blink: Option<BlinkKind>,
    /// Label of the card selected this frame.
    pub selected_card: Option<String>,
    /// Emergency flag after this frame.
    pub emergency: bool,
    pub snapshot: SelectorSnapshot,
}

/// Render-facing state after a frame.
#[derive(Debug, Clone, Serialize)]
pub struct ViewState {
    pub deck_active: bool,
    pub emergency: bool,
    pub current_card: String,
    pub breadcrumb: Vec<String>,
    pub selector: SelectorSnapshot,
}

pub struct SessionController {
    config: AppConfig,
    selector: DwellSelector,
    blinks: BlinkClassifier,
    navigator: DeckNavigator,
    recorder: SessionRecorder,
    emergency: bool,
}

impl SessionController {
    pub fn new(config: AppConfig, deck: &Deck, recorder: SessionRecorder) -> Self {
        let selector = DwellSelector::new(config.selector.clone());
        let blinks = BlinkClassifier::new(config.blink.clone());
        let navigator = DeckNavigator::new(deck, config.deck.navigator_config());
        Self {
            config,
            selector,
            blinks,
            navigator,
            recorder,
            emergency: false,
        }
    }

    pub fn is_emergency(&self) -> bool {
        self.emergency
    }

    pub fn navigator(&self) -> &DeckNavigator {
        &self.navigator
    }

    pub fn selector(&self) -> &DwellSelector {
        &self.selector
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.recorder.summary
    }

    pub fn events(&self) -> &[SessionEvent] {
        self.recorder.events()
    }

    pub fn view(&self) -> ViewState {
        ViewState {
            deck_active: self.navigator.is_active(),
            emergency: self.emergency,
            current_card: self.navigator.current_card().label().to_string(),
            breadcrumb: self
                .navigator
                .breadcrumb()
                .into_iter()
                .map(str::to_string)
                .collect(),
            selector: self.selector.snapshot(),
        }
    }

    /// Run one frame.
    pub fn step(&mut self, provider: &dyn GazeProvider, time: FrameTime) -> FrameOutcome {
        self.recorder.summary.total_frames += 1;

        let sample = GazeSample::from_provider(provider, time.now_s);
        let blinking = provider.is_blinking();

        self.selector
            .update_target_modes(self.emergency, self.navigator.is_active());
        let dwell_enabled = !blinking && self.navigator.dwell_input_enabled();
        let dwell_event = self.selector.process(&sample, dwell_enabled);

        let mut selected_card = None;
        if let Some(event) = &dwell_event {
            self.recorder.record(SessionEvent::DwellTriggered(DwellRecord::from_event(
                event,
                time.unix_ms,
            )));
            selected_card = self.on_dwell(event, &sample, time);
        }

        let blink = if blinking {
            self.on_blink(time.now_s)
        } else {
            None
        };

        FrameOutcome {
            dwell_event,
            blink,
            selected_card,
            emergency: self.emergency,
            snapshot: self.selector.snapshot(),
        }
    }

    fn on_dwell(
        &mut self,
        event: &DwellEvent,
        sample: &GazeSample,
        time: FrameTime,
    ) -> Option<String> {
        let summary = &mut self.recorder.summary;
        match (self.emergency, event.target) {
            (true, TargetId::UpperLeft) => {
                info!("leaving emergency mode");
                self.emergency = false;
                // Counted as an emergency exit only, not a deck deactivation
                summary.emergency_mode_exits += 1;
                self.navigator.deactivate();
                None
            }
            (true, TargetId::UpperRight) => {
                warn!("upper_right dwell in emergency mode ignored");
                None
            }
            (false, TargetId::UpperLeft) => {
                if self.navigator.is_active() {
                    self.navigator.deactivate();
                    summary.deck_deactivations += 1;
                } else {
                    self.navigator.activate();
                    summary.deck_activations += 1;
                }
                None
            }
            (false, TargetId::UpperRight) => {
                let card = self.navigator.select()?;
                let label = card.label().to_string();
                self.recorder.summary.card_flips += 1;
                self.recorder.record(SessionEvent::CardSelected(CardRecord {
                    timestamp: time.unix_ms,
                    label: label.clone(),
                    horizontal_ratio: sample.horizontal,
                    vertical_ratio: sample.vertical,
                    dwell_time: self.config.selector.trigger_time_s,
                }));
                if label.trim().eq_ignore_ascii_case(EMERGENCY_LABEL) {
                    info!("entering emergency mode");
                    self.emergency = true;
                    self.recorder.summary.emergency_mode_entries += 1;
                }
                Some(label)
            }
        }
    }

    fn on_blink(&mut self, now_s: f64) -> Option<BlinkKind> {
        let kind = self.blinks.register_blink(now_s)?;
        let summary = &mut self.recorder.summary;
        summary.total_blinks += 1;
        match kind {
            BlinkKind::Triple => {
                summary.triple_blinks += 1;
                if !self.navigator.is_active() {
                    summary.deck_activations += 1;
                }
                self.navigator.activate();
            }
            BlinkKind::Single => {
                if self.navigator.is_active() && self.navigator.on_blink(now_s).is_some() {
                    summary.card_flips += 1;
                }
            }
        }
        debug!("blink: {}", kind.as_str());
        Some(kind)
    }

    /// End the session and produce its report.
    pub fn finish(self, ended_at_ms: i64) -> SessionReport {
        self.recorder.finish(ended_at_ms, Some(self.config))
    }
}
