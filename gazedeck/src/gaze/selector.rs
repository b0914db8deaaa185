//! Dwell-based gaze selection.
//!
//! Converts per-frame gaze samples into confirmed corner selections.
//! Each frame the gaze point is mapped to a polar offset from the
//! configured center, the angle picks a candidate target, and dwell time
//! accumulates while the candidate holds. Without an eligible candidate the
//! progress decays at 0.75x real time, so a single stray frame costs a
//! little progress instead of all of it. Reaching `trigger_time_s` emits a
//! `DwellEvent` carrying jitter statistics for the episode.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::jitter::JitterStats;
use super::polar::{sector_target, PolarOffset};
use super::{GazePoint, GazeSample, TargetId};

/// Decay rate of dwell progress relative to elapsed time.
pub const DECAY_RATE: f64 = 0.75;

// ── Config ──────────────────────────────────────────────────

/// Dwell selector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Seconds of sustained gaze needed to confirm a selection.
    pub trigger_time_s: f64,
    /// Screen-space center the polar offset is measured from.
    pub center: (f64, f64),
    /// Inner dead-zone radius. Carried for tuning; not applied on the
    /// trigger path.
    pub inner_radius: f64,
    /// Outer cutoff radius. Carried for tuning; not applied on the
    /// trigger path.
    pub outer_radius: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            trigger_time_s: 1.25,
            center: (0.5, 0.5),
            inner_radius: 0.0,
            outer_radius: 0.25,
        }
    }
}

// ── Targets ─────────────────────────────────────────────────

/// Display and eligibility state for one corner target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetSpec {
    pub id: TargetId,
    pub label: String,
    /// Corner position as fractions of the screen.
    pub corner: (f64, f64),
    pub allow_dwell: bool,
}

impl TargetSpec {
    fn new(id: TargetId, label: &str, allow_dwell: bool) -> Self {
        Self {
            id,
            label: label.to_string(),
            corner: id.corner(),
            allow_dwell,
        }
    }
}

/// Label and dwell eligibility for (`upper_left`, `upper_right`) given the
/// current mode.
pub fn target_modes(emergency_mode: bool, deck_active: bool) -> [(&'static str, bool); 2] {
    match (deck_active, emergency_mode) {
        (false, _) => [("Blink to Activate", false), ("Blink to Activate", false)],
        (true, true) => [("Deactivate", true), ("Emergency", false)],
        (true, false) => [("Deactivate", true), ("Select", true)],
    }
}

// ── Dwell state ─────────────────────────────────────────────

/// Progress of the current dwell episode.
///
/// `samples` is only non-empty while `current_target` is set and holds
/// offsets taken since that target became current. Decay never clears
/// the target: after progress decays to zero the episode stays open and
/// every located sample, off-sector ones included, keeps accumulating
/// until a trigger or a switch to another target. The next trigger's
/// jitter statistics cover all of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DwellState {
    pub current_target: Option<TargetId>,
    pub progress_s: f64,
    pub samples: Vec<PolarOffset>,
}

impl DwellState {
    fn reset(&mut self) {
        self.current_target = None;
        self.progress_s = 0.0;
        self.samples.clear();
    }
}

/// A confirmed dwell selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DwellEvent {
    pub target: TargetId,
    /// Frame timestamp of the triggering sample.
    pub timestamp_s: f64,
    /// Gaze point of the triggering frame, if the detector had a lock.
    pub gaze_point: Option<GazePoint>,
    pub radius: Option<f64>,
    pub theta: Option<f64>,
    pub jitter: JitterStats,
}

/// Read-only view of the selector for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectorSnapshot {
    pub current_target: Option<TargetId>,
    pub progress_s: f64,
    pub trigger_time_s: f64,
    /// `progress_s / trigger_time_s`, in [0, 1].
    pub progress_ratio: f64,
    pub targets: [TargetSpec; 2],
    /// Most recent located offset, for debug overlays.
    pub last_offset: Option<PolarOffset>,
}

// ── Selector ────────────────────────────────────────────────

/// The dwell selection state machine.
pub struct DwellSelector {
    config: SelectorConfig,
    targets: [TargetSpec; 2],
    state: DwellState,
    last_frame_s: Option<f64>,
    last_offset: Option<PolarOffset>,
}

impl DwellSelector {
    pub fn new(config: SelectorConfig) -> Self {
        Self {
            config,
            targets: [
                TargetSpec::new(TargetId::UpperLeft, "Deactivate", true),
                TargetSpec::new(TargetId::UpperRight, "Select", true),
            ],
            state: DwellState::default(),
            last_frame_s: None,
            last_offset: None,
        }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn state(&self) -> &DwellState {
        &self.state
    }

    pub fn target(&self, id: TargetId) -> &TargetSpec {
        &self.targets[id.index()]
    }

    /// Apply the mode table to both targets. Called every frame before
    /// `process`.
    pub fn update_target_modes(&mut self, emergency_mode: bool, deck_active: bool) {
        let modes = target_modes(emergency_mode, deck_active);
        for (spec, (label, allow)) in self.targets.iter_mut().zip(modes) {
            if spec.allow_dwell != allow || spec.label != label {
                debug!(
                    "target {}: label={:?} allow_dwell={}",
                    spec.id.as_str(),
                    label,
                    allow
                );
                spec.label = label.to_string();
                spec.allow_dwell = allow;
            }
        }
    }

    /// Feed one frame. Returns a selection once dwell on a target reaches
    /// the trigger time.
    ///
    /// With `dwell_enabled` false the frame only updates the frame clock;
    /// progress is frozen, neither advanced nor decayed.
    pub fn process(&mut self, sample: &GazeSample, dwell_enabled: bool) -> Option<DwellEvent> {
        let dt = match self.last_frame_s {
            Some(prev) => (sample.timestamp_s - prev).max(0.0),
            None => 0.0,
        };
        self.last_frame_s = Some(sample.timestamp_s);

        if !dwell_enabled {
            return None;
        }

        let offset = sample
            .point()
            .map(|p| PolarOffset::from_point(p, self.config.center));

        let candidate = match offset {
            Some(o) => {
                self.last_offset = Some(o);
                if self.state.current_target.is_some() {
                    self.state.samples.push(o);
                }
                sector_target(o.theta_deg)
            }
            None => None,
        };

        let eligible = candidate.filter(|id| self.target(*id).allow_dwell);
        match eligible {
            Some(id) if self.state.current_target == Some(id) => {
                self.state.progress_s += dt;
            }
            Some(id) => {
                debug!(
                    "dwell: {} -> {}",
                    self.state.current_target.map_or("none", |t| t.as_str()),
                    id.as_str()
                );
                self.state.current_target = Some(id);
                self.state.progress_s = 0.0;
                self.state.samples.clear();
            }
            None => {
                self.state.progress_s -= dt * DECAY_RATE;
            }
        }

        self.state.progress_s = self
            .state
            .progress_s
            .clamp(0.0, self.config.trigger_time_s.max(0.0));

        if self.state.progress_s < self.config.trigger_time_s {
            return None;
        }
        let target = self.state.current_target?;

        let jitter = JitterStats::from_samples(&self.state.samples);
        info!(
            "dwell triggered: {} ({} samples, radius jitter {:.3})",
            target.as_str(),
            jitter.samples_radius,
            jitter.jitter_radius
        );
        self.state.reset();

        Some(DwellEvent {
            target,
            timestamp_s: sample.timestamp_s,
            gaze_point: sample.point(),
            radius: offset.map(|o| o.radius),
            theta: offset.map(|o| o.theta_deg),
            jitter,
        })
    }

    /// Owned view for the render sink.
    pub fn snapshot(&self) -> SelectorSnapshot {
        let trigger = self.config.trigger_time_s;
        SelectorSnapshot {
            current_target: self.state.current_target,
            progress_s: self.state.progress_s,
            trigger_time_s: trigger,
            progress_ratio: if trigger > 0.0 {
                (self.state.progress_s / trigger).clamp(0.0, 1.0)
            } else {
                0.0
            },
            targets: self.targets.clone(),
            last_offset: self.last_offset,
        }
    }
}

// ── Tests ───────────────────────────────────────────────────
