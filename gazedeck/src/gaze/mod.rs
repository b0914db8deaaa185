//! Gaze-side processing: polar mapping, dwell selection, jitter statistics
//! and blink classification.

pub mod blink;
pub mod jitter;
pub mod polar;
pub mod selector;

use serde::{Deserialize, Serialize};

use crate::input_source::GazeProvider;

// ── Targets ─────────────────────────────────────────────────

/// Screen-corner selection targets. The set is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetId {
    UpperLeft,
    UpperRight,
}

impl TargetId {
    pub const ALL: [TargetId; 2] = [TargetId::UpperLeft, TargetId::UpperRight];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpperLeft => "upper_left",
            Self::UpperRight => "upper_right",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "upper_left" => Some(Self::UpperLeft),
            "upper_right" => Some(Self::UpperRight),
            _ => None,
        }
    }

    /// Screen corner as fractions of width/height.
    pub fn corner(&self) -> (f64, f64) {
        match self {
            Self::UpperLeft => (0.0, 0.0),
            Self::UpperRight => (1.0, 0.0),
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::UpperLeft => 0,
            Self::UpperRight => 1,
        }
    }
}

// ── Samples ─────────────────────────────────────────────────

/// A located gaze point in normalized screen ratios.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazePoint {
    pub x: f64,
    pub y: f64,
}

/// Detector output for one frame, stamped with the frame time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazeSample {
    pub horizontal: Option<f64>,
    pub vertical: Option<f64>,
    pub timestamp_s: f64,
}

impl GazeSample {
    pub fn new(horizontal: Option<f64>, vertical: Option<f64>, timestamp_s: f64) -> Self {
        Self {
            horizontal,
            vertical,
            timestamp_s,
        }
    }

    /// Sample at a located point.
    pub fn at(x: f64, y: f64, timestamp_s: f64) -> Self {
        Self::new(Some(x), Some(y), timestamp_s)
    }

    /// Sample with no detector lock.
    pub fn lost(timestamp_s: f64) -> Self {
        Self::new(None, None, timestamp_s)
    }

    /// Read the provider once for this frame.
    pub fn from_provider(provider: &dyn GazeProvider, timestamp_s: f64) -> Self {
        Self::new(
            provider.horizontal_ratio(),
            provider.vertical_ratio(),
            timestamp_s,
        )
    }

    /// The gaze point, if both coordinates are present and finite.
    pub fn point(&self) -> Option<GazePoint> {
        match (self.horizontal, self.vertical) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some(GazePoint { x, y }),
            _ => None,
        }
    }
}
