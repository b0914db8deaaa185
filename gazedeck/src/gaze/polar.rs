//! Polar mapping of gaze points and angular target sectors.
//!
//! Screen y grows downward, so looking up-left lands between 180° and
//! 270° and up-right between 270° and 360°.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::{GazePoint, TargetId};

/// Sector selecting `upper_left`, in degrees, half-open.
pub const UPPER_LEFT_SECTOR: Range<f64> = 210.0..250.0;
/// Sector selecting `upper_right`, in degrees, half-open.
pub const UPPER_RIGHT_SECTOR: Range<f64> = 275.0..320.0;

/// Offset of a gaze point from the configured center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarOffset {
    pub radius: f64,
    /// Angle in degrees, [0, 360).
    pub theta_deg: f64,
}

impl PolarOffset {
    pub fn from_point(point: GazePoint, center: (f64, f64)) -> Self {
        let dx = point.x - center.0;
        let dy = point.y - center.1;
        let theta_deg = (dy.atan2(dx).to_degrees() + 360.0) % 360.0;
        Self {
            radius: dx.hypot(dy),
            theta_deg,
        }
    }
}

/// Map an angle to the target whose sector contains it.
pub fn sector_target(theta_deg: f64) -> Option<TargetId> {
    if UPPER_LEFT_SECTOR.contains(&theta_deg) {
        Some(TargetId::UpperLeft)
    } else if UPPER_RIGHT_SECTOR.contains(&theta_deg) {
        Some(TargetId::UpperRight)
    } else {
        None
    }
}
