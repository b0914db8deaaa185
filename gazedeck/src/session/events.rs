//! Structured event records emitted to the session sink.
//!
//! Field names are the persisted format and must stay stable.

use serde::Serialize;

use crate::gaze::jitter::JitterStats;
use crate::gaze::selector::DwellEvent;
use crate::gaze::{GazePoint, TargetId};

/// A confirmed dwell selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DwellRecord {
    /// Milliseconds since UNIX epoch.
    pub timestamp: i64,
    pub action: TargetId,
    pub gaze_point: Option<GazePoint>,
    pub radius: Option<f64>,
    pub theta: Option<f64>,
    #[serde(flatten)]
    pub jitter: JitterStats,
}

impl DwellRecord {
    pub fn from_event(event: &DwellEvent, timestamp: i64) -> Self {
        Self {
            timestamp,
            action: event.target,
            gaze_point: event.gaze_point,
            radius: event.radius,
            theta: event.theta,
            jitter: event.jitter,
        }
    }
}

/// A card chosen through the `upper_right` target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardRecord {
    /// Milliseconds since UNIX epoch.
    pub timestamp: i64,
    pub label: String,
    pub horizontal_ratio: Option<f64>,
    pub vertical_ratio: Option<f64>,
    /// Dwell seconds that confirmed the selection.
    pub dwell_time: f64,
}

/// Any record written to the session log.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    DwellTriggered(DwellRecord),
    CardSelected(CardRecord),
}

impl SessionEvent {
    pub fn timestamp(&self) -> i64 {
        match self {
            Self::DwellTriggered(r) => r.timestamp,
            Self::CardSelected(r) => r.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dwell_record_shape() {
        let event = SessionEvent::DwellTriggered(DwellRecord {
            timestamp: 1_700_000_000_000,
            action: TargetId::UpperLeft,
            gaze_point: Some(GazePoint { x: 0.3, y: 0.2 }),
            radius: Some(0.25),
            theta: Some(230.0),
            jitter: JitterStats::default(),
        });
        let v = serde_json::to_value(&event).unwrap();
        assert_eq!(v["type"], "dwell_triggered");
        assert_eq!(v["action"], "upper_left");
        assert_eq!(v["gaze_point"]["x"], 0.3);
        assert_eq!(v["theta"], 230.0);
        // Jitter stats sit at the top level of the record
        assert_eq!(v["samples_radius"], 0);
        assert!(v.get("jitter").is_none());
        assert_eq!(event.timestamp(), 1_700_000_000_000);
    }

    #[test]
    fn test_card_record_shape() {
        let event = SessionEvent::CardSelected(CardRecord {
            timestamp: 5,
            label: "Hungry".to_string(),
            horizontal_ratio: None,
            vertical_ratio: Some(0.4),
            dwell_time: 1.25,
        });
        let v = serde_json::to_value(&event).unwrap();
        assert_eq!(v["type"], "card_selected");
        assert_eq!(v["label"], "Hungry");
        assert!(v["horizontal_ratio"].is_null());
        assert_eq!(v["dwell_time"], 1.25);
    }
}
