//! Session recording.
//!
//! Collects counters and timestamped event records over one session and
//! produces a report at teardown. Counters are mutated additively by the
//! controller; averages are computed once in `finish`.

use serde::Serialize;
use tracing::{debug, info};

use super::events::SessionEvent;
use crate::config::AppConfig;

/// Aggregate counters for one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub user_id: String,
    pub session_id: String,
    /// Milliseconds since UNIX epoch.
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub total_frames: u64,
    pub total_blinks: u64,
    pub triple_blinks: u64,
    pub card_flips: u64,
    pub cards_selected: Vec<String>,
    pub deck_activations: u64,
    pub deck_deactivations: u64,
    pub emergency_mode_entries: u64,
    pub emergency_mode_exits: u64,
    pub avg_gaze_radius: Option<f64>,
    pub avg_gaze_theta: Option<f64>,
    pub total_dwell_events: u64,
    pub total_dwell_time: f64,
}

impl SessionSummary {
    fn new(user_id: String, session_id: String, start_time: i64) -> Self {
        Self {
            user_id,
            session_id,
            start_time,
            end_time: None,
            total_frames: 0,
            total_blinks: 0,
            triple_blinks: 0,
            card_flips: 0,
            cards_selected: Vec::new(),
            deck_activations: 0,
            deck_deactivations: 0,
            emergency_mode_entries: 0,
            emergency_mode_exits: 0,
            avg_gaze_radius: None,
            avg_gaze_theta: None,
            total_dwell_events: 0,
            total_dwell_time: 0.0,
        }
    }
}

/// Everything persisted for a finished session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub config: Option<AppConfig>,
    pub summary: SessionSummary,
    pub events: Vec<SessionEvent>,
}

impl SessionReport {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Session sink the controller reports to.
pub struct SessionRecorder {
    /// Counters, mutated by the controller.
    pub summary: SessionSummary,
    events: Vec<SessionEvent>,
    radii: Vec<f64>,
    thetas: Vec<f64>,
}

impl SessionRecorder {
    pub fn new(
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        started_at_ms: i64,
    ) -> Self {
        let summary = SessionSummary::new(user_id.into(), session_id.into(), started_at_ms);
        info!(
            "session {} started for user {}",
            summary.session_id, summary.user_id
        );
        Self {
            summary,
            events: Vec::new(),
            radii: Vec::new(),
            thetas: Vec::new(),
        }
    }

    /// Append an event record and fold it into the running aggregates.
    pub fn record(&mut self, event: SessionEvent) {
        match &event {
            SessionEvent::DwellTriggered(r) => {
                if let Some(radius) = r.radius {
                    self.radii.push(radius);
                }
                if let Some(theta) = r.theta {
                    self.thetas.push(theta);
                }
            }
            SessionEvent::CardSelected(r) => {
                self.summary.total_dwell_time += r.dwell_time;
                self.summary.total_dwell_events += 1;
                self.summary.cards_selected.push(r.label.clone());
            }
        }
        debug!("recorded event #{}", self.events.len() + 1);
        self.events.push(event);
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Close the session: stamp the end time and compute averages.
    pub fn finish(mut self, ended_at_ms: i64, config: Option<AppConfig>) -> SessionReport {
        self.summary.end_time = Some(ended_at_ms);
        self.summary.avg_gaze_radius = mean(&self.radii);
        self.summary.avg_gaze_theta = mean(&self.thetas);
        info!(
            "session {} finished: {} frames, {} events",
            self.summary.session_id,
            self.summary.total_frames,
            self.events.len()
        );
        SessionReport {
            config,
            summary: self.summary,
            events: self.events,
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gaze::jitter::JitterStats;
    use crate::gaze::TargetId;
    use crate::session::events::{CardRecord, DwellRecord};

    fn dwell(ts: i64, radius: Option<f64>, theta: Option<f64>) -> SessionEvent {
        SessionEvent::DwellTriggered(DwellRecord {
            timestamp: ts,
            action: TargetId::UpperRight,
            gaze_point: None,
            radius,
            theta,
            jitter: JitterStats::default(),
        })
    }

    fn card(ts: i64, label: &str, dwell_time: f64) -> SessionEvent {
        SessionEvent::CardSelected(CardRecord {
            timestamp: ts,
            label: label.to_string(),
            horizontal_ratio: Some(0.7),
            vertical_ratio: Some(0.2),
            dwell_time,
        })
    }

    #[test]
    fn test_recorder_lifecycle() {
        let mut rec = SessionRecorder::new("alice", "20260101_120000", 1000);
        rec.summary.total_frames += 3;
        rec.record(dwell(1100, Some(0.2), Some(300.0)));
        rec.record(card(1100, "Yes", 1.25));
        assert_eq!(rec.events().len(), 2);

        let report = rec.finish(2000, None);
        assert_eq!(report.summary.start_time, 1000);
        assert_eq!(report.summary.end_time, Some(2000));
        assert_eq!(report.summary.total_frames, 3);
        assert_eq!(report.summary.cards_selected, vec!["Yes".to_string()]);
        assert_eq!(report.summary.total_dwell_events, 1);
        assert_eq!(report.summary.total_dwell_time, 1.25);
        assert_eq!(report.events.len(), 2);
    }

    #[test]
    fn test_averages_skip_missing_values() {
        let mut rec = SessionRecorder::new("u", "s", 0);
        rec.record(dwell(1, Some(0.1), Some(230.0)));
        rec.record(dwell(2, Some(0.3), Some(300.0)));
        rec.record(dwell(3, None, None));
        let report = rec.finish(10, None);
        assert!((report.summary.avg_gaze_radius.unwrap() - 0.2).abs() < 1e-12);
        assert!((report.summary.avg_gaze_theta.unwrap() - 265.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_session_has_no_averages() {
        let rec = SessionRecorder::new("u", "s", 0);
        let report = rec.finish(10, None);
        assert!(report.summary.avg_gaze_radius.is_none());
        assert!(report.summary.avg_gaze_theta.is_none());
        assert!(report.events.is_empty());
    }

    #[test]
    fn test_report_json() {
        let mut rec = SessionRecorder::new("bob", "s1", 0);
        rec.record(card(5, "No", 1.25));
        let report = rec.finish(10, Some(AppConfig::default()));
        let json = report.to_json_pretty().unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["summary"]["user_id"], "bob");
        assert_eq!(v["summary"]["cards_selected"][0], "No");
        assert_eq!(v["events"][0]["type"], "card_selected");
        assert_eq!(v["config"]["selector"]["trigger_time_s"], 1.25);
    }
}
