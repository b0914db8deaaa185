//! Blink classification: turns debounced blink timestamps into single
//! and triple blink events.
//!
//! The detector reports a blinking level per frame; a sustained closure
//! produces many frames, which the refractory cooldown collapses into one
//! blink. Three accepted blinks inside the window form a triple.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Blink classifier configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    /// Minimum seconds between accepted blinks.
    pub cooldown_s: f64,
    /// Seconds of history considered for a triple blink.
    pub window_s: f64,
    /// Accepted blinks inside the window that make a triple.
    pub triple_count: usize,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            cooldown_s: 0.3,
            window_s: 2.5,
            triple_count: 3,
        }
    }
}

/// Classified blink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlinkKind {
    Single,
    Triple,
}

impl BlinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Triple => "triple",
        }
    }
}

/// Debounces blink signals and detects triple blinks.
#[derive(Debug)]
pub struct BlinkClassifier {
    pub config: BlinkConfig,
    recent: Vec<f64>,
    last_blink_s: f64,
}

impl BlinkClassifier {
    pub fn new(config: BlinkConfig) -> Self {
        Self {
            config,
            recent: Vec::new(),
            last_blink_s: 0.0,
        }
    }

    /// Register a blink signal at `now_s`. Returns `None` while inside the
    /// cooldown of the previous accepted blink.
    pub fn register_blink(&mut self, now_s: f64) -> Option<BlinkKind> {
        if now_s - self.last_blink_s <= self.config.cooldown_s {
            return None;
        }
        self.last_blink_s = now_s;
        self.recent.push(now_s);

        let window = self.config.window_s;
        self.recent.retain(|t| now_s - t <= window);

        if self.recent.len() >= self.config.triple_count {
            self.recent.clear();
            debug!("triple blink at {:.3}s", now_s);
            return Some(BlinkKind::Triple);
        }
        debug!("blink at {:.3}s ({} in window)", now_s, self.recent.len());
        Some(BlinkKind::Single)
    }

    /// Accepted blinks currently inside the window.
    pub fn pending(&self) -> usize {
        self.recent.len()
    }

    pub fn last_blink_s(&self) -> f64 {
        self.last_blink_s
    }
}

impl Default for BlinkClassifier {
    fn default() -> Self {
        Self::new(BlinkConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_single_triple() {
        let mut bc = BlinkClassifier::default();
        assert_eq!(bc.register_blink(1.0), Some(BlinkKind::Single));
        assert_eq!(bc.register_blink(1.5), Some(BlinkKind::Single));
        assert_eq!(bc.register_blink(2.0), Some(BlinkKind::Triple));
        assert_eq!(bc.pending(), 0);
    }

    #[test]
    fn test_cooldown_debounces() {
        let mut bc = BlinkClassifier::default();
        assert_eq!(bc.register_blink(1.0), Some(BlinkKind::Single));
        // Sustained closure at 30fps
        assert_eq!(bc.register_blink(1.033), None);
        assert_eq!(bc.register_blink(1.25), None);
        assert_eq!(bc.pending(), 1);
        assert_eq!(bc.last_blink_s(), 1.0);
        assert_eq!(bc.register_blink(1.31), Some(BlinkKind::Single));
    }

    #[test]
    fn test_first_blink_inside_initial_cooldown_is_ignored() {
        let mut bc = BlinkClassifier::default();
        assert_eq!(bc.register_blink(0.2), None);
        assert_eq!(bc.register_blink(0.31), Some(BlinkKind::Single));
    }

    #[test]
    fn test_window_prunes_old_blinks() {
        let mut bc = BlinkClassifier::default();
        bc.register_blink(1.0);
        bc.register_blink(2.0);
        // 1.0 falls out of the 2.5 s window
        assert_eq!(bc.register_blink(3.6), Some(BlinkKind::Single));
        assert_eq!(bc.pending(), 2);
        assert_eq!(bc.register_blink(4.0), Some(BlinkKind::Triple));
    }

    #[test]
    fn test_triple_clears_history() {
        let mut bc = BlinkClassifier::default();
        for t in [1.0, 1.5, 2.0] {
            bc.register_blink(t);
        }
        assert_eq!(bc.register_blink(2.5), Some(BlinkKind::Single));
        assert_eq!(bc.register_blink(3.0), Some(BlinkKind::Single));
        assert_eq!(bc.register_blink(3.5), Some(BlinkKind::Triple));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(BlinkKind::Single.as_str(), "single");
        assert_eq!(BlinkKind::Triple.as_str(), "triple");
    }
}
