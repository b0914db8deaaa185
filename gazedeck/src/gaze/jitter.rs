//! Dispersion statistics over the samples of one dwell episode.

use serde::{Deserialize, Serialize};

use super::polar::PolarOffset;

/// Radius and angle dispersion for a dwell episode.
///
/// Field names are part of the session record format.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JitterStats {
    pub samples_radius: usize,
    pub mean_radius: f64,
    pub std_radius: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    pub range_radius: f64,
    /// Standard deviation relative to the mean radius.
    pub jitter_radius: f64,

    pub samples_theta: usize,
    pub mean_theta: f64,
    pub std_theta: f64,
    pub min_theta: f64,
    pub max_theta: f64,
    pub range_theta: f64,
    /// Standard deviation as a fraction of a full turn.
    pub jitter_theta: f64,
}

/// Count, mean, population stddev, min, max.
#[derive(Debug, Clone, Copy, Default)]
struct Summary {
    count: usize,
    mean: f64,
    std: f64,
    min: f64,
    max: f64,
}

fn summarize(values: impl Iterator<Item = f64> + Clone) -> Summary {
    let count = values.clone().count();
    if count == 0 {
        return Summary::default();
    }
    let n = count as f64;
    let mean = values.clone().sum::<f64>() / n;
    let var = values.clone().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    Summary {
        count,
        mean,
        std: var.sqrt(),
        min,
        max,
    }
}

impl JitterStats {
    /// Compute statistics over buffered offsets. An empty buffer yields
    /// all-zero stats.
    pub fn from_samples(samples: &[PolarOffset]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let r = summarize(samples.iter().map(|s| s.radius));
        let t = summarize(samples.iter().map(|s| s.theta_deg));

        let jitter_radius = if r.mean > 0.0 { r.std / r.mean } else { 0.0 };
        let range_theta = if t.max >= t.min {
            t.max - t.min
        } else {
            360.0 + t.max - t.min
        };

        Self {
            samples_radius: r.count,
            mean_radius: r.mean,
            std_radius: r.std,
            min_radius: r.min,
            max_radius: r.max,
            range_radius: r.max - r.min,
            jitter_radius,

            samples_theta: t.count,
            mean_theta: t.mean,
            std_theta: t.std,
            min_theta: t.min,
            max_theta: t.max,
            range_theta,
            jitter_theta: t.std / 360.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn off(radius: f64, theta_deg: f64) -> PolarOffset {
        PolarOffset { radius, theta_deg }
    }

    #[test]
    fn test_empty_buffer_is_zero() {
        let stats = JitterStats::from_samples(&[]);
        assert_eq!(stats, JitterStats::default());
        assert_eq!(stats.samples_radius, 0);
        assert_eq!(stats.jitter_radius, 0.0);
    }

    #[test]
    fn test_constant_samples_have_no_jitter() {
        let samples = vec![off(0.2, 300.0); 10];
        let stats = JitterStats::from_samples(&samples);
        assert_eq!(stats.samples_radius, 10);
        assert_eq!(stats.samples_theta, 10);
        assert!((stats.mean_radius - 0.2).abs() < 1e-12);
        assert!(stats.std_radius.abs() < 1e-12);
        assert!(stats.jitter_radius.abs() < 1e-9);
        assert_eq!(stats.range_theta, 0.0);
    }

    #[test]
    fn test_dispersion_values() {
        let samples = [off(0.1, 290.0), off(0.3, 310.0)];
        let stats = JitterStats::from_samples(&samples);
        assert!((stats.mean_radius - 0.2).abs() < 1e-12);
        assert!((stats.std_radius - 0.1).abs() < 1e-12);
        assert!((stats.jitter_radius - 0.5).abs() < 1e-9);
        assert!((stats.range_radius - 0.2).abs() < 1e-12);
        assert_eq!(stats.min_theta, 290.0);
        assert_eq!(stats.max_theta, 310.0);
        assert_eq!(stats.range_theta, 20.0);
        assert!((stats.jitter_theta - 10.0 / 360.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_radius_guard() {
        let samples = [off(0.0, 0.0), off(0.0, 0.0)];
        let stats = JitterStats::from_samples(&samples);
        assert_eq!(stats.jitter_radius, 0.0);
        assert!(stats.jitter_radius.is_finite());
    }

    #[test]
    fn test_serializes_flat_field_names() {
        let stats = JitterStats::from_samples(&[off(0.2, 230.0)]);
        let v = serde_json::to_value(stats).unwrap();
        assert_eq!(v["samples_radius"], 1);
        assert!(v.get("jitter_theta").is_some());
    }
}
