//! Clock abstraction and per-frame timestamps.
//!
//! Every frame reads the clock exactly once and hands the resulting
//! `FrameTime` to the selector, blink classifier and navigator, so all
//! subsystems compute their deltas from the same instant.
//!
//! Live capture uses `SystemClock`. Trace replay and tests use
//! `ManualClock` with explicit advancement.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant, SystemTime};

/// Timestamp shared by all components for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Monotonic seconds since the session origin.
    pub now_s: f64,
    /// Wall-clock milliseconds since UNIX epoch, for session records.
    pub unix_ms: i64,
}

impl FrameTime {
    pub fn new(now_s: f64, unix_ms: i64) -> Self {
        Self { now_s, unix_ms }
    }
}

/// Trait abstracting time sources.
pub trait Clock: Send + Sync {
    /// Returns the current monotonic instant.
    fn now(&self) -> Instant;

    /// Returns the current wall-clock time as milliseconds
    /// since UNIX epoch.
    fn unix_millis(&self) -> i64;

    /// Read the clock once for a frame, relative to `origin`.
    fn frame_time(&self, origin: Instant) -> FrameTime {
        let now_s = self.now().saturating_duration_since(origin).as_secs_f64();
        FrameTime {
            now_s,
            unix_ms: self.unix_millis(),
        }
    }
}

/// Real system time.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn unix_millis(&self) -> i64 {
        system_unix_millis()
    }
}

/// Manually advanced clock for trace replay and tests.
pub struct ManualClock {
    state: Mutex<ManualState>,
}

struct ManualState {
    instant: Instant,
    /// Wall-clock anchor, in milliseconds since UNIX epoch.
    base_unix_ms: i64,
    /// Time advanced since the anchor was set. Kept at full precision so
    /// sub-millisecond steps do not truncate.
    since_base: Duration,
}

impl ManualClock {
    /// Create a clock starting at the current real time.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ManualState {
                instant: Instant::now(),
                base_unix_ms: system_unix_millis(),
                since_base: Duration::ZERO,
            }),
        }
    }

    /// Advance time by the given duration.
    pub fn advance(&self, duration: Duration) {
        let mut state = lock(&self.state);
        state.instant += duration;
        state.since_base += duration;
    }

    /// Advance time by fractional seconds. Negative or non-finite
    /// values are ignored.
    pub fn advance_secs(&self, secs: f64) {
        if secs.is_finite() && secs > 0.0 {
            self.advance(Duration::from_secs_f64(secs));
        }
    }

    /// Set the UNIX millisecond timestamp explicitly.
    pub fn set_unix_millis(&self, ms: i64) {
        let mut state = lock(&self.state);
        state.base_unix_ms = ms;
        state.since_base = Duration::ZERO;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        lock(&self.state).instant
    }

    fn unix_millis(&self) -> i64 {
        let state = lock(&self.state);
        state.base_unix_ms + state.since_base.as_millis() as i64
    }
}

// A poisoned clock still holds a valid timestamp.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn system_unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
