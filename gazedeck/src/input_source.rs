//! Gaze input abstraction.
//!
//! The pupil/landmark detector is an external collaborator. The core only
//! sees it through `GazeProvider`, queried once per frame. `FrameInput` is
//! a captured frame of provider output, used for trace replay and for
//! driving the controller from scripted sequences in tests.

use std::collections::VecDeque;
use std::io::BufRead;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Per-frame output of an eye/pupil detector.
///
/// `None` ratios mean no face or eyes were located this frame.
pub trait GazeProvider {
    /// Horizontal gaze ratio in [0, 1], 0 = left.
    fn horizontal_ratio(&self) -> Option<f64>;
    /// Vertical gaze ratio in [0, 1], 0 = top.
    fn vertical_ratio(&self) -> Option<f64>;
    /// Whether the eyes are closed this frame.
    fn is_blinking(&self) -> bool;
}

/// One recorded frame of detector output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Seconds since the start of the trace.
    #[serde(rename = "t")]
    pub t_s: f64,
    #[serde(rename = "h", default)]
    pub horizontal: Option<f64>,
    #[serde(rename = "v", default)]
    pub vertical: Option<f64>,
    #[serde(default)]
    pub blink: bool,
}

impl FrameInput {
    /// Frame with a located gaze point.
    pub fn gaze(t_s: f64, horizontal: f64, vertical: f64) -> Self {
        Self {
            t_s,
            horizontal: Some(horizontal),
            vertical: Some(vertical),
            blink: false,
        }
    }

    /// Frame where the detector found no eyes.
    pub fn lost(t_s: f64) -> Self {
        Self {
            t_s,
            horizontal: None,
            vertical: None,
            blink: false,
        }
    }

    /// Frame with closed eyes.
    pub fn blink(t_s: f64) -> Self {
        Self {
            t_s,
            horizontal: None,
            vertical: None,
            blink: true,
        }
    }
}

impl GazeProvider for FrameInput {
    fn horizontal_ratio(&self) -> Option<f64> {
        self.horizontal
    }

    fn vertical_ratio(&self) -> Option<f64> {
        self.vertical
    }

    fn is_blinking(&self) -> bool {
        self.blink
    }
}

/// Source of frames for the session loop.
pub trait FrameSource {
    /// Get the next frame, if any.
    fn next_frame(&mut self) -> Option<FrameInput>;
    /// Whether there are more frames to deliver.
    fn has_frames(&self) -> bool;
}

/// Frames delivered from a pre-defined queue.
pub struct ScriptedFrames {
    frames: VecDeque<FrameInput>,
}

impl ScriptedFrames {
    pub fn new(frames: Vec<FrameInput>) -> Self {
        Self {
            frames: VecDeque::from(frames),
        }
    }

    /// Parse a JSON-lines trace: one `{"t":..,"h":..,"v":..,"blink":..}`
    /// object per line. Blank lines and `#` comments are skipped;
    /// malformed lines are logged and skipped.
    pub fn from_jsonl<R: BufRead>(reader: R) -> std::io::Result<Self> {
        let mut frames = Vec::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match serde_json::from_str::<FrameInput>(trimmed) {
                Ok(frame) => frames.push(frame),
                Err(e) => warn!("trace line {}: skipping malformed frame: {}", lineno + 1, e),
            }
        }
        Ok(Self::new(frames))
    }

    /// Number of remaining frames.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for ScriptedFrames {
    fn next_frame(&mut self) -> Option<FrameInput> {
        self.frames.pop_front()
    }

    fn has_frames(&self) -> bool {
        !self.frames.is_empty()
    }
}
