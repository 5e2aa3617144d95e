//! Telemetry frames and repetitions.
//!
//! Frames are produced by the device layer and consumed as-is. A [`Rep`] is a
//! validated, ordered frame sequence with its phase durations derived once.

use serde::{Deserialize, Serialize};

use crate::error::{VbtError, VbtResult};

/// Movement phase tagged on each frame upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Lifting
    Concentric,
    /// Lowering
    Eccentric,
    /// Missing or unrecognized tag; excluded from phase aggregates
    #[serde(other)]
    Unknown,
}

/// A single telemetry sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Seconds since the start of the set
    pub timestamp: f64,
    /// Cable position (m)
    pub position: f64,
    /// Signed velocity (m/s), positive while lifting
    pub velocity: f64,
    /// Force (N)
    pub force: f64,
    /// Phase tag
    pub phase: Phase,
}

impl Frame {
    pub fn new(timestamp: f64, position: f64, velocity: f64, force: f64, phase: Phase) -> Self {
        Self {
            timestamp,
            position,
            velocity,
            force,
            phase,
        }
    }

    fn is_finite(&self) -> bool {
        self.timestamp.is_finite()
            && self.position.is_finite()
            && self.velocity.is_finite()
            && self.force.is_finite()
    }
}

/// A completed repetition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rep {
    /// Position of the rep within its set (1-based)
    pub index: u32,
    /// Frames in time order
    pub frames: Vec<Frame>,
    /// Time spent in concentric frames (s)
    pub concentric_duration: f64,
    /// Time spent in eccentric frames (s)
    pub eccentric_duration: f64,
    /// Paused time in the bottom half of the range (s)
    pub bottom_pause: f64,
    /// Paused time in the top half of the range (s)
    pub top_pause: f64,
    /// Highest position reached
    pub max_position: f64,
    /// Highest velocity reached
    pub max_velocity: f64,
    /// First to last frame (s)
    pub total_duration: f64,
}

impl Rep {
    /// Validate frames and derive phase durations.
    ///
    /// Each inter-frame interval is attributed to the earlier frame. Time with
    /// speed under `pause_velocity_threshold` counts as pause instead of phase
    /// time, at the bottom below half of max position and at the top otherwise.
    pub fn from_frames(
        index: u32,
        frames: Vec<Frame>,
        pause_velocity_threshold: f64,
    ) -> VbtResult<Self> {
        validate_frames(&frames)?;

        let max_position = frames
            .iter()
            .map(|f| f.position)
            .fold(0.0_f64, f64::max);
        let max_velocity = frames
            .iter()
            .map(|f| f.velocity)
            .fold(0.0_f64, f64::max);

        let mut concentric_duration = 0.0;
        let mut eccentric_duration = 0.0;
        let mut bottom_pause = 0.0;
        let mut top_pause = 0.0;

        for pair in frames.windows(2) {
            let (frame, next) = (pair[0], pair[1]);
            let dt = next.timestamp - frame.timestamp;

            if frame.velocity.abs() < pause_velocity_threshold {
                if frame.position < max_position / 2.0 {
                    bottom_pause += dt;
                } else {
                    top_pause += dt;
                }
                continue;
            }

            match frame.phase {
                Phase::Concentric => concentric_duration += dt,
                Phase::Eccentric => eccentric_duration += dt,
                Phase::Unknown => {}
            }
        }

        let total_duration = match (frames.first(), frames.last()) {
            (Some(first), Some(last)) => last.timestamp - first.timestamp,
            _ => 0.0,
        };

        Ok(Self {
            index,
            frames,
            concentric_duration,
            eccentric_duration,
            bottom_pause,
            top_pause,
            max_position,
            max_velocity,
            total_duration,
        })
    }

    /// Frames tagged with the given phase.
    pub fn phase_frames(&self, phase: Phase) -> impl Iterator<Item = &Frame> {
        self.frames.iter().filter(move |f| f.phase == phase)
    }

    /// Check if the rep has no telemetry.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Reject non-finite samples and decreasing timestamps.
pub fn validate_frames(frames: &[Frame]) -> VbtResult<()> {
    if let Some(i) = frames.iter().position(|f| !f.is_finite()) {
        tracing::warn!("Rejected frame sequence: non-finite value at frame {}", i);
        return Err(VbtError::InvalidInput(format!(
            "frame {} contains a non-finite value",
            i
        )));
    }

    if let Some(i) = frames
        .windows(2)
        .position(|w| w[1].timestamp < w[0].timestamp)
    {
        tracing::warn!("Rejected frame sequence: timestamp decreases at frame {}", i + 1);
        return Err(VbtError::InvalidInput(format!(
            "timestamp decreases at frame {}",
            i + 1
        )));
    }

    Ok(())
}
