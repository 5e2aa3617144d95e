//! Rep-quality classification.
//!
//! A rep gets exactly one classification. Priority, highest first:
//! reversed with short ROM → failed, partial ROM, shortened ROM,
//! stall → grinding, otherwise complete.

use serde::{Deserialize, Serialize};

use super::frame::{Phase, Rep};
use crate::config::RepQualitySettings;

/// Classification of a single rep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepQuality {
    /// Full range, no stall
    Complete,
    /// Full range but stalled on the way up
    Grinding,
    /// Range of motion short of target
    Shortened,
    /// Range of motion well short of target
    Partial,
    /// Bar reversed before reaching range
    Failed,
}

impl RepQuality {
    pub fn label(&self) -> &'static str {
        match self {
            RepQuality::Complete => "Complete",
            RepQuality::Grinding => "Grinding",
            RepQuality::Shortened => "Shortened",
            RepQuality::Partial => "Partial",
            RepQuality::Failed => "Failed",
        }
    }

    /// Whether the rep counts toward the set's rep total.
    pub fn counts_as_rep(&self) -> bool {
        matches!(self, RepQuality::Complete | RepQuality::Grinding)
    }
}

impl std::fmt::Display for RepQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of the quality state machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub quality: RepQuality,
    /// Max position as % of the reference position
    pub rom_percent: f64,
    pub stall_detected: bool,
    /// Longest stall (s)
    pub stall_duration: f64,
    pub reversal_detected: bool,
}

/// Classify a rep against an optional reference max position.
///
/// Without a positive reference the rep is its own reference (100% ROM).
pub fn assess_quality(
    rep: &Rep,
    reference_position: Option<f64>,
    settings: &RepQualitySettings,
) -> QualityAssessment {
    let rom_percent = match reference_position.filter(|p| *p > 0.0) {
        Some(reference) => rep.max_position / reference * 100.0,
        None => 100.0,
    };

    let stall_duration = detect_stall(rep, settings);
    let stall_detected = stall_duration.is_some();
    let reversal_detected = detect_reversal(rep, settings);

    let quality = if reversal_detected && rom_percent < settings.failed_rom_percent {
        RepQuality::Failed
    } else if rom_percent < settings.partial_rom_percent {
        RepQuality::Partial
    } else if rom_percent < settings.shortened_rom_percent {
        RepQuality::Shortened
    } else if stall_detected {
        RepQuality::Grinding
    } else {
        RepQuality::Complete
    };

    QualityAssessment {
        quality,
        rom_percent,
        stall_detected,
        stall_duration: stall_duration.unwrap_or(0.0),
        reversal_detected,
    }
}

/// Longest run of stalled concentric frames, if any run is long enough.
///
/// A run lasts from its first stalled frame to the next frame that is not
/// stalled (or the last frame when the run reaches the end).
fn detect_stall(rep: &Rep, settings: &RepQualitySettings) -> Option<f64> {
    let ceiling = rep.max_position * settings.stall_position_fraction;
    let is_stalled = |i: usize| {
        let f = &rep.frames[i];
        f.phase == Phase::Concentric
            && f.velocity < settings.stall_velocity_threshold
            && f.position < ceiling
    };

    let mut longest: Option<f64> = None;
    let mut i = 0;
    while i < rep.frames.len() {
        if !is_stalled(i) {
            i += 1;
            continue;
        }
        let start = i;
        while i < rep.frames.len() && is_stalled(i) {
            i += 1;
        }
        if i - start >= settings.min_stall_frames.max(1) {
            let end = rep.frames.get(i).unwrap_or(&rep.frames[i - 1]);
            let duration = end.timestamp - rep.frames[start].timestamp;
            longest = Some(longest.map_or(duration, |d| d.max(duration)));
        }
    }
    longest
}

/// Consecutive concentric position drops beyond the margin.
fn detect_reversal(rep: &Rep, settings: &RepQualitySettings) -> bool {
    let mut run = 0usize;
    for w in rep.frames.windows(2) {
        let dropping = w[0].phase == Phase::Concentric
            && w[1].phase == Phase::Concentric
            && w[0].position - w[1].position > settings.reversal_margin;
        if dropping {
            run += 1;
            if run >= settings.min_reversal_frames.max(1) {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}
