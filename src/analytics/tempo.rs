//! Tempo compliance against a four-part target.

use serde::{Deserialize, Serialize};

use super::frame::Rep;

/// Floor applied to a target duration before dividing by it.
const MIN_TARGET_SECS: f64 = 0.1;

/// Target tempo in seconds: eccentric, bottom pause, concentric, top pause.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoTarget {
    pub eccentric: f64,
    pub bottom_pause: f64,
    pub concentric: f64,
    pub top_pause: f64,
}

impl Default for TempoTarget {
    /// 2-0-1-0: controlled lowering, no pauses, fast lift.
    fn default() -> Self {
        Self::new(2.0, 0.0, 1.0, 0.0)
    }
}

impl TempoTarget {
    pub fn new(eccentric: f64, bottom_pause: f64, concentric: f64, top_pause: f64) -> Self {
        Self {
            eccentric,
            bottom_pause,
            concentric,
            top_pause,
        }
    }

    fn parts(&self) -> [f64; 4] {
        [
            self.eccentric,
            self.bottom_pause,
            self.concentric,
            self.top_pause,
        ]
    }
}

impl std::fmt::Display for TempoTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.eccentric, self.bottom_pause, self.concentric, self.top_pause
        )
    }
}

/// Actual vs. target tempo for one rep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoAnalysis {
    /// Measured phase durations, in target order
    pub actual: TempoTarget,
    /// Target used for comparison
    pub target: TempoTarget,
    /// Signed deviation per part (actual - target), in target order
    pub deviations: [f64; 4],
    /// 0-100, 100 when every part matches
    pub compliance_percent: f64,
}

/// Compare a rep's phase durations with a target tempo.
pub fn analyze_tempo(rep: &Rep, target: &TempoTarget) -> TempoAnalysis {
    let actual = TempoTarget::new(
        rep.eccentric_duration,
        rep.bottom_pause,
        rep.concentric_duration,
        rep.top_pause,
    );

    let mut deviations = [0.0; 4];
    let mut relative_sum = 0.0;
    for (i, (a, t)) in actual.parts().iter().zip(target.parts()).enumerate() {
        deviations[i] = a - t;
        relative_sum += (a - t).abs() / t.max(MIN_TARGET_SECS);
    }

    let compliance_percent = (1.0 - relative_sum / 4.0).max(0.0) * 100.0;

    TempoAnalysis {
        actual,
        target: *target,
        deviations,
        compliance_percent,
    }
}
