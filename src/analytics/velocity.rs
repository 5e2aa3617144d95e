//! Velocity metrics and velocity-loss calculation.

use serde::{Deserialize, Serialize};

use super::frame::{Phase, Rep};
use crate::config::VelocityZoneTable;

/// Velocity band relative to the reference rep, slowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VelocityZone {
    /// Below 50% of reference
    Grinding,
    /// 50-70% of reference
    Heavy,
    /// 70-85% of reference
    Moderate,
    /// 85-95% of reference
    Fast,
    /// 95% of reference or better
    Explosive,
}

impl VelocityZone {
    pub fn label(&self) -> &'static str {
        match self {
            VelocityZone::Grinding => "Grinding",
            VelocityZone::Heavy => "Heavy",
            VelocityZone::Moderate => "Moderate",
            VelocityZone::Fast => "Fast",
            VelocityZone::Explosive => "Explosive",
        }
    }
}

impl std::fmt::Display for VelocityZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Per-rep velocity metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VelocityMetrics {
    /// Mean concentric velocity (m/s)
    pub mean_concentric: f64,
    /// Peak concentric velocity (m/s)
    pub peak_concentric: f64,
    /// Mean eccentric speed (m/s, magnitude)
    pub mean_eccentric: f64,
    /// Peak eccentric speed (m/s, magnitude)
    pub peak_eccentric: f64,
    /// Loss vs. the reference rep (%), `None` without a reference
    pub velocity_loss_percent: Option<f64>,
    /// Zone vs. the reference rep, `None` without a reference
    pub zone: Option<VelocityZone>,
}

/// Compute velocity metrics for a rep.
pub fn velocity_metrics(
    rep: &Rep,
    reference_velocity: Option<f64>,
    zones: &VelocityZoneTable,
) -> VelocityMetrics {
    let (mean_concentric, peak_concentric) =
        mean_and_peak(rep.phase_frames(Phase::Concentric).map(|f| f.velocity));
    let (mean_eccentric, peak_eccentric) =
        mean_and_peak(rep.phase_frames(Phase::Eccentric).map(|f| f.velocity.abs()));

    let reference = reference_velocity.filter(|r| *r > 0.0);
    let velocity_loss_percent = reference.map(|r| velocity_loss(mean_concentric, r));
    let zone = reference.map(|r| zones.zone_for_ratio(mean_concentric / r));

    VelocityMetrics {
        mean_concentric,
        peak_concentric,
        mean_eccentric,
        peak_eccentric,
        velocity_loss_percent,
        zone,
    }
}

/// Velocity loss (%) of `velocity` relative to `reference`.
///
/// Negative when the rep was faster than the reference.
pub fn velocity_loss(velocity: f64, reference: f64) -> f64 {
    100.0 * (1.0 - velocity / reference)
}

fn mean_and_peak(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut sum = 0.0;
    let mut count = 0usize;
    let mut peak = f64::NEG_INFINITY;
    for v in values {
        sum += v;
        count += 1;
        peak = peak.max(v);
    }
    if count == 0 {
        (0.0, 0.0)
    } else {
        (sum / count as f64, peak)
    }
}
