//! Work, impulse, power and rate of force development.
//!
//! Integration uses the fixed device frame interval rather than frame
//! timestamps, matching how the machine reports force.

use serde::{Deserialize, Serialize};

use super::frame::{Phase, Rep};

/// Mechanical output for one rep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkMetrics {
    /// Concentric work (J)
    pub concentric_work: f64,
    /// Eccentric work (J, magnitude)
    pub eccentric_work: f64,
    /// Concentric + eccentric work (J)
    pub total_work: f64,
    /// Concentric impulse (N·s)
    pub concentric_impulse: f64,
    /// Eccentric impulse (N·s)
    pub eccentric_impulse: f64,
    /// Concentric + eccentric impulse (N·s)
    pub total_impulse: f64,
    /// Average concentric power (W)
    pub concentric_power: f64,
    /// Average eccentric power (W)
    pub eccentric_power: f64,
    /// Highest instantaneous concentric power (W)
    pub peak_power: f64,
    /// Highest positive force rise between concentric frames (N/s)
    pub rate_of_force_development: f64,
}

#[derive(Default)]
struct PhaseTotals {
    work: f64,
    impulse: f64,
    frames: usize,
}

impl PhaseTotals {
    fn power(&self, dt: f64) -> f64 {
        let time = self.frames as f64 * dt;
        if time > 0.0 {
            self.work / time
        } else {
            0.0
        }
    }
}

/// Integrate work and impulse per phase with a fixed frame interval `dt`.
pub fn work_metrics(rep: &Rep, dt: f64) -> WorkMetrics {
    if dt <= 0.0 {
        return WorkMetrics::default();
    }

    let mut concentric = PhaseTotals::default();
    let mut eccentric = PhaseTotals::default();
    let mut peak_power = 0.0_f64;

    for frame in &rep.frames {
        let force = frame.force.abs();
        let totals = match frame.phase {
            Phase::Concentric => {
                peak_power = peak_power.max(force * frame.velocity);
                &mut concentric
            }
            Phase::Eccentric => &mut eccentric,
            Phase::Unknown => continue,
        };
        totals.impulse += force * dt;
        totals.work += force * frame.velocity.abs() * dt;
        totals.frames += 1;
    }

    WorkMetrics {
        concentric_work: concentric.work,
        eccentric_work: eccentric.work,
        total_work: concentric.work + eccentric.work,
        concentric_impulse: concentric.impulse,
        eccentric_impulse: eccentric.impulse,
        total_impulse: concentric.impulse + eccentric.impulse,
        concentric_power: concentric.power(dt),
        eccentric_power: eccentric.power(dt),
        peak_power,
        rate_of_force_development: rate_of_force_development(rep, dt),
    }
}

/// Max positive force rise between consecutive concentric frames.
fn rate_of_force_development(rep: &Rep, dt: f64) -> f64 {
    rep.frames
        .windows(2)
        .filter(|w| w[0].phase == Phase::Concentric && w[1].phase == Phase::Concentric)
        .map(|w| (w[1].force - w[0].force) / dt)
        .filter(|rate| *rate > 0.0)
        .fold(0.0, f64::max)
}
