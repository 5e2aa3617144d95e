//! Set aggregation and intent detection.

use serde::{Deserialize, Serialize};

use super::effort::{Confidence, EffortEstimate};
use super::frame::{Phase, Rep};
use super::rep::{RepAnalytics, RepAnalyticsComputer, RepContext};
use super::tempo::TempoTarget;
use crate::adaptive::SetPerformance;
use super::rep::DataStatus;
use crate::config::{IntentSettings, VbtConfig};
use crate::error::{VbtError, VbtResult};

/// Whether the set looked like a maximal-intent effort.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntentAssessment {
    /// First rep was slower than the configured fraction of the expected velocity
    pub below_expected: bool,
    /// Per-rep velocities barely changed (pacing)
    pub low_variance: bool,
    /// Coefficient of variation of rep velocities (%), `None` with too few reps
    pub velocity_cv_percent: Option<f64>,
    pub likely_max_intent: bool,
    pub confidence: Confidence,
}

/// Detect pacing or submaximal intent from per-rep mean concentric velocities.
pub fn detect_intent(
    rep_velocities: &[f64],
    expected_velocity: Option<f64>,
    settings: &IntentSettings,
) -> IntentAssessment {
    let expected = expected_velocity.filter(|v| *v > 0.0);

    let below_expected = match (expected, rep_velocities.first()) {
        (Some(expected), Some(first)) => *first < expected * settings.below_expected_ratio,
        _ => false,
    };

    let velocity_cv_percent =
        coefficient_of_variation(rep_velocities, settings.min_reps_for_variance);
    let low_variance = velocity_cv_percent.is_some_and(|cv| cv < settings.low_variance_cv_percent);

    let confidence = match expected {
        None => Confidence::Low,
        Some(_) if rep_velocities.len() < settings.min_reps_for_variance => Confidence::Medium,
        Some(_) => Confidence::High,
    };

    IntentAssessment {
        below_expected,
        low_variance,
        velocity_cv_percent,
        likely_max_intent: !below_expected && !low_variance,
        confidence,
    }
}

/// Population CV (%) of the values; `None` below `min_values` or with a zero mean.
fn coefficient_of_variation(values: &[f64], min_values: usize) -> Option<f64> {
    if values.is_empty() || values.len() < min_values {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return None;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt() / mean * 100.0)
}

/// Aggregated analytics for one set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetAnalytics {
    pub reps: Vec<RepAnalytics>,
    pub weight: f64,
    pub tempo_target: TempoTarget,
    /// Sum of rep work (J)
    pub total_work: f64,
    /// Sum of rep impulse (N·s)
    pub total_impulse: f64,
    /// Mean velocity loss over the reps after the reference rep, `None` without any
    pub average_velocity_loss: Option<f64>,
    /// Effort of the last rep
    pub final_effort: Option<EffortEstimate>,
    pub intent: IntentAssessment,
}

impl SetAnalytics {
    /// Reps that count toward the set: measured, and complete or grinding.
    pub fn rep_count(&self) -> u32 {
        self.reps
            .iter()
            .filter(|r| r.status == DataStatus::Computed && r.quality.quality.counts_as_rep())
            .count() as u32
    }

    /// Every rep the set was given, including empty and failed ones.
    pub fn attempted_reps(&self) -> u32 {
        self.reps.len() as u32
    }

    /// Mean concentric velocity of the first measured rep.
    pub fn first_rep_velocity(&self) -> Option<f64> {
        self.reps
            .iter()
            .find(|r| r.status == DataStatus::Computed)
            .map(|r| r.velocity.mean_concentric)
    }

    /// Summarize the set for the adaptive engine.
    pub fn to_performance(&self, set_number: u32) -> SetPerformance {
        SetPerformance {
            set_number,
            weight: self.weight,
            reps: self.rep_count(),
            first_rep_velocity: self.first_rep_velocity(),
            velocity_loss: self.average_velocity_loss,
            rir: self.final_effort.map(|e| e.rir),
            rpe: self.final_effort.map(|e| e.rpe),
        }
    }
}

/// Options for analyzing a set.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SetContext {
    /// Calibrated full range of motion; rep 1's max position when absent
    pub reference_position: Option<f64>,
    /// Expected first-rep velocity at this weight (e.g. from a load-velocity profile)
    pub expected_velocity: Option<f64>,
    /// Tempo target; the configured default when absent
    pub tempo_target: Option<TempoTarget>,
}

/// Aggregates reps into [`SetAnalytics`].
pub struct SetAggregator {
    computer: RepAnalyticsComputer,
}

impl SetAggregator {
    /// Create with the given configuration.
    pub fn new(config: VbtConfig) -> Self {
        Self {
            computer: RepAnalyticsComputer::new(config),
        }
    }

    /// Analyze every rep of a set against its first non-empty rep.
    pub fn analyze(&self, reps: &[Rep], weight: f64, ctx: &SetContext) -> VbtResult<SetAnalytics> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(VbtError::InvalidInput(format!("invalid set weight {}", weight)));
        }

        let config = self.computer.config();
        let tempo_target = ctx.tempo_target.unwrap_or(config.default_tempo);

        let mean_velocities: Vec<f64> = reps
            .iter()
            .filter(|r| !r.is_empty())
            .map(|r| mean_concentric(r))
            .collect();
        let intent = detect_intent(&mean_velocities, ctx.expected_velocity, &config.intent);

        let reference_index = reps.iter().position(|r| !r.is_empty());
        let reference_velocity = mean_velocities.first().copied().filter(|v| *v > 0.0);
        let reference_position = ctx
            .reference_position
            .or_else(|| reference_index.map(|i| reps[i].max_position));

        let mut analytics = Vec::with_capacity(reps.len());
        for (i, rep) in reps.iter().enumerate() {
            let after_reference = reference_index.is_some_and(|r| i > r);
            let rep_ctx = RepContext {
                reference_velocity: reference_velocity.filter(|_| after_reference),
                reference_position,
                tempo_target,
                maximal_intent: intent.likely_max_intent,
            };
            analytics.push(self.computer.compute(rep, &rep_ctx)?);
        }

        let total_work = analytics.iter().map(|a| a.work.total_work).sum();
        let total_impulse = analytics.iter().map(|a| a.work.total_impulse).sum();
        let losses: Vec<f64> = analytics
            .iter()
            .skip(reference_index.map_or(analytics.len(), |r| r + 1))
            .filter_map(|a| a.velocity.velocity_loss_percent)
            .collect();
        let average_velocity_loss = if losses.is_empty() {
            None
        } else {
            Some(losses.iter().sum::<f64>() / losses.len() as f64)
        };
        let final_effort = analytics.last().and_then(|a| a.effort);

        tracing::debug!(
            "Set at {}: {} of {} reps counted, avg loss {:?}, intent {}",
            weight,
            analytics
                .iter()
                .filter(|a| a.status == DataStatus::Computed && a.quality.quality.counts_as_rep())
                .count(),
            analytics.len(),
            average_velocity_loss,
            intent.likely_max_intent
        );

        Ok(SetAnalytics {
            reps: analytics,
            weight,
            tempo_target,
            total_work,
            total_impulse,
            average_velocity_loss,
            final_effort,
            intent,
        })
    }
}

impl Default for SetAggregator {
    fn default() -> Self {
        Self::new(VbtConfig::default())
    }
}

fn mean_concentric(rep: &Rep) -> f64 {
    let (sum, count) = rep
        .phase_frames(Phase::Concentric)
        .fold((0.0, 0usize), |(s, c), f| (s + f.velocity, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
