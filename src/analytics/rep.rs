//! Per-rep analytics.

use serde::{Deserialize, Serialize};

use super::effort::{estimate_effort, EffortEstimate};
use super::frame::Rep;
use super::quality::{assess_quality, QualityAssessment, RepQuality};
use super::tempo::{analyze_tempo, TempoAnalysis, TempoTarget};
use super::velocity::{velocity_metrics, VelocityMetrics};
use super::work::{work_metrics, WorkMetrics};
use crate::config::VbtConfig;
use crate::error::VbtResult;

/// Whether a result was computed from data or is a neutral placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataStatus {
    /// Computed from telemetry
    Computed,
    /// Not enough data; values are neutral defaults
    InsufficientData,
}

/// Inputs that come from outside the rep itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepContext {
    /// Reference mean concentric velocity (normally rep 1)
    pub reference_velocity: Option<f64>,
    /// Reference max position (calibrated ROM or rep 1)
    pub reference_position: Option<f64>,
    /// Tempo to compare against
    pub tempo_target: TempoTarget,
    /// Lifter is assumed to move every rep as fast as possible
    pub maximal_intent: bool,
}

impl Default for RepContext {
    fn default() -> Self {
        Self {
            reference_velocity: None,
            reference_position: None,
            tempo_target: TempoTarget::default(),
            maximal_intent: true,
        }
    }
}

/// All metrics for one rep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepAnalytics {
    pub rep_index: u32,
    pub status: DataStatus,
    pub velocity: VelocityMetrics,
    pub tempo: TempoAnalysis,
    pub work: WorkMetrics,
    pub quality: QualityAssessment,
    /// `None` when there is no reference velocity
    pub effort: Option<EffortEstimate>,
}

/// Computes [`RepAnalytics`] from a rep's frames.
pub struct RepAnalyticsComputer {
    config: VbtConfig,
}

impl RepAnalyticsComputer {
    /// Create with the given configuration.
    pub fn new(config: VbtConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VbtConfig {
        &self.config
    }

    /// Compute all metrics for a rep.
    ///
    /// An empty rep yields neutral metrics with `DataStatus::InsufficientData`.
    pub fn compute(&self, rep: &Rep, ctx: &RepContext) -> VbtResult<RepAnalytics> {
        if rep.is_empty() {
            tracing::debug!("Rep {} has no frames, returning neutral analytics", rep.index);
            return Ok(self.neutral(rep, ctx));
        }

        let velocity = velocity_metrics(rep, ctx.reference_velocity, &self.config.velocity_zones);
        let tempo = analyze_tempo(rep, &ctx.tempo_target);
        let work = work_metrics(rep, self.config.sampling.frame_interval_secs);
        let quality = assess_quality(rep, ctx.reference_position, &self.config.rep_quality);
        let effort = velocity
            .velocity_loss_percent
            .map(|loss| estimate_effort(loss, ctx.maximal_intent, &self.config.effort))
            .transpose()?;

        tracing::debug!(
            "Rep {}: mean {:.3} m/s, loss {:?}, quality {}",
            rep.index,
            velocity.mean_concentric,
            velocity.velocity_loss_percent,
            quality.quality
        );

        Ok(RepAnalytics {
            rep_index: rep.index,
            status: DataStatus::Computed,
            velocity,
            tempo,
            work,
            quality,
            effort,
        })
    }

    fn neutral(&self, rep: &Rep, ctx: &RepContext) -> RepAnalytics {
        RepAnalytics {
            rep_index: rep.index,
            status: DataStatus::InsufficientData,
            velocity: VelocityMetrics::default(),
            tempo: TempoAnalysis {
                actual: TempoTarget::new(0.0, 0.0, 0.0, 0.0),
                target: ctx.tempo_target,
                deviations: [0.0; 4],
                compliance_percent: 0.0,
            },
            work: WorkMetrics::default(),
            quality: QualityAssessment {
                quality: RepQuality::Complete,
                rom_percent: 0.0,
                stall_detected: false,
                stall_duration: 0.0,
                reversal_detected: false,
            },
            effort: None,
        }
    }
}

impl Default for RepAnalyticsComputer {
    fn default() -> Self {
        Self::new(VbtConfig::default())
    }
}
