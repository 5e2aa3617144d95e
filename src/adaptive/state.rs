//! Per-exercise session state for intra-workout adaptation.

use serde::{Deserialize, Serialize};

use crate::prescription::{AdaptiveOptions, ExercisePrescription, RepRange, VelocityLossTarget};

/// Summary of one completed set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetPerformance {
    /// 1-based set number
    pub set_number: u32,
    pub weight: f64,
    pub reps: u32,
    /// Mean concentric velocity of rep 1 (m/s)
    pub first_rep_velocity: Option<f64>,
    /// Average velocity loss over the set (%)
    pub velocity_loss: Option<f64>,
    /// Reps in reserve at the end of the set
    pub rir: Option<f64>,
    pub rpe: Option<f64>,
}

/// Lifter readiness judged from the first set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessZone {
    /// Faster than expected
    Ready,
    Normal,
    /// Clearly slower than expected
    Fatigued,
    /// No expected velocity or no first set yet
    Unknown,
}

impl ReadinessZone {
    pub fn label(&self) -> &'static str {
        match self {
            ReadinessZone::Ready => "Ready",
            ReadinessZone::Normal => "Normal",
            ReadinessZone::Fatigued => "Fatigued",
            ReadinessZone::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for ReadinessZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Machine-readable reason attached to every decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// Reps fell too far below the first set
    JunkVolumeReps,
    /// First-rep velocity fell too far below the first set
    JunkVolumeVelocity,
    /// Velocity loss under target: the weight is too light
    VelocityLossBelowTarget,
    /// Velocity loss over target: the weight is too heavy
    VelocityLossAboveTarget,
    /// Velocity loss within target
    OnTarget,
    /// Long rest after a very fatiguing set
    HighVelocityLoss,
    /// Extra rest after a fatiguing set
    ModerateVelocityLoss,
    /// Reps dropping: rest floored at the minimum
    RepDropWarning,
    /// Planned sets done, extra set offered
    BonusSetEligible,
    /// Planned sets done
    PlanComplete,
    /// Adaptation disabled for this exercise
    AdaptationDisabled,
    /// Not enough data for a decision
    InsufficientData,
}

impl ReasonCode {
    /// Stable identifier for the presentation layer.
    pub fn code(&self) -> &'static str {
        match self {
            ReasonCode::JunkVolumeReps => "junk_volume_reps",
            ReasonCode::JunkVolumeVelocity => "junk_volume_velocity",
            ReasonCode::VelocityLossBelowTarget => "velocity_loss_below_target",
            ReasonCode::VelocityLossAboveTarget => "velocity_loss_above_target",
            ReasonCode::OnTarget => "on_target",
            ReasonCode::HighVelocityLoss => "high_velocity_loss",
            ReasonCode::ModerateVelocityLoss => "moderate_velocity_loss",
            ReasonCode::RepDropWarning => "rep_drop_warning",
            ReasonCode::BonusSetEligible => "bonus_set_eligible",
            ReasonCode::PlanComplete => "plan_complete",
            ReasonCode::AdaptationDisabled => "adaptation_disabled",
            ReasonCode::InsufficientData => "insufficient_data",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// What an adjustment changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    Weight,
    Rest,
    Sets,
    Stop,
}

/// One entry of the adjustment log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentRecord {
    /// Set after which the adjustment was made
    pub after_set: u32,
    pub kind: AdjustmentKind,
    pub before: f64,
    pub after: f64,
    pub reason: ReasonCode,
}

/// Mutable state for one exercise in one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveSessionState {
    pub exercise_id: String,
    pub planned_weight: f64,
    pub current_weight: f64,
    pub planned_sets: u32,
    /// Planned sets plus accepted bonus sets
    pub adjusted_sets: u32,
    pub planned_reps: RepRange,
    pub velocity_loss_target: VelocityLossTarget,
    /// Weight step for adjustments
    pub increment: f64,
    pub options: AdaptiveOptions,
    /// Prescribed rest before any adjustment (seconds)
    pub base_rest_seconds: u32,
    /// Expected first-rep velocity at the planned weight
    pub expected_velocity: Option<f64>,
    /// Rest recommended before the next set (seconds)
    pub current_rest_seconds: u32,
    /// Completed sets in order; the first is the baseline
    pub sets: Vec<SetPerformance>,
    pub adjustments: Vec<AdjustmentRecord>,
    pub total_reps: u32,
    /// Sum of weight × reps
    pub total_volume: f64,
    pub readiness: ReadinessZone,
    /// Set once a stop has been recommended
    pub stopped: bool,
    /// A bonus set is on offer
    pub bonus_offered: bool,
}

impl AdaptiveSessionState {
    /// Fresh state for a prescription.
    pub fn new(prescription: &ExercisePrescription) -> Self {
        Self {
            exercise_id: prescription.exercise_id.clone(),
            planned_weight: prescription.weight,
            current_weight: prescription.weight,
            planned_sets: prescription.sets,
            adjusted_sets: prescription.sets,
            planned_reps: prescription.rep_range,
            velocity_loss_target: prescription.velocity_loss_target,
            increment: prescription.increment,
            options: prescription.adaptive,
            base_rest_seconds: prescription.rest_seconds,
            expected_velocity: prescription.expected_velocity,
            current_rest_seconds: prescription.rest_seconds,
            sets: Vec::new(),
            adjustments: Vec::new(),
            total_reps: 0,
            total_volume: 0.0,
            readiness: ReadinessZone::Unknown,
            stopped: false,
            bonus_offered: false,
        }
    }

    /// First completed set.
    pub fn baseline(&self) -> Option<&SetPerformance> {
        self.sets.first()
    }

    pub fn completed_sets(&self) -> u32 {
        self.sets.len() as u32
    }

    pub fn remaining_sets(&self) -> u32 {
        self.adjusted_sets.saturating_sub(self.completed_sets())
    }

    pub(crate) fn log(&mut self, kind: AdjustmentKind, before: f64, after: f64, reason: ReasonCode) {
        self.adjustments.push(AdjustmentRecord {
            after_set: self.completed_sets(),
            kind,
            before,
            after,
            reason,
        });
    }

    pub(crate) fn push_set(&mut self, performance: SetPerformance) {
        self.total_reps += performance.reps;
        self.total_volume += performance.weight * performance.reps as f64;
        self.sets.push(performance);
    }
}
