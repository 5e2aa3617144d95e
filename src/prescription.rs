//! Exercise prescriptions, training goals and progression schemes.

use serde::{Deserialize, Serialize};

use crate::config::VbtConfig;
use crate::error::{VbtError, VbtResult};

/// Primary adaptation a block of training targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingGoal {
    Strength,
    Hypertrophy,
    Power,
    Endurance,
}

impl TrainingGoal {
    pub fn label(&self) -> &'static str {
        match self {
            TrainingGoal::Strength => "Strength",
            TrainingGoal::Hypertrophy => "Hypertrophy",
            TrainingGoal::Power => "Power",
            TrainingGoal::Endurance => "Endurance",
        }
    }
}

impl std::fmt::Display for TrainingGoal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Lifter training age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl TrainingLevel {
    pub fn label(&self) -> &'static str {
        match self {
            TrainingLevel::Beginner => "Beginner",
            TrainingLevel::Intermediate => "Intermediate",
            TrainingLevel::Advanced => "Advanced",
        }
    }
}

impl std::fmt::Display for TrainingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How load progresses between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionScheme {
    /// Add weight whenever the minimum reps are hit
    Linear,
    /// Add reps up to the top of the range, then add weight
    Double,
    /// Let velocity loss decide
    Autoregulated,
}

impl ProgressionScheme {
    pub fn label(&self) -> &'static str {
        match self {
            ProgressionScheme::Linear => "Linear",
            ProgressionScheme::Double => "Double Progression",
            ProgressionScheme::Autoregulated => "Autoregulated",
        }
    }
}

impl std::fmt::Display for ProgressionScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Inclusive range of reps per set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepRange {
    pub min: u32,
    pub max: u32,
}

impl RepRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, reps: f64) -> bool {
        reps >= self.min as f64 && reps <= self.max as f64
    }
}

/// Inclusive velocity-loss target (%) for a set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityLossTarget {
    pub min: f64,
    pub max: f64,
}

impl VelocityLossTarget {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, loss: f64) -> bool {
        loss >= self.min && loss <= self.max
    }
}

/// Intra-workout adaptation switches for one exercise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveOptions {
    /// Adjust weight and rest between sets
    pub enabled: bool,
    /// Offer an extra set when the planned sets went well
    pub allow_bonus_sets: bool,
    /// Never offer more sets than this
    pub max_sets: u32,
}

impl Default for AdaptiveOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            allow_bonus_sets: true,
            max_sets: 6,
        }
    }
}

/// Plan for one exercise in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExercisePrescription {
    pub exercise_id: String,
    pub goal: TrainingGoal,
    pub sets: u32,
    pub rep_range: RepRange,
    /// Working weight
    pub weight: f64,
    pub velocity_loss_target: VelocityLossTarget,
    pub scheme: ProgressionScheme,
    pub adaptive: AdaptiveOptions,
    /// Weight step for adjustments
    pub increment: f64,
    /// Base rest between sets (seconds)
    pub rest_seconds: u32,
    /// Expected first-rep velocity at this weight, from a load-velocity profile
    pub expected_velocity: Option<f64>,
}

impl ExercisePrescription {
    /// Build a prescription from the goal table defaults.
    pub fn for_goal(
        config: &VbtConfig,
        exercise_id: impl Into<String>,
        goal: TrainingGoal,
        sets: u32,
        weight: f64,
        scheme: ProgressionScheme,
    ) -> VbtResult<Self> {
        if sets == 0 {
            return Err(VbtError::InvalidInput("a prescription needs at least one set".to_string()));
        }
        let profile = config.goals.get(goal)?;

        Ok(Self {
            exercise_id: exercise_id.into(),
            goal,
            sets,
            rep_range: RepRange::new(profile.rep_min, profile.rep_max),
            weight: config.equipment.clamp(weight),
            velocity_loss_target: VelocityLossTarget::new(
                profile.velocity_loss_min,
                profile.velocity_loss_max,
            ),
            scheme,
            adaptive: AdaptiveOptions::default(),
            increment: config.equipment.increment,
            rest_seconds: profile.rest_seconds,
            expected_velocity: None,
        })
    }

    /// Set the rep range.
    pub fn with_rep_range(mut self, min: u32, max: u32) -> Self {
        self.rep_range = RepRange::new(min, max);
        self
    }

    /// Set the expected first-rep velocity.
    pub fn with_expected_velocity(mut self, velocity: f64) -> Self {
        self.expected_velocity = Some(velocity);
        self
    }
}
