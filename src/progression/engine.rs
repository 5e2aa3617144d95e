//! Session-to-session progression engine.
//!
//! Decides next-session weight per exercise from a bounded history of
//! session summaries, tracks consecutive failures, and schedules deloads.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::deload::{
    scan_history, strictly_decreasing, DeloadTrigger, DeloadTriggerKind, DeloadWeek,
};
use super::history::{ExerciseSessionSummary, SessionHistory};
use crate::config::{VbtConfig, TABLES_VERSION};
use crate::error::{VbtError, VbtResult};
use crate::prescription::{ExercisePrescription, ProgressionScheme, TrainingLevel};

/// Direction of the next load change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionAction {
    Increase,
    Maintain,
    Decrease,
}

impl ProgressionAction {
    pub fn label(&self) -> &'static str {
        match self {
            ProgressionAction::Increase => "increase",
            ProgressionAction::Maintain => "maintain",
            ProgressionAction::Decrease => "decrease",
        }
    }
}

impl std::fmt::Display for ProgressionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Machine-readable reason for a progression decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionReason {
    NoHistory,
    /// Consecutive failures reached the deload threshold
    ConsecutiveFailures,
    MinimumRepsHit,
    MinimumRepsMissed,
    TopOfRangeReached,
    /// Top of range hit, but too close to failure
    TopOfRangeHighEffort,
    WithinRange,
    VelocityLossWellBelowTarget,
    VelocityLossTrendingDown,
    VelocityLossWellAboveTarget,
    VelocityLossOnTarget,
    NoVelocityData,
}

impl ProgressionReason {
    pub fn code(&self) -> &'static str {
        match self {
            ProgressionReason::NoHistory => "no_history",
            ProgressionReason::ConsecutiveFailures => "consecutive_failures",
            ProgressionReason::MinimumRepsHit => "minimum_reps_hit",
            ProgressionReason::MinimumRepsMissed => "minimum_reps_missed",
            ProgressionReason::TopOfRangeReached => "top_of_range_reached",
            ProgressionReason::TopOfRangeHighEffort => "top_of_range_high_effort",
            ProgressionReason::WithinRange => "within_range",
            ProgressionReason::VelocityLossWellBelowTarget => "velocity_loss_well_below_target",
            ProgressionReason::VelocityLossTrendingDown => "velocity_loss_trending_down",
            ProgressionReason::VelocityLossWellAboveTarget => "velocity_loss_well_above_target",
            ProgressionReason::VelocityLossOnTarget => "velocity_loss_on_target",
            ProgressionReason::NoVelocityData => "no_velocity_data",
        }
    }
}

impl std::fmt::Display for ProgressionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Next-session load decision for one exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionDecision {
    pub exercise_id: String,
    pub action: ProgressionAction,
    /// Decrease forced by repeated failures
    pub is_deload: bool,
    pub current_weight: f64,
    pub new_weight: f64,
    pub reason: ProgressionReason,
}

/// Direction of weight across the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Flat,
    Down,
}

/// Change from the oldest to the newest recorded session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionTrend {
    pub sessions: usize,
    pub weight_direction: TrendDirection,
    /// Change in reps per set (%)
    pub reps_per_set_change_percent: f64,
    /// Change in velocity loss (percentage points), when both ends have it
    pub velocity_loss_change: Option<f64>,
    pub improving: bool,
}

/// Weekly set count against the volume landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeStatus {
    /// Below minimum effective volume
    BelowMinimum,
    /// Between MEV and MAV
    Productive,
    /// Between MAV and MRV
    High,
    /// Beyond maximum recoverable volume
    Excessive,
}

/// Serializable snapshot of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionState {
    pub tables_version: u32,
    pub level: TrainingLevel,
    pub weeks_since_deload: u32,
    pub histories: BTreeMap<String, SessionHistory>,
    pub failure_counts: BTreeMap<String, u32>,
}

impl ProgressionState {
    pub fn to_json(&self) -> VbtResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> VbtResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Progression engine over all exercises of one lifter.
pub struct ProgressionEngine {
    config: VbtConfig,
    level: TrainingLevel,
    weeks_since_deload: u32,
    histories: BTreeMap<String, SessionHistory>,
    failure_counts: BTreeMap<String, u32>,
}

impl ProgressionEngine {
    pub fn new(config: VbtConfig, level: TrainingLevel) -> Self {
        Self {
            config,
            level,
            weeks_since_deload: 0,
            histories: BTreeMap::new(),
            failure_counts: BTreeMap::new(),
        }
    }

    /// Restore an engine from an exported snapshot.
    pub fn from_state(config: VbtConfig, state: ProgressionState) -> Self {
        if state.tables_version != TABLES_VERSION {
            tracing::warn!(
                "Progression state written for tables v{}, running v{}",
                state.tables_version,
                TABLES_VERSION
            );
        }
        Self {
            config,
            level: state.level,
            weeks_since_deload: state.weeks_since_deload,
            histories: state.histories,
            failure_counts: state.failure_counts,
        }
    }

    pub fn export_state(&self) -> ProgressionState {
        ProgressionState {
            tables_version: TABLES_VERSION,
            level: self.level,
            weeks_since_deload: self.weeks_since_deload,
            histories: self.histories.clone(),
            failure_counts: self.failure_counts.clone(),
        }
    }

    pub fn level(&self) -> TrainingLevel {
        self.level
    }

    pub fn set_level(&mut self, level: TrainingLevel) {
        self.level = level;
    }

    pub fn weeks_since_deload(&self) -> u32 {
        self.weeks_since_deload
    }

    pub fn history(&self, exercise_id: &str) -> Option<&SessionHistory> {
        self.histories.get(exercise_id)
    }

    pub fn failure_count(&self, exercise_id: &str) -> u32 {
        self.failure_counts.get(exercise_id).copied().unwrap_or(0)
    }

    /// Record one exercise session.
    pub fn record_session(&mut self, summary: ExerciseSessionSummary) -> VbtResult<()> {
        if !summary.weight.is_finite() || summary.weight < 0.0 {
            return Err(VbtError::InvalidInput(format!(
                "session weight must be non-negative, got {}",
                summary.weight
            )));
        }
        if summary.sets == 0 {
            return Err(VbtError::InvalidInput(format!(
                "{} session has no sets",
                summary.exercise_id
            )));
        }

        let failures = self
            .failure_counts
            .entry(summary.exercise_id.clone())
            .or_insert(0);
        if summary.hit_minimum {
            *failures = 0;
        } else {
            *failures += 1;
        }
        tracing::debug!(
            "Recorded {} on {}: {:.1} reps/set, failures {}",
            summary.exercise_id,
            summary.date,
            summary.reps_per_set(),
            failures
        );

        let capacity = self.config.progression.history_capacity;
        self.histories
            .entry(summary.exercise_id.clone())
            .or_insert_with(|| SessionHistory::new(capacity))
            .push(summary);
        Ok(())
    }

    /// Next-session decision for a prescription.
    pub fn decide(&self, prescription: &ExercisePrescription) -> ProgressionDecision {
        let id = &prescription.exercise_id;
        let increment = if prescription.increment > 0.0 {
            prescription.increment
        } else {
            self.config.progression.default_increment
        };
        let current = prescription.weight;

        let Some(history) = self.histories.get(id).filter(|h| !h.is_empty()) else {
            return self.decision(
                prescription,
                ProgressionAction::Maintain,
                false,
                increment,
                ProgressionReason::NoHistory,
            );
        };

        if self.failure_count(id) >= self.config.progression.failure_deload_threshold {
            return self.decision(
                prescription,
                ProgressionAction::Decrease,
                true,
                increment,
                ProgressionReason::ConsecutiveFailures,
            );
        }

        let (action, is_deload, reason) = match prescription.scheme {
            ProgressionScheme::Linear => linear_step(history),
            ProgressionScheme::Double => {
                self.double_step(history, prescription, self.failure_count(id))
            }
            ProgressionScheme::Autoregulated => self.autoregulated_step(history, prescription),
        };

        let decision = self.decision(prescription, action, is_deload, increment, reason);
        tracing::info!(
            "{} ({}): {} {} -> {} ({})",
            id,
            prescription.scheme,
            decision.action,
            current,
            decision.new_weight,
            decision.reason
        );
        decision
    }

    fn decision(
        &self,
        prescription: &ExercisePrescription,
        action: ProgressionAction,
        is_deload: bool,
        increment: f64,
        reason: ProgressionReason,
    ) -> ProgressionDecision {
        let current = prescription.weight;
        let limits = &self.config.equipment;
        let new_weight = match action {
            ProgressionAction::Increase => limits.clamp(current + increment),
            ProgressionAction::Decrease => limits.clamp(current - increment),
            ProgressionAction::Maintain => limits.clamp(current),
        };
        if is_deload {
            tracing::info!(
                "{}: deload {} -> {} ({})",
                prescription.exercise_id,
                current,
                new_weight,
                reason
            );
        }
        ProgressionDecision {
            exercise_id: prescription.exercise_id.clone(),
            action,
            is_deload,
            current_weight: current,
            new_weight,
            reason,
        }
    }

    fn double_step(
        &self,
        history: &SessionHistory,
        prescription: &ExercisePrescription,
        failures: u32,
    ) -> (ProgressionAction, bool, ProgressionReason) {
        let Some(latest) = history.latest() else {
            return (ProgressionAction::Maintain, false, ProgressionReason::NoHistory);
        };
        let reps = latest.reps_per_set();
        let range = prescription.rep_range;

        if reps >= range.max as f64 {
            if latest
                .rir
                .is_some_and(|rir| rir >= self.config.progression.double_min_rir)
            {
                (ProgressionAction::Increase, false, ProgressionReason::TopOfRangeReached)
            } else {
                (ProgressionAction::Maintain, false, ProgressionReason::TopOfRangeHighEffort)
            }
        } else if reps >= range.min as f64 {
            (ProgressionAction::Maintain, false, ProgressionReason::WithinRange)
        } else if failures >= self.config.progression.double_deload_misses {
            (ProgressionAction::Decrease, true, ProgressionReason::MinimumRepsMissed)
        } else {
            (ProgressionAction::Maintain, false, ProgressionReason::MinimumRepsMissed)
        }
    }

    fn autoregulated_step(
        &self,
        history: &SessionHistory,
        prescription: &ExercisePrescription,
    ) -> (ProgressionAction, bool, ProgressionReason) {
        let settings = &self.config.progression;
        let Some(latest) = history.latest() else {
            return (ProgressionAction::Maintain, false, ProgressionReason::NoHistory);
        };
        let Some(loss) = latest.velocity_loss else {
            return (ProgressionAction::Maintain, false, ProgressionReason::NoVelocityData);
        };
        let target = prescription.velocity_loss_target;

        if loss < target.min - settings.autoregulated_under_margin {
            return (
                ProgressionAction::Increase,
                false,
                ProgressionReason::VelocityLossWellBelowTarget,
            );
        }
        if velocity_loss_trending_down(history, settings.trend_window, settings.autoregulated_min_rir) {
            return (
                ProgressionAction::Increase,
                false,
                ProgressionReason::VelocityLossTrendingDown,
            );
        }
        if loss > target.max + settings.autoregulated_over_margin {
            return (
                ProgressionAction::Decrease,
                false,
                ProgressionReason::VelocityLossWellAboveTarget,
            );
        }
        (ProgressionAction::Maintain, false, ProgressionReason::VelocityLossOnTarget)
    }

    /// Oldest-to-newest change across an exercise's history. `None` under two sessions.
    pub fn trend(&self, exercise_id: &str) -> Option<ProgressionTrend> {
        let history = self.histories.get(exercise_id)?;
        if history.len() < 2 {
            return None;
        }
        let first = history.oldest()?;
        let last = history.latest()?;

        let weight_direction = if last.weight > first.weight {
            TrendDirection::Up
        } else if last.weight < first.weight {
            TrendDirection::Down
        } else {
            TrendDirection::Flat
        };

        let first_reps = first.reps_per_set();
        let reps_per_set_change_percent = if first_reps > 0.0 {
            (last.reps_per_set() - first_reps) / first_reps * 100.0
        } else {
            0.0
        };

        let velocity_loss_change = match (first.velocity_loss, last.velocity_loss) {
            (Some(a), Some(b)) => Some(b - a),
            _ => None,
        };

        let improving = match weight_direction {
            TrendDirection::Up => true,
            TrendDirection::Down => false,
            TrendDirection::Flat => {
                reps_per_set_change_percent > 0.0
                    || velocity_loss_change.is_some_and(|change| change < 0.0)
            }
        };

        Some(ProgressionTrend {
            sessions: history.len(),
            weight_direction,
            reps_per_set_change_percent,
            velocity_loss_change,
            improving,
        })
    }

    /// Weekly set count for one muscle group against this level's landmarks.
    pub fn volume_status(&self, weekly_sets: u32) -> VbtResult<VolumeStatus> {
        let landmark = self.config.volume.get(self.level)?;
        Ok(if weekly_sets < landmark.mev {
            VolumeStatus::BelowMinimum
        } else if weekly_sets <= landmark.mav {
            VolumeStatus::Productive
        } else if weekly_sets <= landmark.mrv {
            VolumeStatus::High
        } else {
            VolumeStatus::Excessive
        })
    }

    /// Count one more training week since the last deload.
    pub fn advance_week(&mut self) {
        self.weeks_since_deload += 1;
    }

    /// Scan for deload triggers: program-wide time-based first, then per exercise.
    pub fn check_deload_triggers(&self) -> Vec<DeloadTrigger> {
        let settings = &self.config.deload;
        let mut triggers = Vec::new();

        if self.weeks_since_deload >= settings.weeks_for(self.level) {
            triggers.push(DeloadTrigger {
                kind: DeloadTriggerKind::TimeBased,
                exercise_id: None,
            });
        }

        for (exercise_id, history) in &self.histories {
            for kind in scan_history(history, settings) {
                triggers.push(DeloadTrigger {
                    kind,
                    exercise_id: Some(exercise_id.clone()),
                });
            }
        }

        triggers
    }

    /// Start a deload week: resets the week counter and clears all failure counters.
    pub fn create_deload_week(&mut self, start: NaiveDate) -> DeloadWeek {
        let triggers = self.check_deload_triggers();
        let week = DeloadWeek::new(start, &self.config.deload, triggers);
        tracing::info!(
            "Deload week {} to {} after {} weeks ({} triggers)",
            week.start,
            week.end,
            self.weeks_since_deload,
            week.triggers.len()
        );
        self.weeks_since_deload = 0;
        self.failure_counts.clear();
        week
    }
}

impl Default for ProgressionEngine {
    fn default() -> Self {
        Self::new(VbtConfig::default(), TrainingLevel::default())
    }
}

/// Linear: add weight whenever average reps per set reached the minimum.
fn linear_step(history: &SessionHistory) -> (ProgressionAction, bool, ProgressionReason) {
    match history.latest() {
        Some(latest) if latest.hit_minimum => {
            (ProgressionAction::Increase, false, ProgressionReason::MinimumRepsHit)
        }
        Some(_) => (ProgressionAction::Maintain, false, ProgressionReason::MinimumRepsMissed),
        None => (ProgressionAction::Maintain, false, ProgressionReason::NoHistory),
    }
}

/// Velocity loss fell strictly over the last `window` sessions and the
/// newest session left at least `min_rir` in reserve.
pub fn velocity_loss_trending_down(history: &SessionHistory, window: usize, min_rir: f64) -> bool {
    if window < 2 || history.len() < window {
        return false;
    }
    let losses: Vec<f64> = history.recent(window).filter_map(|s| s.velocity_loss).collect();
    losses.len() == window
        && strictly_decreasing(&losses)
        && history
            .latest()
            .and_then(|s| s.rir)
            .is_some_and(|rir| rir >= min_rir)
}
