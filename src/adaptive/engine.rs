//! Intra-workout decisions: next-set weight, rest and termination.
//!
//! Decision order after each set:
//! 1. junk-volume stop (overrides everything else)
//! 2. plan exhausted: bonus set or complete
//! 3. weight change from velocity loss vs. target
//! 4. rest from velocity loss, floored when reps are dropping

use serde::{Deserialize, Serialize};

use super::state::{
    AdaptiveSessionState, AdjustmentKind, ReadinessZone, ReasonCode, SetPerformance,
};
use crate::config::{AdaptiveThresholds, VbtConfig};
use crate::error::{VbtError, VbtResult};
use crate::prescription::{AdaptiveOptions, ExercisePrescription, RepRange, VelocityLossTarget};

/// Recommendation for the next set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRecommendation {
    pub next_weight: f64,
    /// `next_weight` minus the weight just lifted
    pub weight_change: f64,
    pub rest_seconds: u32,
    pub target_reps: RepRange,
    /// Advisory: further sets are junk volume
    pub should_stop: bool,
    /// No more planned sets
    pub exercise_complete: bool,
    pub offer_bonus_set: bool,
    pub remaining_sets: u32,
    /// Primary reason first
    pub reasons: Vec<ReasonCode>,
}

/// Recovery between sets, judged from first-rep velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryStatus {
    /// At least 90% of set 1
    Recovered,
    /// 85-90% of set 1
    AlmostRecovered,
    NotRecovered,
}

impl RecoveryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RecoveryStatus::Recovered => "Recovered",
            RecoveryStatus::AlmostRecovered => "Almost Recovered",
            RecoveryStatus::NotRecovered => "Not Yet Recovered",
        }
    }
}

impl std::fmt::Display for RecoveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Adaptive intra-workout engine.
pub struct AdaptiveEngine {
    config: VbtConfig,
}

impl AdaptiveEngine {
    /// Create with the given configuration.
    pub fn new(config: VbtConfig) -> Self {
        Self { config }
    }

    /// Start an exercise.
    pub fn start_exercise(&self, prescription: &ExercisePrescription) -> VbtResult<AdaptiveSessionState> {
        if prescription.sets == 0 {
            return Err(VbtError::InvalidInput(format!(
                "{} has no planned sets",
                prescription.exercise_id
            )));
        }
        if !prescription.increment.is_finite() || prescription.increment <= 0.0 {
            return Err(VbtError::InvalidInput(format!(
                "{} has a non-positive increment",
                prescription.exercise_id
            )));
        }

        let mut state = AdaptiveSessionState::new(prescription);
        state.current_weight = self.config.equipment.clamp(prescription.weight);
        state.planned_weight = state.current_weight;
        tracing::debug!(
            "Started {} at {} for {} sets",
            state.exercise_id,
            state.current_weight,
            state.planned_sets
        );
        Ok(state)
    }

    /// Record a completed set and decide what happens next.
    pub fn record_set(
        &self,
        state: &mut AdaptiveSessionState,
        performance: SetPerformance,
    ) -> SetRecommendation {
        let thresholds = &self.config.adaptive;
        state.push_set(performance);

        if state.completed_sets() == 1 {
            state.readiness = readiness_zone(
                performance.first_rep_velocity,
                state.expected_velocity,
                thresholds,
            );
        }

        let junk = state
            .baseline()
            .filter(|_| state.completed_sets() > 1)
            .and_then(|baseline| junk_volume_reason(baseline, &performance, thresholds));

        if let Some(reason) = junk {
            tracing::info!(
                "Stopping {} after set {}: {}",
                state.exercise_id,
                performance.set_number,
                reason
            );
            state.stopped = true;
            state.bonus_offered = false;
            let remaining = state.remaining_sets() as f64;
            state.log(AdjustmentKind::Stop, remaining, 0.0, reason);
            return SetRecommendation {
                next_weight: state.current_weight,
                weight_change: 0.0,
                rest_seconds: 0,
                target_reps: state.planned_reps,
                should_stop: true,
                exercise_complete: true,
                offer_bonus_set: false,
                remaining_sets: 0,
                reasons: vec![reason],
            };
        }

        if !state.options.enabled {
            return SetRecommendation {
                next_weight: state.current_weight,
                weight_change: 0.0,
                rest_seconds: state.base_rest_seconds,
                target_reps: state.planned_reps,
                should_stop: false,
                exercise_complete: state.remaining_sets() == 0,
                offer_bonus_set: false,
                remaining_sets: state.remaining_sets(),
                reasons: vec![ReasonCode::AdaptationDisabled],
            };
        }

        let (rest_seconds, rest_reasons) = self.next_rest(state, &performance);

        if state.remaining_sets() == 0 {
            let eligible = bonus_set_eligible(
                &state.options,
                state.completed_sets(),
                &performance,
                &state.velocity_loss_target,
                thresholds,
            );
            state.bonus_offered = eligible;
            let reason = if eligible {
                ReasonCode::BonusSetEligible
            } else {
                ReasonCode::PlanComplete
            };
            tracing::debug!("{} plan exhausted: {}", state.exercise_id, reason);
            let mut reasons = vec![reason];
            if eligible {
                self.apply_rest(state, rest_seconds, &rest_reasons);
                reasons.extend(rest_reasons);
            }
            return SetRecommendation {
                next_weight: state.current_weight,
                weight_change: 0.0,
                rest_seconds: if eligible { rest_seconds } else { 0 },
                target_reps: state.planned_reps,
                should_stop: false,
                exercise_complete: !eligible,
                offer_bonus_set: eligible,
                remaining_sets: 0,
                reasons,
            };
        }

        let (steps, weight_reason) = weight_steps(
            performance.velocity_loss,
            &state.velocity_loss_target,
            thresholds.velocity_loss_tolerance,
        );
        let before = state.current_weight;
        let next_weight = self
            .config
            .equipment
            .clamp(before + steps as f64 * state.increment);
        if next_weight != before {
            state.current_weight = next_weight;
            state.log(AdjustmentKind::Weight, before, next_weight, weight_reason);
            tracing::info!(
                "{}: weight {} -> {} ({})",
                state.exercise_id,
                before,
                next_weight,
                weight_reason
            );
        }

        self.apply_rest(state, rest_seconds, &rest_reasons);

        let mut reasons = vec![weight_reason];
        reasons.extend(rest_reasons);

        SetRecommendation {
            next_weight,
            weight_change: next_weight - performance.weight,
            rest_seconds,
            target_reps: state.planned_reps,
            should_stop: false,
            exercise_complete: false,
            offer_bonus_set: false,
            remaining_sets: state.remaining_sets(),
            reasons,
        }
    }

    /// Accept an offered bonus set; extends the plan by one set.
    pub fn accept_bonus_set(&self, state: &mut AdaptiveSessionState) -> bool {
        if !state.bonus_offered || state.stopped {
            return false;
        }
        let before = state.adjusted_sets;
        state.adjusted_sets += 1;
        state.bonus_offered = false;
        state.log(
            AdjustmentKind::Sets,
            before as f64,
            state.adjusted_sets as f64,
            ReasonCode::BonusSetEligible,
        );
        true
    }

    /// Compare a first-rep velocity with set 1's. `None` before set 1.
    pub fn recovery_status(
        &self,
        state: &AdaptiveSessionState,
        current_first_rep_velocity: f64,
    ) -> Option<RecoveryStatus> {
        let baseline = state.baseline()?.first_rep_velocity.filter(|v| *v > 0.0)?;
        let ratio = current_first_rep_velocity / baseline;
        let t = &self.config.adaptive;
        Some(if ratio >= t.recovered_ratio {
            RecoveryStatus::Recovered
        } else if ratio >= t.almost_recovered_ratio {
            RecoveryStatus::AlmostRecovered
        } else {
            RecoveryStatus::NotRecovered
        })
    }

    /// Reps expected in `set_number` given set 1's reps and the rest taken.
    pub fn expected_reps(&self, baseline_reps: u32, set_number: u32, rest_seconds: u32) -> f64 {
        let retention = self.config.rest_retention.retention_for_rest(rest_seconds);
        let exponent = set_number.saturating_sub(1) as i32;
        baseline_reps as f64 * retention.powi(exponent)
    }

    fn next_rest(
        &self,
        state: &AdaptiveSessionState,
        performance: &SetPerformance,
    ) -> (u32, Vec<ReasonCode>) {
        let t = &self.config.adaptive;
        let mut reasons = Vec::new();
        let mut rest = state.base_rest_seconds;

        if let Some(loss) = performance.velocity_loss {
            if loss > t.rest_high_loss_threshold {
                rest += t.rest_high_loss_extra_secs;
                reasons.push(ReasonCode::HighVelocityLoss);
            } else if loss > t.rest_moderate_loss_threshold {
                rest += t.rest_moderate_loss_extra_secs;
                reasons.push(ReasonCode::ModerateVelocityLoss);
            }
        }

        if let Some(baseline) = state.baseline().filter(|_| state.completed_sets() > 1) {
            if rep_drop_percent(baseline.reps, performance.reps) > t.rep_drop_warning_percent {
                rest = rest.max(t.minimum_rest_floor_secs);
                reasons.push(ReasonCode::RepDropWarning);
            }
        }

        (rest, reasons)
    }

    fn apply_rest(&self, state: &mut AdaptiveSessionState, rest: u32, reasons: &[ReasonCode]) {
        if rest != state.current_rest_seconds {
            let before = state.current_rest_seconds as f64;
            let reason = reasons.last().copied().unwrap_or(ReasonCode::OnTarget);
            state.current_rest_seconds = rest;
            state.log(AdjustmentKind::Rest, before, rest as f64, reason);
        }
    }
}

impl Default for AdaptiveEngine {
    fn default() -> Self {
        Self::new(VbtConfig::default())
    }
}

/// Percentage drop from `baseline` to `current`; 0 for an empty baseline.
fn rep_drop_percent(baseline: u32, current: u32) -> f64 {
    if baseline == 0 {
        return 0.0;
    }
    (baseline as f64 - current as f64) / baseline as f64 * 100.0
}

/// Junk-volume check against the first set.
pub fn junk_volume_reason(
    baseline: &SetPerformance,
    current: &SetPerformance,
    thresholds: &AdaptiveThresholds,
) -> Option<ReasonCode> {
    if rep_drop_percent(baseline.reps, current.reps) >= thresholds.junk_rep_drop_percent {
        return Some(ReasonCode::JunkVolumeReps);
    }

    if let (Some(base), Some(now)) = (baseline.first_rep_velocity, current.first_rep_velocity) {
        if base > 0.0 && (base - now) / base * 100.0 >= thresholds.junk_velocity_drop_percent {
            return Some(ReasonCode::JunkVolumeVelocity);
        }
    }

    None
}

/// Whether a bonus set should be offered once the plan is exhausted.
///
/// Junk volume is checked before this is reached.
pub fn bonus_set_eligible(
    options: &AdaptiveOptions,
    completed_sets: u32,
    performance: &SetPerformance,
    target: &VelocityLossTarget,
    thresholds: &AdaptiveThresholds,
) -> bool {
    options.allow_bonus_sets
        && completed_sets < options.max_sets
        && performance
            .rir
            .is_some_and(|rir| rir >= thresholds.bonus_min_rir)
        && performance
            .velocity_loss
            .is_some_and(|loss| target.contains(loss))
}

/// Weight steps (+1, 0, -1) from velocity loss vs. the target band.
pub fn weight_steps(
    velocity_loss: Option<f64>,
    target: &VelocityLossTarget,
    tolerance: f64,
) -> (i32, ReasonCode) {
    match velocity_loss {
        None => (0, ReasonCode::InsufficientData),
        Some(loss) if loss < target.min - tolerance => (1, ReasonCode::VelocityLossBelowTarget),
        Some(loss) if loss > target.max + tolerance => (-1, ReasonCode::VelocityLossAboveTarget),
        Some(_) => (0, ReasonCode::OnTarget),
    }
}

fn readiness_zone(
    first_rep_velocity: Option<f64>,
    expected: Option<f64>,
    thresholds: &AdaptiveThresholds,
) -> ReadinessZone {
    match (first_rep_velocity, expected.filter(|e| *e > 0.0)) {
        (Some(actual), Some(expected)) => {
            let ratio = actual / expected;
            if ratio >= thresholds.readiness_ready_ratio {
                ReadinessZone::Ready
            } else if ratio < thresholds.readiness_fatigued_ratio {
                ReadinessZone::Fatigued
            } else {
                ReadinessZone::Normal
            }
        }
        _ => ReadinessZone::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prescription::{ProgressionScheme, TrainingGoal};

    fn prescription(sets: u32) -> ExercisePrescription {
        ExercisePrescription::for_goal(
            &VbtConfig::default(),
            "lat_pulldown",
            TrainingGoal::Hypertrophy,
            sets,
            100.0,
            ProgressionScheme::Autoregulated,
        )
        .unwrap()
    }

    fn perf(set_number: u32, reps: u32, velocity: f64, loss: f64, rir: f64) -> SetPerformance {
        SetPerformance {
            set_number,
            weight: 100.0,
            reps,
            first_rep_velocity: Some(velocity),
            velocity_loss: Some(loss),
            rir: Some(rir),
            rpe: Some(10.0 - rir),
        }
    }

    #[test]
    fn test_rep_collapse_stops() {
        let engine = AdaptiveEngine::default();
        let mut state = engine.start_exercise(&prescription(4)).unwrap();

        engine.record_set(&mut state, perf(1, 10, 0.60, 25.0, 2.0));
        let rec = engine.record_set(&mut state, perf(2, 4, 0.58, 25.0, 2.0));

        assert!(rec.should_stop);
        assert!(rec.exercise_complete);
        assert_eq!(rec.reasons, vec![ReasonCode::JunkVolumeReps]);
        assert!(state.stopped);
        assert_eq!(state.adjustments.last().unwrap().kind, AdjustmentKind::Stop);
    }

    #[test]
    fn test_junk_volume_overrides_weight_increase() {
        let engine = AdaptiveEngine::default();
        let mut state = engine.start_exercise(&prescription(4)).unwrap();

        engine.record_set(&mut state, perf(1, 10, 0.60, 25.0, 2.0));
        // 5% loss alone would add weight
        let rec = engine.record_set(&mut state, perf(2, 5, 0.58, 5.0, 4.0));

        assert!(rec.should_stop);
        assert_eq!(rec.next_weight, 100.0);
        assert_eq!(rec.weight_change, 0.0);
    }

    #[test]
    fn test_velocity_collapse_stops() {
        let engine = AdaptiveEngine::default();
        let mut state = engine.start_exercise(&prescription(4)).unwrap();

        engine.record_set(&mut state, perf(1, 10, 0.60, 25.0, 2.0));
        let rec = engine.record_set(&mut state, perf(2, 9, 0.35, 25.0, 2.0));
        assert!(rec.should_stop);
        assert_eq!(rec.reasons, vec![ReasonCode::JunkVolumeVelocity]);
    }

    #[test]
    fn test_low_loss_adds_weight() {
        let engine = AdaptiveEngine::default();
        let mut state = engine.start_exercise(&prescription(3)).unwrap();

        let rec = engine.record_set(&mut state, perf(1, 10, 0.60, 12.0, 4.0));
        assert_eq!(rec.next_weight, 105.0);
        assert_eq!(rec.weight_change, 5.0);
        assert_eq!(rec.reasons[0], ReasonCode::VelocityLossBelowTarget);
        assert_eq!(state.current_weight, 105.0);
        let log = &state.adjustments[0];
        assert_eq!((log.before, log.after), (100.0, 105.0));
    }

    #[test]
    fn test_high_loss_drops_weight_and_adds_rest() {
        let engine = AdaptiveEngine::default();
        let mut state = engine.start_exercise(&prescription(3)).unwrap();

        let rec = engine.record_set(&mut state, perf(1, 10, 0.60, 45.0, 0.0));
        assert_eq!(rec.next_weight, 95.0);
        assert_eq!(rec.rest_seconds, 120 + 60);
        assert!(rec.reasons.contains(&ReasonCode::HighVelocityLoss));
    }

    #[test]
    fn test_within_tolerance_keeps_weight() {
        let engine = AdaptiveEngine::default();
        let mut state = engine.start_exercise(&prescription(3)).unwrap();

        // Target 20-30 with 2.5 tolerance
        let rec = engine.record_set(&mut state, perf(1, 10, 0.60, 18.0, 3.0));
        assert_eq!(rec.next_weight, 100.0);
        assert_eq!(rec.reasons[0], ReasonCode::OnTarget);
        assert_eq!(rec.rest_seconds, 120);
        assert!(state.adjustments.is_empty());
    }

    #[test]
    fn test_moderate_loss_rest() {
        let engine = AdaptiveEngine::default();
        let mut state = engine.start_exercise(&prescription(3)).unwrap();
        let rec = engine.record_set(&mut state, perf(1, 10, 0.60, 32.0, 1.0));
        assert_eq!(rec.rest_seconds, 150);
    }

    #[test]
    fn test_rep_drop_floors_rest() {
        let engine = AdaptiveEngine::default();
        let mut state = engine.start_exercise(&prescription(4)).unwrap();

        engine.record_set(&mut state, perf(1, 10, 0.60, 25.0, 2.0));
        let rec = engine.record_set(&mut state, perf(2, 7, 0.58, 25.0, 2.0));
        assert!(!rec.should_stop);
        assert_eq!(rec.rest_seconds, 180);
        assert!(rec.reasons.contains(&ReasonCode::RepDropWarning));
    }

    #[test]
    fn test_bonus_set_offered_and_accepted() {
        let engine = AdaptiveEngine::default();
        let mut state = engine.start_exercise(&prescription(2)).unwrap();

        engine.record_set(&mut state, perf(1, 10, 0.60, 25.0, 2.0));
        let rec = engine.record_set(&mut state, perf(2, 10, 0.59, 24.0, 2.0));
        assert!(rec.offer_bonus_set);
        assert!(!rec.exercise_complete);

        assert!(engine.accept_bonus_set(&mut state));
        assert_eq!(state.adjusted_sets, 3);
        assert_eq!(state.remaining_sets(), 1);

        let rec = engine.record_set(&mut state, perf(3, 9, 0.58, 26.0, 2.0));
        assert!(rec.offer_bonus_set);
    }

    #[test]
    fn test_plan_complete_without_bonus() {
        let engine = AdaptiveEngine::default();
        let mut state = engine.start_exercise(&prescription(2)).unwrap();

        engine.record_set(&mut state, perf(1, 10, 0.60, 25.0, 2.0));
        let rec = engine.record_set(&mut state, perf(2, 9, 0.58, 28.0, 1.0));
        assert!(!rec.offer_bonus_set);
        assert!(rec.exercise_complete);
        assert_eq!(rec.reasons, vec![ReasonCode::PlanComplete]);
        assert!(!engine.accept_bonus_set(&mut state));
    }

    #[test]
    fn test_bonus_respects_max_sets() {
        let options = AdaptiveOptions {
            max_sets: 3,
            ..AdaptiveOptions::default()
        };
        let target = VelocityLossTarget::new(20.0, 30.0);
        let t = AdaptiveThresholds::default();
        let p = perf(3, 10, 0.6, 25.0, 3.0);
        assert!(!bonus_set_eligible(&options, 3, &p, &target, &t));
        assert!(bonus_set_eligible(&options, 2, &p, &target, &t));
    }

    #[test]
    fn test_recovery_status() {
        let engine = AdaptiveEngine::default();
        let mut state = engine.start_exercise(&prescription(3)).unwrap();
        assert!(engine.recovery_status(&state, 0.5).is_none());

        engine.record_set(&mut state, perf(1, 10, 0.60, 25.0, 2.0));
        assert_eq!(engine.recovery_status(&state, 0.57), Some(RecoveryStatus::Recovered));
        assert_eq!(
            engine.recovery_status(&state, 0.52),
            Some(RecoveryStatus::AlmostRecovered)
        );
        assert_eq!(engine.recovery_status(&state, 0.45), Some(RecoveryStatus::NotRecovered));
        // Query does not touch state
        assert_eq!(state.completed_sets(), 1);
    }

    #[test]
    fn test_expected_reps_compound() {
        let engine = AdaptiveEngine::default();
        assert_eq!(engine.expected_reps(10, 1, 120), 10.0);
        assert!((engine.expected_reps(10, 3, 120) - 8.1).abs() < 1e-9);
        assert!(engine.expected_reps(10, 3, 60) < engine.expected_reps(10, 3, 180));
    }

    #[test]
    fn test_readiness_from_first_set() {
        let engine = AdaptiveEngine::default();
        let mut state = engine
            .start_exercise(&prescription(3).with_expected_velocity(0.70))
            .unwrap();
        engine.record_set(&mut state, perf(1, 10, 0.60, 25.0, 2.0));
        assert_eq!(state.readiness, ReadinessZone::Fatigued);
    }

    #[test]
    fn test_disabled_adaptation_keeps_plan() {
        let engine = AdaptiveEngine::default();
        let mut p = prescription(3);
        p.adaptive.enabled = false;
        let mut state = engine.start_exercise(&p).unwrap();
        let rec = engine.record_set(&mut state, perf(1, 10, 0.60, 5.0, 5.0));
        assert_eq!(rec.next_weight, 100.0);
        assert_eq!(rec.reasons, vec![ReasonCode::AdaptationDisabled]);
    }

    #[test]
    fn test_weight_steps_missing_loss() {
        let target = VelocityLossTarget::new(20.0, 30.0);
        assert_eq!(weight_steps(None, &target, 2.5), (0, ReasonCode::InsufficientData));
        assert_eq!(
            weight_steps(Some(17.4), &target, 2.5),
            (1, ReasonCode::VelocityLossBelowTarget)
        );
        assert_eq!(weight_steps(Some(17.5), &target, 2.5), (0, ReasonCode::OnTarget));
    }
}
