//! Integration tests for session-to-session progression.

use chrono::NaiveDate;
use rustlift::prescription::RepRange;
use rustlift::progression::{ProgressionAction, ProgressionState};
use rustlift::{
    ExercisePrescription, ExerciseSessionSummary, ProgressionEngine, ProgressionScheme,
    TrainingGoal, TrainingLevel, VbtConfig,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
}

fn row(scheme: ProgressionScheme) -> ExercisePrescription {
    ExercisePrescription::for_goal(
        &VbtConfig::default(),
        "seated_row",
        TrainingGoal::Hypertrophy,
        3,
        70.0,
        scheme,
    )
    .unwrap()
    .with_rep_range(8, 12)
}

fn session(d: u32, total_reps: u32) -> ExerciseSessionSummary {
    ExerciseSessionSummary::new("seated_row", day(d), 70.0, 3, total_reps, RepRange::new(8, 12))
}

#[test]
fn test_linear_increase_when_minimum_met() {
    super::init_tracing();
    let mut engine = ProgressionEngine::default();
    engine.record_session(session(2, 27)).unwrap();

    let decision = engine.decide(&row(ProgressionScheme::Linear));
    assert_eq!(decision.action, ProgressionAction::Increase);
    assert_eq!(decision.action.label(), "increase");
    assert_eq!(decision.new_weight, 75.0);
}

#[test]
fn test_second_consecutive_miss_forces_decrease() {
    for scheme in [
        ProgressionScheme::Linear,
        ProgressionScheme::Double,
        ProgressionScheme::Autoregulated,
    ] {
        let mut engine = ProgressionEngine::default();
        let prescription = row(scheme);

        let first = engine.decide(&prescription);
        assert_eq!(first.action, ProgressionAction::Maintain);

        engine.record_session(session(2, 18)).unwrap();
        let second = engine.decide(&prescription);
        assert_ne!(second.action, ProgressionAction::Increase);
        assert!(!second.is_deload);

        engine.record_session(session(4, 19)).unwrap();
        let third = engine.decide(&prescription);
        assert_eq!(third.action, ProgressionAction::Decrease, "{:?}", scheme);
        assert!(third.is_deload);
        assert_eq!(third.new_weight, 65.0);
    }
}

#[test]
fn test_deload_week_clears_failures() {
    let mut engine = ProgressionEngine::default();
    engine.record_session(session(2, 18)).unwrap();
    engine.record_session(session(4, 18)).unwrap();
    engine.record_session(session(6, 18)).unwrap();

    let triggers = engine.check_deload_triggers();
    assert!(triggers
        .iter()
        .any(|t| t.exercise_id.as_deref() == Some("seated_row")));

    let week = engine.create_deload_week(day(9));
    let reduced = week.apply(&row(ProgressionScheme::Linear), &VbtConfig::default().equipment);
    assert_eq!(reduced.weight, 65.0);
    assert_eq!(reduced.sets, 2);
    assert_eq!(engine.failure_count("seated_row"), 0);
}

#[test]
fn test_state_survives_json() {
    let mut engine = ProgressionEngine::new(VbtConfig::default(), TrainingLevel::Advanced);
    for d in 1..=12 {
        let reps = if d % 4 == 0 { 18 } else { 30 };
        engine
            .record_session(session(d, reps).with_velocity_loss(20.0 + d as f64).with_rir(2.0))
            .unwrap();
    }
    engine.advance_week();
    engine.advance_week();

    let json = engine.export_state().to_json().unwrap();
    let restored =
        ProgressionEngine::from_state(VbtConfig::default(), ProgressionState::from_json(&json).unwrap());

    assert_eq!(restored.export_state(), engine.export_state());
    assert_eq!(restored.history("seated_row").unwrap().len(), 10);
    assert_eq!(restored.weeks_since_deload(), 2);
    assert_eq!(restored.trend("seated_row"), engine.trend("seated_row"));
}
