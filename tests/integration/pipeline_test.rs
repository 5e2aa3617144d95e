//! Integration test for the full pipeline.
//!
//! Frames → reps → set analytics → adaptive decisions → session summary →
//! progression decision, with all state exported at the end.

use chrono::NaiveDate;
use rustlift::adaptive::ReasonCode;
use rustlift::analytics::{DataStatus, Frame, Phase, Rep, RepQuality, SetContext};
use rustlift::progression::ProgressionAction;
use rustlift::{
    AdaptiveEngine, ExercisePrescription, ExerciseSessionSummary, ProgressionEngine,
    ProgressionScheme, SetAggregator, TrainingGoal, TrainingLevel, VbtConfig,
};

const DT: f64 = 0.02;

/// One rep: 20 eccentric frames down, then 20 concentric frames up at `velocity`.
fn simulate_rep(index: u32, velocity: f64) -> Rep {
    let mut frames = Vec::with_capacity(40);
    let mut t = 0.0;
    for i in 0..20 {
        let position = 0.60 - 0.03 * i as f64;
        frames.push(Frame::new(t, position, -0.5, 300.0, Phase::Eccentric));
        t += DT;
    }
    for i in 0..20 {
        let position = 0.03 + 0.03 * i as f64;
        frames.push(Frame::new(t, position, velocity, 520.0, Phase::Concentric));
        t += DT;
    }
    Rep::from_frames(index, frames, 0.02).unwrap()
}

fn simulate_set(first_velocity: f64, drop_per_rep: f64, reps: u32) -> Vec<Rep> {
    (0..reps)
        .map(|i| simulate_rep(i + 1, first_velocity - drop_per_rep * i as f64))
        .collect()
}

#[test]
fn test_frames_to_progression() {
    super::init_tracing();
    let config = VbtConfig::default();
    let aggregator = SetAggregator::new(config.clone());
    let adaptive = AdaptiveEngine::new(config.clone());
    let mut progression = ProgressionEngine::new(config.clone(), TrainingLevel::Intermediate);

    let prescription = ExercisePrescription::for_goal(
        &config,
        "lat_pulldown",
        TrainingGoal::Hypertrophy,
        3,
        60.0,
        ProgressionScheme::Linear,
    )
    .unwrap();
    let mut state = adaptive.start_exercise(&prescription).unwrap();
    let ctx = SetContext::default();

    // Set 1 is too easy: 10% average loss against a 20-30% target
    let set1 = aggregator
        .analyze(&simulate_set(0.80, 0.02, 8), state.current_weight, &ctx)
        .unwrap();
    assert!(set1.intent.likely_max_intent);
    assert!((set1.average_velocity_loss.unwrap() - 10.0).abs() < 1e-9);
    assert!(set1
        .reps
        .iter()
        .all(|r| r.status == DataStatus::Computed && r.quality.quality == RepQuality::Complete));

    let rec1 = adaptive.record_set(&mut state, set1.to_performance(1));
    assert_eq!(rec1.next_weight, 65.0);
    assert_eq!(rec1.reasons[0], ReasonCode::VelocityLossBelowTarget);

    // Sets 2 and 3 land in the target band
    let set2 = aggregator
        .analyze(&simulate_set(0.76, 0.04, 8), state.current_weight, &ctx)
        .unwrap();
    let loss2 = set2.average_velocity_loss.unwrap();
    assert!(loss2 > 20.0 && loss2 < 22.0);

    let rec2 = adaptive.record_set(&mut state, set2.to_performance(2));
    assert!(!rec2.should_stop);
    assert_eq!(rec2.next_weight, 65.0);
    assert_eq!(rec2.rest_seconds, 120);
    assert_eq!(rec2.remaining_sets, 1);

    let set3 = aggregator
        .analyze(&simulate_set(0.76, 0.04, 8), state.current_weight, &ctx)
        .unwrap();
    // Last rep near 37% loss leaves 1 RIR: no bonus set
    assert_eq!(set3.final_effort.unwrap().rir, 1.0);

    let rec3 = adaptive.record_set(&mut state, set3.to_performance(3));
    assert!(rec3.exercise_complete);
    assert!(!rec3.offer_bonus_set);
    assert_eq!(rec3.reasons, vec![ReasonCode::PlanComplete]);
    assert_eq!(state.total_reps, 24);

    let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
    let summary = ExerciseSessionSummary::from_session(&state, date).unwrap();
    assert_eq!(summary.weight, 65.0);
    assert_eq!(summary.sets, 3);
    assert!(summary.hit_minimum);
    assert!(!summary.hit_top);
    progression.record_session(summary).unwrap();

    let next = ExercisePrescription {
        weight: 65.0,
        ..prescription
    };
    let decision = progression.decide(&next);
    assert_eq!(decision.action, ProgressionAction::Increase);
    assert_eq!(decision.new_weight, 70.0);

    let json = progression.export_state().to_json().unwrap();
    assert!(json.contains("lat_pulldown"));
}

#[test]
fn test_empty_rep_is_neutral() {
    let aggregator = SetAggregator::default();
    let empty = Rep::from_frames(1, Vec::new(), 0.02).unwrap();
    let set = aggregator
        .analyze(&[empty], 40.0, &SetContext::default())
        .unwrap();

    assert_eq!(set.reps[0].status, DataStatus::InsufficientData);
    assert!(set.average_velocity_loss.is_none());
    assert!(set.final_effort.is_none());
}

#[test]
fn test_decreasing_timestamps_rejected() {
    let frames = vec![
        Frame::new(0.10, 0.1, 0.5, 300.0, Phase::Concentric),
        Frame::new(0.05, 0.2, 0.5, 300.0, Phase::Concentric),
    ];
    assert!(matches!(
        Rep::from_frames(1, frames, 0.02),
        Err(rustlift::VbtError::InvalidInput(_))
    ));
}
