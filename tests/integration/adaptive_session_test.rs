//! Integration tests for intra-workout adaptation.

use rustlift::adaptive::{AdjustmentKind, ReasonCode};
use rustlift::{
    AdaptiveEngine, ExercisePrescription, ProgressionScheme, SetPerformance, TrainingGoal,
    VbtConfig,
};

fn bench_press(sets: u32) -> ExercisePrescription {
    ExercisePrescription::for_goal(
        &VbtConfig::default(),
        "bench_press",
        TrainingGoal::Hypertrophy,
        sets,
        80.0,
        ProgressionScheme::Autoregulated,
    )
    .unwrap()
}

fn set(set_number: u32, weight: f64, reps: u32, velocity: f64, loss: f64) -> SetPerformance {
    SetPerformance {
        set_number,
        weight,
        reps,
        first_rep_velocity: Some(velocity),
        velocity_loss: Some(loss),
        rir: Some(2.0),
        rpe: Some(8.0),
    }
}

#[test]
fn test_rep_collapse_ends_exercise() {
    super::init_tracing();
    let engine = AdaptiveEngine::default();
    let mut state = engine.start_exercise(&bench_press(4)).unwrap();

    let first = engine.record_set(&mut state, set(1, 80.0, 10, 0.55, 25.0));
    assert!(!first.should_stop);

    let second = engine.record_set(&mut state, set(2, 80.0, 4, 0.53, 25.0));
    assert!(second.should_stop);
    assert_eq!(second.remaining_sets, 0);
    assert_eq!(second.reasons[0].code(), "junk_volume_reps");
}

#[test]
fn test_junk_volume_beats_weight_increase() {
    let engine = AdaptiveEngine::default();
    let mut state = engine.start_exercise(&bench_press(4)).unwrap();

    engine.record_set(&mut state, set(1, 80.0, 10, 0.55, 25.0));
    // Velocity loss alone (3%) would call for more weight
    let rec = engine.record_set(&mut state, set(2, 80.0, 5, 0.54, 3.0));

    assert!(rec.should_stop);
    assert_eq!(rec.next_weight, 80.0);
    assert!(!rec.reasons.contains(&ReasonCode::VelocityLossBelowTarget));
    assert!(state
        .adjustments
        .iter()
        .all(|a| a.kind != AdjustmentKind::Weight));
}

#[test]
fn test_weights_stay_loadable() {
    let config = VbtConfig {
        equipment: rustlift::WeightLimits {
            min: 5.0,
            max: 85.0,
            increment: 5.0,
        },
        ..VbtConfig::default()
    };
    let engine = AdaptiveEngine::new(config);
    let mut state = engine.start_exercise(&bench_press(5)).unwrap();

    let mut weight = state.current_weight;
    for n in 1..=4 {
        let rec = engine.record_set(&mut state, set(n, weight, 10, 0.55, 5.0));
        assert!(rec.next_weight <= 85.0);
        assert_eq!(rec.next_weight % 5.0, 0.0);
        weight = rec.next_weight;
    }
    assert_eq!(weight, 85.0);
}

#[test]
fn test_session_state_serializes() {
    let engine = AdaptiveEngine::default();
    let mut state = engine.start_exercise(&bench_press(3)).unwrap();
    engine.record_set(&mut state, set(1, 80.0, 10, 0.55, 12.0));

    let json = serde_json::to_string(&state).unwrap();
    let restored: rustlift::AdaptiveSessionState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, state);
}

#[test]
fn test_inverted_equipment_limits_stay_in_range() {
    let mut config = VbtConfig::default();
    config.equipment.min = 50.0;
    config.equipment.max = 20.0;
    assert!(config.validate().is_err());

    let prescription = ExercisePrescription::for_goal(
        &config,
        "leg_press",
        TrainingGoal::Hypertrophy,
        3,
        80.0,
        ProgressionScheme::Linear,
    )
    .unwrap();
    assert_eq!(prescription.weight, 50.0);

    let engine = AdaptiveEngine::new(config);
    let mut state = engine.start_exercise(&prescription).unwrap();
    let rec = engine.record_set(&mut state, set(1, 50.0, 10, 0.60, 3.0));
    assert!((20.0..=50.0).contains(&rec.next_weight));
}

#[test]
fn test_nan_equipment_minimum_does_not_panic() {
    let mut config = VbtConfig::default();
    config.equipment.min = f64::NAN;

    let engine = AdaptiveEngine::new(config.clone());
    let prescription = ExercisePrescription::for_goal(
        &config,
        "leg_press",
        TrainingGoal::Strength,
        3,
        80.0,
        ProgressionScheme::Linear,
    )
    .unwrap();
    let mut state = engine.start_exercise(&prescription).unwrap();
    assert_eq!(state.current_weight, 200.0);
    let rec = engine.record_set(&mut state, set(1, 200.0, 5, 0.40, 45.0));
    assert_eq!(rec.next_weight, 200.0);
}
