//! Unit tests for velocity loss and the effort bracket table.

use rustlift::analytics::{
    estimate_effort, velocity_loss, Confidence, Frame, Phase, Rep, RepAnalyticsComputer,
    RepContext, SetAggregator, SetContext,
};
use rustlift::config::EffortTable;

fn concentric_rep(index: u32, velocity: f64) -> Rep {
    let frames = (0..12)
        .map(|i| Frame::new(i as f64 * 0.02, 0.04 * i as f64, velocity, 450.0, Phase::Concentric))
        .collect();
    Rep::from_frames(index, frames, 0.02).unwrap()
}

#[test]
fn test_faster_rep_means_lower_loss() {
    let reference = 0.60;
    let mut previous = f64::INFINITY;
    for step in 0..=40 {
        let velocity = 0.20 + step as f64 * 0.01;
        let loss = velocity_loss(velocity, reference);
        assert!(loss < previous, "loss must fall as velocity rises");
        previous = loss;
    }
}

#[test]
fn test_effort_monotonic_across_table() {
    let table = EffortTable::default();
    let mut last_rir = f64::INFINITY;
    let mut last_rpe = f64::NEG_INFINITY;

    for step in 0..=200 {
        let loss = step as f64 * 0.5;
        let effort = estimate_effort(loss, true, &table).unwrap();
        assert!(effort.rir <= last_rir, "RIR rose at {}% loss", loss);
        assert!(effort.rpe >= last_rpe, "RPE fell at {}% loss", loss);
        last_rir = effort.rir;
        last_rpe = effort.rpe;
    }
}

#[test]
fn test_thirty_percent_loss_is_rir_two() {
    let computer = RepAnalyticsComputer::default();
    let ctx = RepContext {
        reference_velocity: Some(0.60),
        ..RepContext::default()
    };
    let analytics = computer.compute(&concentric_rep(2, 0.42), &ctx).unwrap();

    let loss = analytics.velocity.velocity_loss_percent.unwrap();
    assert!((loss - 30.0).abs() < 1e-9);
    let effort = analytics.effort.unwrap();
    assert_eq!(effort.rir, 2.0);
    assert_eq!(effort.rpe, 8.0);
    assert_eq!(effort.confidence, Confidence::High);
}

#[test]
fn test_set_reports_last_rep_effort() {
    let aggregator = SetAggregator::default();
    let reps = vec![concentric_rep(1, 0.60), concentric_rep(2, 0.42)];
    let set = aggregator.analyze(&reps, 80.0, &SetContext::default()).unwrap();

    let effort = set.final_effort.unwrap();
    assert_eq!((effort.rir, effort.rpe), (2.0, 8.0));
    assert!(set.reps[0].effort.is_none());
}

#[test]
fn test_negative_loss_is_fresh_low_confidence() {
    let table = EffortTable::default();
    let effort = estimate_effort(-8.0, true, &table).unwrap();
    assert_eq!(effort.rir, table.fresh.rir);
    assert_eq!(effort.confidence, Confidence::Low);
}
