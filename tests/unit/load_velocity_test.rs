//! Unit tests for load-velocity profiling.

use chrono::{DateTime, TimeZone, Utc};
use rustlift::analytics::Confidence;
use rustlift::profile::{FitStatus, LoadVelocityDataPoint, LoadVelocityProfile};
use rustlift::{TrainingGoal, VbtConfig};

fn created() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 6, 18, 0, 0).unwrap()
}

fn profile(points: &[(f64, f64)]) -> LoadVelocityProfile {
    let points = points
        .iter()
        .map(|(w, v)| LoadVelocityDataPoint::new(*w, *v))
        .collect();
    LoadVelocityProfile::from_points(points, &VbtConfig::default(), created()).unwrap()
}

#[test]
fn test_exact_line_is_recovered() {
    let p = profile(&[(40.0, 0.90), (60.0, 0.70), (80.0, 0.50), (100.0, 0.30)]);

    assert!((p.slope + 0.01).abs() < 1e-9);
    assert!((p.intercept - 1.30).abs() < 1e-9);
    assert!((p.r_squared - 1.0).abs() < 1e-9);
    assert_eq!(p.confidence, Confidence::High);
    assert_eq!(p.fit_status, FitStatus::Fitted);
    assert_eq!(p.estimated_one_rm, 100.0);
}

#[test]
fn test_three_point_discovery() {
    let p = profile(&[(50.0, 0.90), (75.0, 0.65), (100.0, 0.45)]);

    assert!(p.slope < 0.0);
    assert!(p.r_squared > 0.95);
    assert!(p.estimated_one_rm >= 100.0);
    assert_eq!(p.estimated_one_rm % 5.0, 0.0);
    assert_eq!(p.estimated_one_rm, 115.0);
}

#[test]
fn test_single_point_is_floored_and_low() {
    let p = profile(&[(80.0, 0.55)]);
    assert_eq!(p.estimated_one_rm, 80.0);
    assert_eq!(p.confidence, Confidence::Low);
    assert!(p.is_degenerate());
    assert!(p.weight_for_velocity(0.4, &VbtConfig::default()).is_none());
}

#[test]
fn test_empty_profile() {
    let p = LoadVelocityProfile::empty(&VbtConfig::default(), created());
    assert_eq!(p.estimated_one_rm, 0.0);
    assert_eq!(p.confidence, Confidence::Low);
    assert_eq!(
        p.recommend_working_weight(TrainingGoal::Strength, &VbtConfig::default())
            .unwrap(),
        None
    );
}

#[test]
fn test_rising_velocity_is_degenerate() {
    let p = profile(&[(50.0, 0.50), (100.0, 0.60)]);
    assert!(p.is_degenerate());
    assert_eq!(p.estimated_one_rm, 100.0);
    assert!(p.weight_for_velocity(0.55, &VbtConfig::default()).is_none());
}

#[test]
fn test_adding_point_rebuilds() {
    let config = VbtConfig::default();
    let p = profile(&[(50.0, 0.90), (75.0, 0.65)]);
    let rebuilt = p
        .with_point(LoadVelocityDataPoint::new(100.0, 0.45), &config, created())
        .unwrap();

    assert_eq!(p.points.len(), 2);
    assert_eq!(rebuilt.points.len(), 3);
    assert_eq!(rebuilt.estimated_one_rm, 115.0);
}

#[test]
fn test_working_weight_for_goal() {
    let config = VbtConfig::default();
    let p = profile(&[(40.0, 0.90), (60.0, 0.70), (80.0, 0.50), (100.0, 0.30)]);
    // Strength midpoint 85% of 100
    let weight = p
        .recommend_working_weight(TrainingGoal::Strength, &config)
        .unwrap()
        .unwrap();
    assert_eq!(weight, 85.0);
}
