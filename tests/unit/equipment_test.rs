//! Unit tests for equipment weight clamping.

use rustlift::WeightLimits;

#[test]
fn test_clamp_is_idempotent_and_loadable() {
    let limits = WeightLimits::default();
    let mut weight = -50.0;
    while weight < 300.0 {
        let once = limits.clamp(weight);
        assert_eq!(limits.clamp(once), once);
        assert!((5.0..=200.0).contains(&once));
        assert_eq!(once % 5.0, 0.0, "{} is not a multiple of 5", once);
        weight += 0.7;
    }
}

#[test]
fn test_clamp_edges() {
    let limits = WeightLimits::default();
    assert_eq!(limits.clamp(0.0), 5.0);
    assert_eq!(limits.clamp(1000.0), 200.0);
    assert_eq!(limits.clamp(f64::NAN), 5.0);
    assert_eq!(limits.clamp(62.4), 60.0);
    assert_eq!(limits.clamp(62.6), 65.0);
}

#[test]
fn test_step() {
    let limits = WeightLimits::default();
    assert_eq!(limits.step(100.0, 1), 105.0);
    assert_eq!(limits.step(5.0, -1), 5.0);
    assert_eq!(limits.step(102.5, 0), 105.0);
}
