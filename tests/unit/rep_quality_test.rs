//! Unit tests for rep-quality classification priority.

use rustlift::analytics::{assess_quality, Frame, Phase, Rep, RepQuality};
use rustlift::config::RepQualitySettings;

fn conc(t: f64, position: f64, velocity: f64) -> Frame {
    Frame::new(t, position, velocity, 350.0, Phase::Concentric)
}

/// Rises to 0.30, then sinks back while still tagged concentric.
fn failed_attempt() -> Rep {
    let frames = vec![
        conc(0.00, 0.00, 0.50),
        conc(0.02, 0.10, 0.50),
        conc(0.04, 0.20, 0.50),
        conc(0.06, 0.30, 0.30),
        conc(0.08, 0.25, -0.30),
        conc(0.10, 0.20, -0.30),
        conc(0.12, 0.15, -0.30),
    ];
    Rep::from_frames(3, frames, 0.02).unwrap()
}

#[test]
fn test_reversed_stalled_short_rep_is_failed() {
    let assessment = assess_quality(&failed_attempt(), Some(0.50), &RepQualitySettings::default());

    assert!(assessment.stall_detected);
    assert!(assessment.reversal_detected);
    assert!(assessment.rom_percent < 70.0);
    assert_eq!(assessment.quality, RepQuality::Failed);
    assert!(!assessment.quality.counts_as_rep());
}

#[test]
fn test_same_rep_without_reference_is_not_failed() {
    // Without a reference the rep is its own full range
    let assessment = assess_quality(&failed_attempt(), None, &RepQualitySettings::default());
    assert_eq!(assessment.rom_percent, 100.0);
    assert_eq!(assessment.quality, RepQuality::Grinding);
}
