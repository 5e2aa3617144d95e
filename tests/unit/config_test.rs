//! Unit tests for TOML configuration loading.

use rustlift::config::{ConfigError, TABLES_VERSION};
use rustlift::{TrainingGoal, TrainingLevel, VbtConfig};

#[test]
fn test_partial_override_keeps_defaults() {
    let toml = r#"
        [equipment]
        max = 150.0

        [adaptive]
        junk_rep_drop_percent = 40.0
    "#;
    let config = VbtConfig::from_toml_str(toml).unwrap();

    assert_eq!(config.equipment.max, 150.0);
    assert_eq!(config.equipment.min, 5.0);
    assert_eq!(config.adaptive.junk_rep_drop_percent, 40.0);
    assert_eq!(config.adaptive.junk_velocity_drop_percent, 40.0);
    assert_eq!(config.tables_version, TABLES_VERSION);
    assert_eq!(config.goals.get(TrainingGoal::Power).unwrap().rep_max, 5);
    assert_eq!(config.volume.get(TrainingLevel::Advanced).unwrap().mrv, 24);
}

#[test]
fn test_default_round_trips() {
    let text = VbtConfig::default().to_toml_string().unwrap();
    let parsed = VbtConfig::from_toml_str(&text).unwrap();
    assert_eq!(parsed.to_toml_string().unwrap(), text);
}

#[test]
fn test_inverted_limits_rejected() {
    let toml = r#"
        [equipment]
        min = 100.0
        max = 50.0
    "#;
    assert!(matches!(
        VbtConfig::from_toml_str(toml),
        Err(ConfigError::Invalid(_))
    ));
}
