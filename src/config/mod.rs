//! Engine configuration.
//!
//! `VbtConfig` bundles every tunable table into one versioned structure that
//! round-trips through TOML. Missing sections fall back to their defaults so a
//! partial override file is enough to retune a single table.

pub mod tables;

use serde::{Deserialize, Serialize};

use crate::analytics::tempo::TempoTarget;
use crate::equipment::WeightLimits;

pub use tables::{
    AdaptiveThresholds, DeloadSettings, EffortBracket, EffortPoint, EffortTable, GoalProfile,
    GoalTable, IntentSettings, ProfileSettings, ProgressionSettings, RepQualitySettings,
    RestRetention, RestRetentionCurve, SamplingSettings, VelocityPercentEntry,
    VelocityPercentTable, VelocityZoneTable, VolumeLandmark, VolumeLandmarkTable, TABLES_VERSION,
};

/// Complete engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VbtConfig {
    /// Version of the table set this configuration was written against
    pub tables_version: u32,
    /// Telemetry sampling
    pub sampling: SamplingSettings,
    /// Equipment weight limits
    pub equipment: WeightLimits,
    /// Default tempo target for sets without one
    pub default_tempo: TempoTarget,
    /// Rep-quality thresholds
    pub rep_quality: RepQualitySettings,
    /// Intent detection thresholds
    pub intent: IntentSettings,
    /// Velocity zone thresholds
    pub velocity_zones: VelocityZoneTable,
    /// Velocity loss → RIR/RPE table
    pub effort: EffortTable,
    /// General velocity-at-%1RM table
    pub velocity_percent: VelocityPercentTable,
    /// Per-goal targets
    pub goals: GoalTable,
    /// Load-velocity profile settings
    pub profile: ProfileSettings,
    /// Intra-workout thresholds
    pub adaptive: AdaptiveThresholds,
    /// Expected rep retention by rest length
    pub rest_retention: RestRetentionCurve,
    /// Session-to-session progression
    pub progression: ProgressionSettings,
    /// Deload scheduling
    pub deload: DeloadSettings,
    /// Weekly volume landmarks
    pub volume: VolumeLandmarkTable,
}

impl Default for VbtConfig {
    fn default() -> Self {
        Self {
            tables_version: TABLES_VERSION,
            sampling: SamplingSettings::default(),
            equipment: WeightLimits::default(),
            default_tempo: TempoTarget::default(),
            rep_quality: RepQualitySettings::default(),
            intent: IntentSettings::default(),
            velocity_zones: VelocityZoneTable::default(),
            effort: EffortTable::default(),
            velocity_percent: VelocityPercentTable::default(),
            goals: GoalTable::default(),
            profile: ProfileSettings::default(),
            adaptive: AdaptiveThresholds::default(),
            rest_retention: RestRetentionCurve::default(),
            progression: ProgressionSettings::default(),
            deload: DeloadSettings::default(),
            volume: VolumeLandmarkTable::default(),
        }
    }
}

impl VbtConfig {
    /// Parse a configuration from TOML text and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: VbtConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        if config.tables_version != TABLES_VERSION {
            tracing::warn!(
                "Configuration written for tables v{}, engine uses v{}",
                config.tables_version,
                TABLES_VERSION
            );
        }

        config.validate()?;
        tracing::debug!("Loaded VBT configuration (tables v{})", config.tables_version);
        Ok(config)
    }

    /// Serialize the configuration to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Check structural requirements the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sampling.frame_interval_secs > 0.0) {
            return Err(ConfigError::Invalid(
                "frame interval must be positive".to_string(),
            ));
        }
        if self.effort.brackets.is_empty() {
            return Err(ConfigError::Invalid("effort table is empty".to_string()));
        }
        if !self.effort.is_monotonic() {
            return Err(ConfigError::Invalid(
                "effort brackets must ascend in loss with non-increasing RIR".to_string(),
            ));
        }
        if !self.equipment.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "invalid equipment limits {}..{} step {}",
                self.equipment.min, self.equipment.max, self.equipment.increment
            )));
        }
        if self.progression.history_capacity == 0 {
            return Err(ConfigError::Invalid(
                "history capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
