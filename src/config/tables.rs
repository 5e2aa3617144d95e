//! Research-backed numeric tables.
//!
//! Every threshold the engine uses lives here as a named table with a
//! `Default` that carries the published values, so tables can be tuned
//! (or replaced from TOML) and tested independently of the decision logic.
//!
//! References:
//! - González-Badillo & Sánchez-Medina (2010), movement velocity as a measure of loading intensity
//! - Sánchez-Medina & González-Badillo (2011), velocity loss as an indicator of fatigue
//! - Pareja-Blanco et al. (2017), velocity loss thresholds and training adaptations
//! - Israetel et al., volume landmarks (MEV/MAV/MRV)

use serde::{Deserialize, Serialize};

use crate::analytics::velocity::VelocityZone;
use crate::error::{VbtError, VbtResult};
use crate::prescription::{TrainingGoal, TrainingLevel};

/// Version of the built-in table set. Bump whenever a default value changes.
pub const TABLES_VERSION: u32 = 1;

/// Telemetry sampling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingSettings {
    /// Fixed interval between frames in seconds, used for impulse/work integration
    pub frame_interval_secs: f64,
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            frame_interval_secs: 0.02,
        }
    }
}

/// Thresholds for the rep-quality state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepQualitySettings {
    /// Concentric velocity (m/s) below which a frame counts as stalled
    pub stall_velocity_threshold: f64,
    /// Stalls only count below this fraction of the rep's own max position
    pub stall_position_fraction: f64,
    /// Consecutive stalled frames needed to flag a stall
    pub min_stall_frames: usize,
    /// Position drop between frames that counts toward a reversal
    pub reversal_margin: f64,
    /// Consecutive dropping frames needed to flag a reversal
    pub min_reversal_frames: usize,
    /// A reversed rep below this ROM% is a failed rep
    pub failed_rom_percent: f64,
    /// Below this ROM% the rep is partial
    pub partial_rom_percent: f64,
    /// Below this ROM% the rep is shortened
    pub shortened_rom_percent: f64,
    /// Velocity magnitude (m/s) below which time counts as a pause
    pub pause_velocity_threshold: f64,
}

impl Default for RepQualitySettings {
    fn default() -> Self {
        Self {
            stall_velocity_threshold: 0.05,
            stall_position_fraction: 0.95,
            min_stall_frames: 2,
            reversal_margin: 0.01,
            min_reversal_frames: 2,
            failed_rom_percent: 85.0,
            partial_rom_percent: 70.0,
            shortened_rom_percent: 85.0,
            pause_velocity_threshold: 0.02,
        }
    }
}

/// Thresholds for spotting paced or submaximal sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentSettings {
    /// First rep below this fraction of expected velocity suggests submaximal effort
    pub below_expected_ratio: f64,
    /// Coefficient of variation (%) below which a set looks paced
    pub low_variance_cv_percent: f64,
    /// Reps needed before variance says anything
    pub min_reps_for_variance: usize,
}

impl Default for IntentSettings {
    fn default() -> Self {
        Self {
            below_expected_ratio: 0.85,
            low_variance_cv_percent: 5.0,
            min_reps_for_variance: 3,
        }
    }
}

/// Ratio-to-reference thresholds for velocity zones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VelocityZoneTable {
    /// Below this ratio: grinding
    pub grinding_below: f64,
    /// Below this ratio: heavy
    pub heavy_below: f64,
    /// Below this ratio: moderate
    pub moderate_below: f64,
    /// Below this ratio: fast (explosive at or above)
    pub fast_below: f64,
}

impl Default for VelocityZoneTable {
    fn default() -> Self {
        Self {
            grinding_below: 0.50,
            heavy_below: 0.70,
            moderate_below: 0.85,
            fast_below: 0.95,
        }
    }
}

impl VelocityZoneTable {
    /// Classify a velocity ratio (current / reference).
    pub fn zone_for_ratio(&self, ratio: f64) -> VelocityZone {
        if ratio < self.grinding_below {
            VelocityZone::Grinding
        } else if ratio < self.heavy_below {
            VelocityZone::Heavy
        } else if ratio < self.moderate_below {
            VelocityZone::Moderate
        } else if ratio < self.fast_below {
            VelocityZone::Fast
        } else {
            VelocityZone::Explosive
        }
    }
}

/// One row of the velocity-loss → effort table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffortBracket {
    /// Upper bound (inclusive) of velocity loss % for this bracket
    pub max_loss: f64,
    /// Reps in reserve
    pub rir: f64,
    /// Rate of perceived exertion
    pub rpe: f64,
}

/// A fixed RIR/RPE pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffortPoint {
    /// Reps in reserve
    pub rir: f64,
    /// Rate of perceived exertion
    pub rpe: f64,
}

/// Velocity loss → RIR/RPE brackets and confidence rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffortTable {
    /// Brackets sorted by ascending `max_loss`
    pub brackets: Vec<EffortBracket>,
    /// Estimate used when the rep got faster than the reference
    pub fresh: EffortPoint,
    /// Loss above which a maximal-intent estimate is high confidence
    pub high_confidence_loss: f64,
    /// Loss above which a maximal-intent estimate is medium confidence
    pub medium_confidence_loss: f64,
    /// RIR added when intent is unconfirmed
    pub unconfirmed_rir_inflation: f64,
    /// Inflated RIR never exceeds this
    pub rir_safety_ceiling: f64,
}

impl Default for EffortTable {
    fn default() -> Self {
        let bracket = |max_loss, rir, rpe| EffortBracket { max_loss, rir, rpe };
        Self {
            brackets: vec![
                bracket(10.0, 5.0, 5.0),
                bracket(15.0, 4.0, 6.0),
                bracket(20.0, 3.0, 7.0),
                bracket(30.0, 2.0, 8.0),
                bracket(40.0, 1.0, 9.0),
                bracket(50.0, 0.5, 9.5),
                bracket(100.0, 0.0, 10.0),
            ],
            fresh: EffortPoint { rir: 6.0, rpe: 4.0 },
            high_confidence_loss: 20.0,
            medium_confidence_loss: 10.0,
            unconfirmed_rir_inflation: 2.0,
            rir_safety_ceiling: 5.0,
        }
    }
}

impl EffortTable {
    /// Absorbs float noise such as 30.000000000000004 at a bracket edge.
    const EDGE_EPSILON: f64 = 1e-9;

    /// First bracket whose ceiling covers `loss`, falling through to the last.
    pub fn bracket_for_loss(&self, loss: f64) -> Option<&EffortBracket> {
        self.brackets
            .iter()
            .find(|b| b.max_loss + Self::EDGE_EPSILON >= loss)
            .or_else(|| self.brackets.last())
    }

    /// Check the brackets form a total order (ascending loss, RIR
    /// non-increasing, RPE non-decreasing).
    pub fn is_monotonic(&self) -> bool {
        self.brackets.windows(2).all(|w| {
            w[0].max_loss < w[1].max_loss && w[0].rir >= w[1].rir && w[0].rpe <= w[1].rpe
        })
    }
}

/// Row of the velocity-at-%1RM table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityPercentEntry {
    /// Relative intensity (% of 1RM)
    pub percent_1rm: f64,
    /// Typical mean concentric velocity (m/s) at that intensity
    pub velocity: f64,
}

/// General load-velocity relationship used before an individual profile exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VelocityPercentTable {
    /// Entries sorted by descending %1RM (ascending velocity)
    pub entries: Vec<VelocityPercentEntry>,
}

impl Default for VelocityPercentTable {
    fn default() -> Self {
        let entries = [
            (100.0, 0.30),
            (95.0, 0.38),
            (90.0, 0.46),
            (85.0, 0.54),
            (80.0, 0.62),
            (75.0, 0.70),
            (70.0, 0.78),
            (65.0, 0.86),
            (60.0, 0.94),
            (55.0, 1.02),
            (50.0, 1.10),
        ]
        .into_iter()
        .map(|(percent_1rm, velocity)| VelocityPercentEntry {
            percent_1rm,
            velocity,
        })
        .collect();
        Self { entries }
    }
}

impl VelocityPercentTable {
    /// Interpolate %1RM for a mean concentric velocity, clamped to the table ends.
    pub fn percent_for_velocity(&self, velocity: f64) -> Option<f64> {
        let first = self.entries.first()?;
        let last = self.entries.last()?;
        if velocity <= first.velocity {
            return Some(first.percent_1rm);
        }
        if velocity >= last.velocity {
            return Some(last.percent_1rm);
        }
        self.entries.windows(2).find_map(|w| {
            let (hi, lo) = (w[0], w[1]);
            if velocity >= hi.velocity && velocity <= lo.velocity {
                let span = lo.velocity - hi.velocity;
                if span <= 0.0 {
                    return Some(hi.percent_1rm);
                }
                let t = (velocity - hi.velocity) / span;
                Some(hi.percent_1rm + t * (lo.percent_1rm - hi.percent_1rm))
            } else {
                None
            }
        })
    }
}

/// Per-goal training targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalProfile {
    /// Goal this profile applies to
    pub goal: TrainingGoal,
    /// Lower bound of the set velocity-loss target (%)
    pub velocity_loss_min: f64,
    /// Upper bound of the set velocity-loss target (%)
    pub velocity_loss_max: f64,
    /// Default rest between sets (seconds)
    pub rest_seconds: u32,
    /// Target reps in reserve
    pub target_rir: f64,
    /// Lower bound of working intensity (% of 1RM)
    pub intensity_min_percent: f64,
    /// Upper bound of working intensity (% of 1RM)
    pub intensity_max_percent: f64,
    /// Rep range lower bound
    pub rep_min: u32,
    /// Rep range upper bound
    pub rep_max: u32,
}

/// Goal-keyed defaults (velocity-loss targets, rest, RIR, intensity).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalTable {
    /// One profile per goal
    pub profiles: Vec<GoalProfile>,
}

impl Default for GoalTable {
    fn default() -> Self {
        Self {
            profiles: vec![
                GoalProfile {
                    goal: TrainingGoal::Strength,
                    velocity_loss_min: 10.0,
                    velocity_loss_max: 20.0,
                    rest_seconds: 180,
                    target_rir: 2.0,
                    intensity_min_percent: 80.0,
                    intensity_max_percent: 90.0,
                    rep_min: 3,
                    rep_max: 6,
                },
                GoalProfile {
                    goal: TrainingGoal::Hypertrophy,
                    velocity_loss_min: 20.0,
                    velocity_loss_max: 30.0,
                    rest_seconds: 120,
                    target_rir: 2.0,
                    intensity_min_percent: 65.0,
                    intensity_max_percent: 80.0,
                    rep_min: 8,
                    rep_max: 12,
                },
                GoalProfile {
                    goal: TrainingGoal::Power,
                    velocity_loss_min: 0.0,
                    velocity_loss_max: 10.0,
                    rest_seconds: 180,
                    target_rir: 4.0,
                    intensity_min_percent: 40.0,
                    intensity_max_percent: 60.0,
                    rep_min: 3,
                    rep_max: 5,
                },
                GoalProfile {
                    goal: TrainingGoal::Endurance,
                    velocity_loss_min: 30.0,
                    velocity_loss_max: 40.0,
                    rest_seconds: 60,
                    target_rir: 1.0,
                    intensity_min_percent: 50.0,
                    intensity_max_percent: 65.0,
                    rep_min: 12,
                    rep_max: 20,
                },
            ],
        }
    }
}

impl GoalTable {
    /// Look up the profile for a goal.
    pub fn get(&self, goal: TrainingGoal) -> VbtResult<&GoalProfile> {
        self.profiles
            .iter()
            .find(|p| p.goal == goal)
            .ok_or_else(|| VbtError::Configuration(format!("no goal profile for {}", goal)))
    }
}

/// Thresholds for the load-velocity profile confidence tiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSettings {
    /// Minimum velocity threshold (m/s) used to extrapolate 1RM
    pub minimum_velocity_threshold: f64,
    pub high_min_points: usize,
    pub high_min_r_squared: f64,
    pub high_min_weight_spread: f64,
    pub medium_min_points: usize,
    pub medium_min_r_squared: f64,
    pub medium_min_weight_spread: f64,
    /// Alternative to weight spread for the medium tier
    pub medium_min_velocity_spread: f64,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            minimum_velocity_threshold: 0.30,
            high_min_points: 3,
            high_min_r_squared: 0.90,
            high_min_weight_spread: 30.0,
            medium_min_points: 2,
            medium_min_r_squared: 0.70,
            medium_min_weight_spread: 15.0,
            medium_min_velocity_spread: 0.15,
        }
    }
}

/// Thresholds for intra-workout decisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveThresholds {
    /// Rep drop from baseline (%) that stops the exercise
    pub junk_rep_drop_percent: f64,
    /// First-rep velocity drop from baseline (%) that stops the exercise
    pub junk_velocity_drop_percent: f64,
    /// Band around the velocity-loss target before weight changes
    pub velocity_loss_tolerance: f64,
    pub rest_high_loss_threshold: f64,
    pub rest_high_loss_extra_secs: u32,
    pub rest_moderate_loss_threshold: f64,
    pub rest_moderate_loss_extra_secs: u32,
    /// Rep drop from baseline (%) that floors rest at `minimum_rest_floor_secs`
    pub rep_drop_warning_percent: f64,
    pub minimum_rest_floor_secs: u32,
    /// Minimum RIR for a bonus set
    pub bonus_min_rir: f64,
    /// First-rep velocity ratio counted as recovered
    pub recovered_ratio: f64,
    /// First-rep velocity ratio counted as almost recovered
    pub almost_recovered_ratio: f64,
    /// Ratio of first-rep velocity to expected above which the lifter is ready
    pub readiness_ready_ratio: f64,
    /// Ratio below which the lifter is fatigued
    pub readiness_fatigued_ratio: f64,
}

impl Default for AdaptiveThresholds {
    fn default() -> Self {
        Self {
            junk_rep_drop_percent: 50.0,
            junk_velocity_drop_percent: 40.0,
            velocity_loss_tolerance: 2.5,
            rest_high_loss_threshold: 40.0,
            rest_high_loss_extra_secs: 60,
            rest_moderate_loss_threshold: 30.0,
            rest_moderate_loss_extra_secs: 30,
            rep_drop_warning_percent: 25.0,
            minimum_rest_floor_secs: 180,
            bonus_min_rir: 2.0,
            recovered_ratio: 0.90,
            almost_recovered_ratio: 0.85,
            readiness_ready_ratio: 1.05,
            readiness_fatigued_ratio: 0.90,
        }
    }
}

/// Rep retention expected after a given rest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RestRetention {
    /// Applies when rest is at least this long (seconds)
    pub min_rest_secs: u32,
    /// Fraction of the previous set's reps expected
    pub retention: f64,
}

/// Rest-dependent rep retention curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestRetentionCurve {
    /// Points sorted by descending `min_rest_secs`
    pub points: Vec<RestRetention>,
}

impl Default for RestRetentionCurve {
    fn default() -> Self {
        let point = |min_rest_secs, retention| RestRetention {
            min_rest_secs,
            retention,
        };
        Self {
            points: vec![
                point(180, 0.95),
                point(120, 0.90),
                point(60, 0.85),
                point(0, 0.80),
            ],
        }
    }
}

impl RestRetentionCurve {
    /// Retention for the longest bracket the rest satisfies.
    pub fn retention_for_rest(&self, rest_secs: u32) -> f64 {
        self.points
            .iter()
            .find(|p| rest_secs >= p.min_rest_secs)
            .or_else(|| self.points.last())
            .map(|p| p.retention)
            .unwrap_or(1.0)
    }
}

/// Session-to-session progression settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionSettings {
    /// Sessions kept per exercise
    pub history_capacity: usize,
    /// Consecutive missed-minimum sessions that force a deload
    pub failure_deload_threshold: u32,
    /// Velocity loss this far under target-min increases load (autoregulated)
    pub autoregulated_under_margin: f64,
    /// Velocity loss this far over target-max decreases load (autoregulated)
    pub autoregulated_over_margin: f64,
    /// Sessions in a trend window
    pub trend_window: usize,
    /// Minimum RIR for a double-progression increase
    pub double_min_rir: f64,
    /// Consecutive misses below the rep range that deload a double-progression exercise
    pub double_deload_misses: u32,
    /// Minimum RIR for a trend-based autoregulated increase
    pub autoregulated_min_rir: f64,
    /// Increment used when a prescription leaves it unset
    pub default_increment: f64,
}

impl Default for ProgressionSettings {
    fn default() -> Self {
        Self {
            history_capacity: 10,
            failure_deload_threshold: 2,
            autoregulated_under_margin: 5.0,
            autoregulated_over_margin: 10.0,
            trend_window: 3,
            double_min_rir: 2.0,
            double_deload_misses: 2,
            autoregulated_min_rir: 2.0,
            default_increment: 5.0,
        }
    }
}

/// Deload scheduling and prescription defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeloadSettings {
    pub weeks_beginner: u32,
    pub weeks_intermediate: u32,
    pub weeks_advanced: u32,
    /// Load reduction during a deload week (%)
    pub intensity_reduction_percent: f64,
    /// Set reduction during a deload week (%)
    pub volume_reduction_percent: f64,
    pub duration_days: i64,
    /// Sessions of rising velocity loss that trigger a deload
    pub trend_sessions: usize,
    /// Consecutive missed-minimum sessions that trigger a deload
    pub missed_minimum_sessions: usize,
}

impl Default for DeloadSettings {
    fn default() -> Self {
        Self {
            weeks_beginner: 8,
            weeks_intermediate: 6,
            weeks_advanced: 4,
            intensity_reduction_percent: 10.0,
            volume_reduction_percent: 40.0,
            duration_days: 7,
            trend_sessions: 3,
            missed_minimum_sessions: 3,
        }
    }
}

impl DeloadSettings {
    /// Weeks of training after which a time-based deload is due.
    pub fn weeks_for(&self, level: TrainingLevel) -> u32 {
        match level {
            TrainingLevel::Beginner => self.weeks_beginner,
            TrainingLevel::Intermediate => self.weeks_intermediate,
            TrainingLevel::Advanced => self.weeks_advanced,
        }
    }
}

/// Weekly set landmarks for one training level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeLandmark {
    pub level: TrainingLevel,
    /// Minimum effective volume (sets/week)
    pub mev: u32,
    /// Maximum adaptive volume (sets/week)
    pub mav: u32,
    /// Maximum recoverable volume (sets/week)
    pub mrv: u32,
}

/// Volume landmarks per training level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeLandmarkTable {
    pub landmarks: Vec<VolumeLandmark>,
}

impl Default for VolumeLandmarkTable {
    fn default() -> Self {
        let landmark = |level, mev, mav, mrv| VolumeLandmark {
            level,
            mev,
            mav,
            mrv,
        };
        Self {
            landmarks: vec![
                landmark(TrainingLevel::Beginner, 8, 12, 16),
                landmark(TrainingLevel::Intermediate, 10, 16, 20),
                landmark(TrainingLevel::Advanced, 12, 18, 24),
            ],
        }
    }
}

impl VolumeLandmarkTable {
    /// Look up the landmarks for a level.
    pub fn get(&self, level: TrainingLevel) -> VbtResult<&VolumeLandmark> {
        self.landmarks
            .iter()
            .find(|l| l.level == level)
            .ok_or_else(|| VbtError::Configuration(format!("no volume landmarks for {}", level)))
    }
}
