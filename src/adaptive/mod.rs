//! Adaptive intra-workout engine.
//!
//! Decides next-set weight, rest and termination from live set
//! performance, with the first set of each exercise as the baseline.

pub mod engine;
pub mod state;

pub use engine::{
    bonus_set_eligible, junk_volume_reason, weight_steps, AdaptiveEngine, RecoveryStatus,
    SetRecommendation,
};
pub use state::{
    AdaptiveSessionState, AdjustmentKind, AdjustmentRecord, ReadinessZone, ReasonCode,
    SetPerformance,
};
