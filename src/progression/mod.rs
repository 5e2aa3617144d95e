//! Session-to-session progression and deload scheduling.

pub mod deload;
pub mod engine;
pub mod history;

pub use deload::{
    scan_history, strictly_decreasing, strictly_increasing, DeloadTrigger, DeloadTriggerKind,
    DeloadWeek,
};
pub use engine::{
    velocity_loss_trending_down, ProgressionAction, ProgressionDecision, ProgressionEngine,
    ProgressionReason, ProgressionState, ProgressionTrend, TrendDirection, VolumeStatus,
};
pub use history::{ExerciseSessionSummary, SessionHistory};
