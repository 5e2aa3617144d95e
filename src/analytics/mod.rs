//! Per-rep and per-set analytics.
//!
//! Frames from the device layer are grouped into [`Rep`]s, each rep is
//! analyzed once by [`RepAnalyticsComputer`], and a set of reps is
//! aggregated by [`SetAggregator`].

pub mod effort;
pub mod frame;
pub mod quality;
pub mod rep;
pub mod set;
pub mod tempo;
pub mod velocity;
pub mod work;

pub use effort::{estimate_effort, Confidence, EffortBasis, EffortEstimate};
pub use frame::{validate_frames, Frame, Phase, Rep};
pub use quality::{assess_quality, QualityAssessment, RepQuality};
pub use rep::{DataStatus, RepAnalytics, RepAnalyticsComputer, RepContext};
pub use set::{detect_intent, IntentAssessment, SetAggregator, SetAnalytics, SetContext};
pub use tempo::{analyze_tempo, TempoAnalysis, TempoTarget};
pub use velocity::{velocity_loss, velocity_metrics, VelocityMetrics, VelocityZone};
pub use work::{work_metrics, WorkMetrics};
