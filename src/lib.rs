//! RustLift - Velocity-Based Training Analytics & Adaptive Decision Engine
//!
//! Turns per-rep motion and force samples from a connected cable machine into
//! biomechanical metrics, estimates proximity to failure, fits load-velocity
//! profiles for 1RM estimation, and drives intra-workout and session-to-session
//! load decisions.
//!
//! The engine is synchronous and deterministic: it performs no I/O, never
//! reads the clock, and returns advisory decisions the caller may ignore.

pub mod adaptive;
pub mod analytics;
pub mod config;
pub mod equipment;
pub mod error;
pub mod prescription;
pub mod profile;
pub mod progression;

// Re-export commonly used types
pub use adaptive::{AdaptiveEngine, AdaptiveSessionState, SetPerformance, SetRecommendation};
pub use analytics::{Frame, Phase, Rep, RepAnalyticsComputer, SetAggregator, SetAnalytics};
pub use config::VbtConfig;
pub use equipment::WeightLimits;
pub use error::{VbtError, VbtResult};
pub use prescription::{ExercisePrescription, ProgressionScheme, TrainingGoal, TrainingLevel};
pub use profile::LoadVelocityProfile;
pub use progression::{ExerciseSessionSummary, ProgressionEngine};
