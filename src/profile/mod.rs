//! Load-velocity profiling and 1RM estimation.

pub mod load_velocity;
pub mod regression;

pub use load_velocity::{
    estimate_one_rm_from_single, FitStatus, LoadVelocityDataPoint, LoadVelocityProfile,
};
pub use regression::{linear_regression, LinearFit};
