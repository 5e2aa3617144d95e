//! Error types for the VBT engine.
//!
//! Data sparsity (empty telemetry, too few profile points, zero denominators)
//! never produces an error; those paths return neutral results instead.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur in analytics and decision calculations.
#[derive(Debug, Error)]
pub enum VbtError {
    /// Structurally invalid input (non-finite values, decreasing timestamps,
    /// non-positive values where a division is required).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A required configuration table entry is missing or malformed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// State could not be serialized or restored.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<ConfigError> for VbtError {
    fn from(err: ConfigError) -> Self {
        VbtError::Configuration(err.to_string())
    }
}

impl From<serde_json::Error> for VbtError {
    fn from(err: serde_json::Error) -> Self {
        VbtError::Serialization(err.to_string())
    }
}

/// Result type for VBT operations.
pub type VbtResult<T> = Result<T, VbtError>;
