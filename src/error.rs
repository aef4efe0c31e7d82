//! Error types for the flocking core.
//!
//! The simulation itself never fails mid-tick. Everything that can go wrong
//! is a bad configuration or a tick on an empty flock, and both are rejected
//! before any agent is touched.

use thiserror::Error;

/// Errors raised while loading or validating a [`FlockConfig`](crate::FlockConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field that must be strictly positive was zero or negative.
    #[error("invalid configuration: {field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f32 },
    /// A field that must not be negative was negative.
    #[error("invalid configuration: {field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },
    /// A field was NaN or infinite.
    #[error("invalid configuration: {field} must be finite")]
    NonFinite { field: &'static str },
    /// `tick` was called before any agent existed.
    #[error("cannot tick a flock with no agents")]
    EmptyFlock,
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file was not valid JSON for a `FlockConfig`.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
