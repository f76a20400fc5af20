//! # Conversion Errors
//!
//! Error types for skeleton conversion. Every failure is reported
//! synchronously; nothing is retried and no partial result is kept.

use config::ConfigError;
use glam::DVec3;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors that can occur while converting a skeleton.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// Orientation requested for two coincident points
    #[error("Degenerate segment: endpoints coincide at {point}")]
    DegenerateSegment { point: DVec3 },

    /// Bone whose head and tail coincide
    #[error("Degenerate bone #{index} '{name}': head equals tail at {point}")]
    DegenerateBone {
        index: usize,
        name: String,
        point: DVec3,
    },

    /// Bone endpoint with a NaN or infinite coordinate
    #[error("Bone #{index} '{name}' has a non-finite endpoint")]
    NonFiniteCoordinate { index: usize, name: String },

    /// Bone radius below zero (or NaN)
    #[error("Bone #{index} '{name}' has invalid radius {radius}")]
    NegativeRadius {
        index: usize,
        name: String,
        radius: f64,
    },

    /// Weld tolerance below zero (or NaN)
    #[error("Invalid weld tolerance: {0}")]
    InvalidTolerance(f64),

    /// Incremental update target no longer exists in the scene
    #[error("Target object '{name}' no longer exists")]
    MissingTarget { name: String },

    /// Post-processing stage with out-of-range parameters
    #[error("Invalid stage: {message}")]
    InvalidStage { message: String },

    /// Invalid conversion settings
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl ConvertError {
    /// Creates a degenerate bone error.
    pub fn degenerate_bone(index: usize, name: impl Into<String>, point: DVec3) -> Self {
        Self::DegenerateBone {
            index,
            name: name.into(),
            point,
        }
    }

    /// Creates a missing target error.
    pub fn missing_target(name: impl Into<String>) -> Self {
        Self::MissingTarget { name: name.into() }
    }

    /// Creates an invalid stage error.
    pub fn invalid_stage(message: impl Into<String>) -> Self {
        Self::InvalidStage {
            message: message.into(),
        }
    }
}
