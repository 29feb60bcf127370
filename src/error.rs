//! # Error standards
//!
//! This module provides a standardised error enum and result type for this crate.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use crate::scene::Resolution;

// -----------------------------------------------------------------------------------------------
// TYPES
// -----------------------------------------------------------------------------------------------

/// Standard result type used in the evaluation crate.
pub type Result<T> = std::result::Result<T, Error>;

// -----------------------------------------------------------------------------------------------
// ENUMERATIONS
// -----------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Two images or masks that must share a pixel grid do not. Shapes are given as
    /// `(height, width)`.
    #[error("Expected an image of shape {}x{} but got {}x{}",
        .expected.0, .expected.1, .actual.0, .actual.1)]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Metric {metric} has no evaluation mask for scene {scene} at {resolution} resolution")]
    MissingMask {
        metric: String,
        scene: String,
        resolution: Resolution,
    },

    #[error("No result of algorithm {algorithm} for scene {scene}")]
    MissingResult { scene: String, algorithm: String },

    #[error("Scene {scene} has no ground truth at {resolution} resolution")]
    MissingGroundTruth { scene: String, resolution: Resolution },

    #[error("Result of algorithm {algorithm} for scene {scene} carries no runtime")]
    MissingRuntime { scene: String, algorithm: String },

    #[error("Evaluation mask of metric {metric} contains no pixels")]
    EmptyMask { metric: String },

    #[error("Buffer holds {actual} values but {expected} are required")]
    BufferSize { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid evaluation settings: {0}")]
    Config(#[from] toml::de::Error),
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl Error {
    /// Whether the error only invalidates a single scene's contribution to an aggregate score.
    pub fn is_scene_local(&self) -> bool {
        matches!(
            self,
            Error::MissingResult { .. }
                | Error::MissingRuntime { .. }
                | Error::MissingMask { .. }
                | Error::EmptyMask { .. }
        )
    }
}
