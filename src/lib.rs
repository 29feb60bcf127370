//! # Light field depth evaluation
//!
//! This crate evaluates depth estimation algorithms on photorealistic 4D light field scenes. It
//! computes masked per-pixel error metrics, aggregates them over scenes into a score matrix and
//! reconstructs colored point clouds from disparity maps.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

mod disparity;
mod error;
pub mod evaluation;
pub mod metrics;
pub mod point_cloud;
pub mod scene;
mod settings;

// -----------------------------------------------------------------------------------------------
// EXPORTS
// -----------------------------------------------------------------------------------------------

pub use crate::disparity::{DisparityMap, GrayFloatImage, Mask};
pub use crate::error::{Error, Result};
pub use crate::settings::EvaluationSettings;

pub mod prelude {
    pub use crate::disparity::{DisparityMap, Mask};
    pub use crate::error::{Error, Result};
    pub use crate::evaluation::{
        AlgorithmResult, Evaluator, InMemoryResults, ResultProvider, Score, ScoreMatrix,
    };
    pub use crate::metrics::Metric;
    pub use crate::scene::{CameraGeometry, InMemoryScene, Region, Resolution, Scene};
    pub use crate::settings::EvaluationSettings;
}
