//! # Evaluation
//!
//! This module scores algorithm results against ground truth: per scene with region masks, and
//! aggregated over many scenes into a score matrix.
//!
//! Every scoring call takes the [`Resolution`] it evaluates at explicitly, scenes are never
//! mutated, so a matrix column cannot leak its sampling density into the next one.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod applicability;
mod matrix;
mod overview;
mod results;
mod scorer;

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use crate::error::*;
use crate::metrics::Metric;
use crate::scene::{Resolution, Scene};
use crate::settings::EvaluationSettings;

pub use matrix::{MatrixWarning, Score, ScoreMatrix};
pub use overview::{OverviewCell, OverviewRow, SceneOverview};
pub use results::{AlgorithmResult, InMemoryResults, ResultProvider};
pub use scorer::{score_region, RegionScore, Visualization};

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Scores algorithm results fetched from a [`ResultProvider`].
pub struct Evaluator<'r> {
    settings: EvaluationSettings,
    results: &'r dyn ResultProvider,
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl<'r> Evaluator<'r> {
    pub fn new(settings: EvaluationSettings, results: &'r dyn ResultProvider) -> Self {
        Evaluator { settings, results }
    }

    pub fn settings(&self) -> &EvaluationSettings {
        &self.settings
    }

    /// Score `algorithm` on `scene` with `metric` at the given resolution.
    pub fn score(
        &self,
        metric: &dyn Metric,
        scene: &dyn Scene,
        algorithm: &str,
        resolution: Resolution,
        with_visualization: bool,
    ) -> Result<RegionScore> {
        let result = self.results.result(scene, algorithm)?;
        let gt = scene.ground_truth(resolution)?;

        score_region(
            metric,
            scene,
            &result,
            &gt,
            resolution,
            self.settings.boundary_offset,
            with_visualization,
        )
    }
}
