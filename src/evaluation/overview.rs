//! # Scene overview
//!
//! Scores and visualizations of several algorithms on a single scene, for every metric that
//! applies to it.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use log::info;

use crate::disparity::Mask;
use crate::error::*;
use crate::evaluation::applicability::{applicable_metrics_high_res, applicable_metrics_low_res};
use crate::evaluation::{score_region, AlgorithmResult, Evaluator, Visualization};
use crate::metrics::Metric;
use crate::scene::{Resolution, Scene};

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

pub struct OverviewCell {
    pub algorithm: String,
    pub score: f64,
    /// Score rendered with the metric's formatting.
    pub formatted: String,
    pub visualization: Option<Visualization>,
}

/// One metric evaluated for every algorithm.
pub struct OverviewRow {
    pub metric: String,
    pub resolution: Resolution,
    pub mask: Mask,
    pub cells: Vec<OverviewCell>,
}

/// Low resolution rows first, then high resolution rows.
pub struct SceneOverview {
    pub scene: String,
    pub rows: Vec<OverviewRow>,
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl<'r> Evaluator<'r> {
    /// Score every algorithm with every metric applicable to `scene`.
    ///
    /// Unlike [`Evaluator::score_matrix`] every cell is required, so a missing result fails the
    /// whole overview.
    pub fn scene_overview<S: AsRef<str>>(
        &self,
        scene: &dyn Scene,
        algorithms: &[S],
    ) -> Result<SceneOverview> {
        let mut rows = Vec::new();

        info!("Computing scores and visualizations for LOW resolution metrics.");
        let metrics = applicable_metrics_low_res(scene, &self.settings);
        self.overview_rows(scene, algorithms, &metrics, Resolution::Low, &mut rows)?;

        info!("Computing scores and visualizations for HIGH resolution metrics.");
        let metrics = applicable_metrics_high_res(scene, &self.settings);
        self.overview_rows(scene, algorithms, &metrics, Resolution::High, &mut rows)?;

        Ok(SceneOverview {
            scene: scene.name().to_string(),
            rows,
        })
    }

    fn overview_rows<S: AsRef<str>>(
        &self,
        scene: &dyn Scene,
        algorithms: &[S],
        metrics: &[Box<dyn Metric>],
        resolution: Resolution,
        rows: &mut Vec<OverviewRow>,
    ) -> Result<()> {
        if metrics.is_empty() {
            return Ok(());
        }

        let gt = scene.ground_truth(resolution)?;
        let results = algorithms
            .iter()
            .map(|a| self.results.result(scene, a.as_ref()))
            .collect::<Result<Vec<AlgorithmResult>>>()?;

        for metric in metrics {
            let metric: &dyn Metric = metric.as_ref();
            let mask = metric.evaluation_mask(scene, resolution, self.settings.boundary_offset)?;

            let mut cells = Vec::with_capacity(results.len());
            for result in results.iter() {
                let score = score_region(
                    metric,
                    scene,
                    result,
                    &gt,
                    resolution,
                    self.settings.boundary_offset,
                    true,
                )?;

                cells.push(OverviewCell {
                    algorithm: result.algorithm.clone(),
                    score: score.value,
                    formatted: metric.format_score(score.value),
                    visualization: score.visualization,
                });
            }

            rows.push(OverviewRow {
                metric: metric.short_name(),
                resolution,
                mask,
                cells,
            });
        }

        Ok(())
    }
}
