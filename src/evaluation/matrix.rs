//! # Score matrix
//!
//! Aggregates the scores of many algorithms and metrics over a set of scenes.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::fmt;

use log::{debug, info, warn};

use crate::error::*;
use crate::evaluation::applicability::applicable_scenes;
use crate::evaluation::{score_region, Evaluator};
use crate::metrics::Metric;
use crate::scene::Scene;

// -----------------------------------------------------------------------------------------------
// ENUMERATIONS
// -----------------------------------------------------------------------------------------------

/// One cell of a [`ScoreMatrix`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Score {
    Applicable(f64),
    /// No scene contributed to the cell.
    NotApplicable,
}

/// Problems that degraded, but did not abort, a matrix build.
#[derive(Clone, Debug, PartialEq)]
pub enum MatrixWarning {
    /// A scene was left out of the cell's mean.
    SceneSkipped {
        algorithm: String,
        metric: String,
        scene: String,
        reason: String,
    },
    /// Every applicable scene of the cell failed.
    NoScores { algorithm: String, metric: String },
}

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Aggregated scores, one row per algorithm and one column per metric, in caller order.
#[derive(Clone, Debug)]
pub struct ScoreMatrix {
    algorithms: Vec<String>,
    metrics: Vec<String>,
    cells: Vec<Score>,
    warnings: Vec<MatrixWarning>,
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl Score {
    pub fn value(self) -> Option<f64> {
        match self {
            Score::Applicable(v) => Some(v),
            Score::NotApplicable => None,
        }
    }

    pub fn is_applicable(self) -> bool {
        matches!(self, Score::Applicable(_))
    }

    /// Render with the metric's formatting, `n/a` when not applicable.
    pub fn format(self, metric: &dyn Metric) -> String {
        match self {
            Score::Applicable(v) => metric.format_score(v),
            Score::NotApplicable => "n/a".to_string(),
        }
    }
}

impl fmt::Display for MatrixWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixWarning::SceneSkipped {
                algorithm,
                metric,
                scene,
                reason,
            } => write!(f, "{} / {}: skipped scene {}: {}", algorithm, metric, scene, reason),
            MatrixWarning::NoScores { algorithm, metric } => {
                write!(f, "{} / {}: no scene could be scored", algorithm, metric)
            }
        }
    }
}

impl ScoreMatrix {
    pub fn algorithms(&self) -> &[String] {
        &self.algorithms
    }

    /// Short names of the metrics, one per column.
    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    /// Shape as `(algorithms, metrics)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.algorithms.len(), self.metrics.len())
    }

    pub fn get(&self, algorithm: usize, metric: usize) -> Score {
        self.cells[algorithm * self.metrics.len() + metric]
    }

    pub fn row(&self, algorithm: usize) -> &[Score] {
        let n = self.metrics.len();
        &self.cells[algorithm * n..(algorithm + 1) * n]
    }

    pub fn column(&self, metric: usize) -> Vec<Score> {
        (0..self.algorithms.len()).map(|a| self.get(a, metric)).collect()
    }

    pub fn warnings(&self) -> &[MatrixWarning] {
        &self.warnings
    }

    fn skip_scene(&mut self, algorithm: &str, metric: &str, scene: &str, reason: &Error) {
        warn!("{} / {}: skipping scene {}: {}", algorithm, metric, scene, reason);
        self.warnings.push(MatrixWarning::SceneSkipped {
            algorithm: algorithm.to_string(),
            metric: metric.to_string(),
            scene: scene.to_string(),
            reason: reason.to_string(),
        });
    }
}

impl<'r> Evaluator<'r> {
    /// Compute the mean score of every algorithm and metric over `scenes`.
    ///
    /// Each metric is evaluated at its own resolution on the scenes it applies to. Scenes that
    /// fail with a scene-local error (missing result, missing mask) are left out of the mean and
    /// reported as warnings; a cell without any scored scene is [`Score::NotApplicable`]. Any
    /// other error aborts the build.
    ///
    /// Scenes form the inner loop of each column and their ground truth is dropped after use.
    pub fn score_matrix<S: AsRef<str>>(
        &self,
        algorithms: &[S],
        metrics: &[Box<dyn Metric>],
        scenes: &[Box<dyn Scene>],
    ) -> Result<ScoreMatrix> {
        let mut matrix = ScoreMatrix {
            algorithms: algorithms.iter().map(|a| a.as_ref().to_string()).collect(),
            metrics: metrics.iter().map(|m| m.short_name()).collect(),
            cells: vec![Score::NotApplicable; algorithms.len() * metrics.len()],
            warnings: Vec::new(),
        };

        for (idx_m, metric) in metrics.iter().enumerate() {
            let metric: &dyn Metric = metric.as_ref();
            let metric_name = metric.short_name();
            info!("Computing scores for: {}", metric.display_name().replace('\n', " "));

            let resolution = metric.resolution();
            let applicable = applicable_scenes(scenes, metric);
            if applicable.is_empty() {
                info!("{} applies to none of the {} scenes", metric_name, scenes.len());
                continue;
            }

            // Running (sum, count) per algorithm, so only one ground truth is held at a time.
            let mut totals = vec![(0.0f64, 0usize); algorithms.len()];

            for &scene in applicable.iter() {
                // Mask before ground truth, the scene may only have a mask at the other
                // resolution.
                let mask = metric.evaluation_mask(scene, resolution, self.settings.boundary_offset);
                if let Err(e) = mask {
                    if !e.is_scene_local() {
                        return Err(e);
                    }
                    for algorithm in algorithms.iter() {
                        matrix.skip_scene(algorithm.as_ref(), &metric_name, scene.name(), &e);
                    }
                    continue;
                }

                let gt = scene.ground_truth(resolution)?;

                for (algorithm, total) in algorithms.iter().zip(totals.iter_mut()) {
                    let algorithm: &str = algorithm.as_ref();
                    let scored = self.results.result(scene, algorithm).and_then(|result| {
                        score_region(
                            metric,
                            scene,
                            &result,
                            &gt,
                            resolution,
                            self.settings.boundary_offset,
                            false,
                        )
                    });

                    match scored {
                        Ok(score) => {
                            debug!(
                                "{} / {} / {}: {}",
                                algorithm,
                                metric_name,
                                scene.name(),
                                score.value
                            );
                            total.0 += score.value;
                            total.1 += 1;
                        }
                        Err(e) if e.is_scene_local() => {
                            matrix.skip_scene(algorithm, &metric_name, scene.name(), &e);
                        }
                        Err(e) => return Err(e),
                    }
                }
            }

            for (idx_a, (algorithm, (sum, count))) in algorithms.iter().zip(totals).enumerate() {
                let algorithm: &str = algorithm.as_ref();
                let cell = if count == 0 {
                    warn!("{} / {}: no scene could be scored", algorithm, metric_name);
                    matrix.warnings.push(MatrixWarning::NoScores {
                        algorithm: algorithm.to_string(),
                        metric: metric_name.clone(),
                    });
                    Score::NotApplicable
                }
                else {
                    Score::Applicable(sum / count as f64)
                };
                matrix.cells[idx_a * metrics.len() + idx_m] = cell;
            }
        }

        Ok(matrix)
    }
}
