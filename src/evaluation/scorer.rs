//! # Masked region scoring
//!
//! Scores one algorithm result with one metric on one scene, restricted to the metric's
//! evaluation mask.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use image::GrayImage;

use crate::disparity::{DisparityMap, Mask};
use crate::error::*;
use crate::evaluation::results::AlgorithmResult;
use crate::metrics::{Metric, ScoreInput};
use crate::scene::{Resolution, Scene};

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Per-pixel metric values, only meaningful inside the evaluation mask.
#[derive(Clone, Debug)]
pub struct Visualization {
    values: DisparityMap,
    mask: Mask,
}

#[derive(Clone, Debug)]
pub struct RegionScore {
    pub value: f64,
    pub visualization: Option<Visualization>,
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl Visualization {
    /// Metric value at `(x, y)`, `None` outside the evaluation mask.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if self.mask.get(x, y) {
            Some(self.values.get(x, y))
        }
        else {
            None
        }
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Shape as `(height, width)`.
    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }

    /// 8 bit preview stretching the masked value range, black outside the mask.
    pub fn to_luma_normalised(&self) -> GrayImage {
        DisparityMap::from_fn(self.values.width(), self.values.height(), |x, y| {
            self.get(x, y).unwrap_or(std::f32::NAN)
        })
        .to_luma_normalised()
    }
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Score `result` against `gt` with `metric`.
///
/// The result is upsampled to the ground truth shape when the two differ by an integer factor.
/// A region-based metric without a mask for the scene at `resolution` fails with
/// [`Error::MissingMask`].
pub fn score_region(
    metric: &dyn Metric,
    scene: &dyn Scene,
    result: &AlgorithmResult,
    gt: &DisparityMap,
    resolution: Resolution,
    boundary_offset: usize,
    with_visualization: bool,
) -> Result<RegionScore> {
    let mask = metric.evaluation_mask(scene, resolution, boundary_offset)?;
    if mask.shape() != gt.shape() {
        return Err(Error::ShapeMismatch {
            expected: gt.shape(),
            actual: mask.shape(),
        });
    }

    let disparity = result.disparity.upsample_to(gt.height(), gt.width())?;

    let input = ScoreInput {
        scene: scene.name(),
        algorithm: &result.algorithm,
        disparity: &disparity,
        gt,
        mask: &mask,
        runtime: result.runtime,
    };
    let score = metric.score(&input, with_visualization)?;

    Ok(RegionScore {
        value: score.value,
        visualization: score.visualization.map(|values| Visualization { values, mask }),
    })
}
