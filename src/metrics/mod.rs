//! # Metrics
//!
//! This module provides the metric trait shared by all disparity error metrics, and the metric
//! sets used by the benchmark.
//!
//! A metric is either *general*, meaning it is evaluated on every scene, or *region-based*,
//! meaning it is only evaluated where the scene provides a mask for the metric's [`Region`].

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

mod bumpiness;
mod error_stats;
mod fine_structure;
mod runtime;

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use crate::disparity::{DisparityMap, Mask};
use crate::error::*;
use crate::scene::{Region, Resolution, Scene};
use crate::settings::EvaluationSettings;

pub use bumpiness::Bumpiness;
pub use error_stats::{BadPix, Discontinuities, Mse};
pub use fine_structure::{FineFattening, FineThinning};
pub use runtime::Runtime;

// -----------------------------------------------------------------------------------------------
// CONSTANTS
// -----------------------------------------------------------------------------------------------

/// Upper end of each axis of the benchmark overview chart, in [`benchmark_metrics`] order.
pub const BENCHMARK_MAX_PER_METRIC: [f64; 8] = [20.0, 60.0, 5.0, 5.0, 16.0, 100.0, 80.0, 6.0];

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Everything a metric needs to score one algorithm result on one scene.
pub struct ScoreInput<'a> {
    pub scene: &'a str,
    pub algorithm: &'a str,
    /// Algorithm disparity, already sampled at the ground truth resolution.
    pub disparity: &'a DisparityMap,
    pub gt: &'a DisparityMap,
    pub mask: &'a Mask,
    /// Runtime of the algorithm in seconds.
    pub runtime: Option<f64>,
}

/// Scalar score and optional per-pixel visualization.
#[derive(Clone, Debug)]
pub struct MetricScore {
    pub value: f64,
    pub visualization: Option<DisparityMap>,
}

// -----------------------------------------------------------------------------------------------
// TRAITS
// -----------------------------------------------------------------------------------------------

pub trait Metric {
    /// Name used in plots and tables, may span multiple lines.
    fn display_name(&self) -> String;

    fn short_name(&self) -> String;

    /// Region the metric is restricted to, `None` for general metrics.
    fn region(&self) -> Option<Region>;

    fn evaluate_on_high_res(&self) -> bool;

    /// Compute the score over the pixels of `input.mask`.
    fn score(&self, input: &ScoreInput<'_>, with_visualization: bool) -> Result<MetricScore>;

    fn format_score(&self, score: f64) -> String {
        format!("{:.2}", score)
    }

    fn is_general(&self) -> bool {
        self.region().is_none()
    }

    fn resolution(&self) -> Resolution {
        if self.evaluate_on_high_res() {
            Resolution::High
        }
        else {
            Resolution::Low
        }
    }

    fn mask_exists(&self, scene: &dyn Scene, resolution: Resolution) -> bool {
        match self.region() {
            None => true,
            Some(region) => scene.mask(region, resolution).is_some(),
        }
    }

    fn is_applicable_for_low_res_scene(&self, scene: &dyn Scene) -> bool {
        !self.evaluate_on_high_res() && self.mask_exists(scene, Resolution::Low)
    }

    fn is_applicable_for_high_res_scene(&self, scene: &dyn Scene) -> bool {
        self.evaluate_on_high_res() && self.mask_exists(scene, Resolution::High)
    }

    /// Pixels the metric is evaluated on: the region mask without the image border.
    fn evaluation_mask(
        &self,
        scene: &dyn Scene,
        resolution: Resolution,
        boundary_offset: usize,
    ) -> Result<Mask> {
        let boundary = scene.boundary_mask(resolution, boundary_offset);

        match self.region() {
            None => Ok(boundary),
            Some(region) => self.region_mask(scene, region, resolution)?.and(&boundary),
        }
    }

    /// The scene's mask asset for `region`, or a [`Error::MissingMask`].
    fn region_mask(&self, scene: &dyn Scene, region: Region, resolution: Resolution) -> Result<Mask> {
        scene
            .mask(region, resolution)
            .ok_or_else(|| Error::MissingMask {
                metric: self.short_name(),
                scene: scene.name().to_string(),
                resolution,
            })
    }
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl<'a> ScoreInput<'a> {
    /// Check that the disparity and mask share the ground truth's pixel grid.
    pub fn ensure_shapes(&self) -> Result<()> {
        let (height, width) = self.gt.shape();
        self.disparity.ensure_shape(height, width)?;

        if self.mask.shape() != (height, width) {
            return Err(Error::ShapeMismatch {
                expected: (height, width),
                actual: self.mask.shape(),
            });
        }

        Ok(())
    }
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Metrics evaluated on every scene at low resolution.
pub fn general_metrics(settings: &EvaluationSettings) -> Vec<Box<dyn Metric>> {
    vec![
        Box::new(Mse::new(settings.mse_factor)),
        Box::new(BadPix::new(settings.bad_pix_threshold)),
    ]
}

/// Metrics restricted to region masks.
pub fn region_metrics(settings: &EvaluationSettings) -> Vec<Box<dyn Metric>> {
    vec![
        Box::new(Bumpiness::planes(settings.bumpiness_clip, settings.bumpiness_factor)),
        Box::new(Bumpiness::continuous_surfaces(
            settings.bumpiness_clip,
            settings.bumpiness_factor,
        )),
        Box::new(Discontinuities::new(settings.discontinuity_threshold)),
        Box::new(FineFattening::new(settings.fine_threshold, settings.fattening_dilation)),
        Box::new(FineThinning::new(settings.fine_threshold)),
    ]
}

/// The eight metrics of the benchmark overview chart.
pub fn benchmark_metrics(settings: &EvaluationSettings) -> Vec<Box<dyn Metric>> {
    let clip = settings.bumpiness_clip;
    let factor = settings.bumpiness_factor;

    vec![
        Box::new(Mse::new(settings.mse_factor)),
        Box::new(BadPix::new(settings.bad_pix_threshold)),
        Box::new(Bumpiness::planes(clip, factor).with_description("Planar\nSurfaces")),
        Box::new(
            Bumpiness::continuous_surfaces(clip, factor).with_description("Continuous\nSurfaces"),
        ),
        Box::new(
            FineThinning::new(settings.fine_threshold)
                .with_description("Fine Structure\nThinning"),
        ),
        Box::new(
            FineFattening::new(settings.fine_threshold, settings.fattening_dilation)
                .with_description("Fine Structure\nFattening"),
        ),
        Box::new(
            Discontinuities::new(settings.discontinuity_threshold)
                .with_description("Discontinuity\nRegions"),
        ),
        Box::new(Runtime::new(true)),
    ]
}

/// Iterate `(index, algorithm, ground truth)` over the masked pixels.
///
/// Fails if the maps do not share a shape or the mask is empty.
pub(crate) fn masked_pixels<'a>(
    input: &'a ScoreInput<'_>,
    metric: &dyn Metric,
) -> Result<impl Iterator<Item = (usize, f32, f32)> + 'a> {
    input.ensure_shapes()?;
    if input.mask.is_empty() {
        return Err(Error::EmptyMask {
            metric: metric.short_name(),
        });
    }

    let algo: &'a [f32] = input.disparity.as_slice();
    let gt: &'a [f32] = input.gt.as_slice();
    let mask: &'a [bool] = input.mask.as_slice();

    Ok(mask
        .iter()
        .enumerate()
        .filter(|(_, m)| **m)
        .map(move |(i, _)| (i, algo[i], gt[i])))
}

/// Percentage of masked pixels for which `is_bad(algo, gt)` holds.
pub(crate) fn bad_pixel_percentage<F>(
    input: &ScoreInput<'_>,
    metric: &dyn Metric,
    with_visualization: bool,
    is_bad: F,
) -> Result<MetricScore>
where
    F: Fn(f32, f32) -> bool,
{
    let mut vis = if with_visualization {
        Some(DisparityMap::new(input.gt.width(), input.gt.height()))
    }
    else {
        None
    };
    let width = input.gt.width();

    let mut total = 0usize;
    let mut bad = 0usize;
    for (i, a, g) in masked_pixels(input, metric)? {
        total += 1;
        if is_bad(a, g) {
            bad += 1;
            if let Some(vis) = vis.as_mut() {
                vis.put(i % width, i / width, 1.0);
            }
        }
    }

    Ok(MetricScore {
        value: 100.0 * bad as f64 / total as f64,
        visualization: vis,
    })
}
