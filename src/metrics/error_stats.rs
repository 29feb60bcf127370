//! # Pixel error statistics
//!
//! Mean squared error and bad pixel ratios.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use crate::disparity::DisparityMap;
use crate::error::*;
use crate::metrics::{bad_pixel_percentage, masked_pixels, Metric, MetricScore, ScoreInput};
use crate::scene::Region;

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Scaled mean squared disparity error.
pub struct Mse {
    factor: f64,
    description: Option<String>,
}

/// Percentage of pixels whose absolute disparity error exceeds a threshold.
pub struct BadPix {
    threshold: f32,
    description: Option<String>,
}

/// Bad pixel ratio restricted to depth discontinuities, evaluated at high resolution.
pub struct Discontinuities {
    threshold: f32,
    description: Option<String>,
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl Mse {
    pub fn new(factor: f64) -> Self {
        Mse {
            factor,
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

impl Metric for Mse {
    fn display_name(&self) -> String {
        self.description.clone().unwrap_or_else(|| "MSE".to_string())
    }

    fn short_name(&self) -> String {
        format!("MSE*{}", self.factor)
    }

    fn region(&self) -> Option<Region> {
        None
    }

    fn evaluate_on_high_res(&self) -> bool {
        false
    }

    fn score(&self, input: &ScoreInput<'_>, with_visualization: bool) -> Result<MetricScore> {
        let mut sum = 0.0f64;
        let mut count = 0usize;

        for (_, a, g) in masked_pixels(input, self)? {
            let diff = (a - g) as f64;
            sum += diff * diff;
            count += 1;
        }

        let visualization = if with_visualization {
            Some(signed_error(input.disparity, input.gt))
        }
        else {
            None
        };

        Ok(MetricScore {
            value: self.factor * sum / count as f64,
            visualization,
        })
    }
}

impl BadPix {
    pub fn new(threshold: f32) -> Self {
        BadPix {
            threshold,
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

impl Metric for BadPix {
    fn display_name(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| format!("BadPix({})", self.threshold))
    }

    fn short_name(&self) -> String {
        format!("BadPix({})", self.threshold)
    }

    fn region(&self) -> Option<Region> {
        None
    }

    fn evaluate_on_high_res(&self) -> bool {
        false
    }

    fn score(&self, input: &ScoreInput<'_>, with_visualization: bool) -> Result<MetricScore> {
        let t = self.threshold;
        bad_pixel_percentage(input, self, with_visualization, |a, g| (a - g).abs() > t)
    }
}

impl Discontinuities {
    pub fn new(threshold: f32) -> Self {
        Discontinuities {
            threshold,
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

impl Metric for Discontinuities {
    fn display_name(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| "Discontinuities".to_string())
    }

    fn short_name(&self) -> String {
        "Discontinuities".to_string()
    }

    fn region(&self) -> Option<Region> {
        Some(Region::Discontinuities)
    }

    fn evaluate_on_high_res(&self) -> bool {
        true
    }

    fn score(&self, input: &ScoreInput<'_>, with_visualization: bool) -> Result<MetricScore> {
        let t = self.threshold;
        bad_pixel_percentage(input, self, with_visualization, |a, g| (a - g).abs() > t)
    }
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

fn signed_error(algo: &DisparityMap, gt: &DisparityMap) -> DisparityMap {
    DisparityMap::from_fn(gt.width(), gt.height(), |x, y| algo.get(x, y) - gt.get(x, y))
}
