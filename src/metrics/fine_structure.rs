//! # Fine structure metrics
//!
//! Thin foreground structures tend to be either inflated into the background (fattening) or lost
//! entirely (thinning). Both are measured at high resolution on the scene's fine structure mask.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use crate::disparity::Mask;
use crate::error::*;
use crate::metrics::{bad_pixel_percentage, Metric, MetricScore, ScoreInput};
use crate::scene::{Region, Resolution, Scene};

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Percentage of background pixels next to fine structures that are estimated too close.
pub struct FineFattening {
    threshold: f32,
    dilation: u8,
    description: Option<String>,
}

/// Percentage of fine structure pixels that are estimated too far.
pub struct FineThinning {
    threshold: f32,
    description: Option<String>,
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl FineFattening {
    pub fn new(threshold: f32, dilation: u8) -> Self {
        FineFattening {
            threshold,
            dilation,
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

impl Metric for FineFattening {
    fn display_name(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| "Fine Fattening".to_string())
    }

    fn short_name(&self) -> String {
        "Fine Fattening".to_string()
    }

    fn region(&self) -> Option<Region> {
        Some(Region::FineStructure)
    }

    fn evaluate_on_high_res(&self) -> bool {
        true
    }

    /// The band of `dilation` pixels around the fine structures, without the structures.
    fn evaluation_mask(
        &self,
        scene: &dyn Scene,
        resolution: Resolution,
        boundary_offset: usize,
    ) -> Result<Mask> {
        let fine = self.region_mask(scene, Region::FineStructure, resolution)?;
        let band = fine.dilate(self.dilation).and_not(&fine)?;

        band.and(&scene.boundary_mask(resolution, boundary_offset))
    }

    fn score(&self, input: &ScoreInput<'_>, with_visualization: bool) -> Result<MetricScore> {
        let t = self.threshold;
        bad_pixel_percentage(input, self, with_visualization, |a, g| a - g > t)
    }

    fn format_score(&self, score: f64) -> String {
        format!("{:.2}%", score)
    }
}

impl FineThinning {
    pub fn new(threshold: f32) -> Self {
        FineThinning {
            threshold,
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

impl Metric for FineThinning {
    fn display_name(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| "Fine Thinning".to_string())
    }

    fn short_name(&self) -> String {
        "Fine Thinning".to_string()
    }

    fn region(&self) -> Option<Region> {
        Some(Region::FineStructure)
    }

    fn evaluate_on_high_res(&self) -> bool {
        true
    }

    fn score(&self, input: &ScoreInput<'_>, with_visualization: bool) -> Result<MetricScore> {
        let t = self.threshold;
        bad_pixel_percentage(input, self, with_visualization, |a, g| g - a > t)
    }

    fn format_score(&self, score: f64) -> String {
        format!("{:.2}%", score)
    }
}
