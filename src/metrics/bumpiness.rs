//! # Bumpiness
//!
//! Measures how smooth the reconstructed surface is relative to the ground truth, using the
//! Frobenius norm of the Hessian of the disparity error.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use crate::disparity::DisparityMap;
use crate::error::*;
use crate::metrics::{masked_pixels, Metric, MetricScore, ScoreInput};
use crate::scene::Region;

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

pub struct Bumpiness {
    region: Region,
    clip: f32,
    factor: f64,
    description: Option<String>,
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl Bumpiness {
    /// Bumpiness on planar surfaces.
    pub fn planes(clip: f32, factor: f64) -> Self {
        Bumpiness {
            region: Region::Planes,
            clip,
            factor,
            description: None,
        }
    }

    /// Bumpiness on smooth non-planar surfaces.
    pub fn continuous_surfaces(clip: f32, factor: f64) -> Self {
        Bumpiness {
            region: Region::ContinuousSurfaces,
            clip,
            factor,
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Clipped Hessian norm of `algo - gt` per pixel, zero on the outermost pixel ring.
    fn hessian_norm(&self, algo: &DisparityMap, gt: &DisparityMap) -> DisparityMap {
        let (height, width) = gt.shape();
        let diff = |x: usize, y: usize| algo.get(x, y) - gt.get(x, y);

        DisparityMap::from_fn(width, height, |x, y| {
            if x == 0 || y == 0 || x + 1 >= width || y + 1 >= height {
                return 0.0;
            }

            let c = diff(x, y);
            let dxx = diff(x + 1, y) - 2.0 * c + diff(x - 1, y);
            let dyy = diff(x, y + 1) - 2.0 * c + diff(x, y - 1);
            let dxy = (diff(x + 1, y + 1) - diff(x + 1, y - 1) - diff(x - 1, y + 1)
                + diff(x - 1, y - 1))
                / 4.0;

            let norm = (dxx * dxx + 2.0 * dxy * dxy + dyy * dyy).sqrt();
            norm.min(self.clip)
        })
    }
}

impl Metric for Bumpiness {
    fn display_name(&self) -> String {
        if let Some(d) = &self.description {
            return d.clone();
        }

        match self.region {
            Region::Planes => "Bumpiness Planes".to_string(),
            _ => "Bumpiness Continuous Surfaces".to_string(),
        }
    }

    fn short_name(&self) -> String {
        match self.region {
            Region::Planes => "Bump. Planes".to_string(),
            _ => "Bump. Cont. Surf.".to_string(),
        }
    }

    fn region(&self) -> Option<Region> {
        Some(self.region)
    }

    fn evaluate_on_high_res(&self) -> bool {
        false
    }

    fn score(&self, input: &ScoreInput<'_>, with_visualization: bool) -> Result<MetricScore> {
        input.ensure_shapes()?;
        let norm = self.hessian_norm(input.disparity, input.gt);
        let values = norm.as_slice();

        let mut sum = 0.0f64;
        let mut count = 0usize;
        for (i, _, _) in masked_pixels(input, self)? {
            sum += values[i] as f64;
            count += 1;
        }

        Ok(MetricScore {
            value: self.factor * sum / count as f64,
            visualization: if with_visualization { Some(norm) } else { None },
        })
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disparity::Mask;
    use approx::assert_relative_eq;

    fn input<'a>(algo: &'a DisparityMap, gt: &'a DisparityMap, mask: &'a Mask) -> ScoreInput<'a> {
        ScoreInput {
            scene: "synthetic",
            algorithm: "test",
            disparity: algo,
            gt,
            mask,
            runtime: None,
        }
    }

    #[test]
    fn tilted_plane_is_not_bumpy() {
        let gt = DisparityMap::new(8, 8);
        let algo = DisparityMap::from_fn(8, 8, |x, y| 0.3 * x as f32 - 0.1 * y as f32);
        let mask = Mask::boundary(8, 8, 1);

        let score = Bumpiness::planes(0.05, 100.0)
            .score(&input(&algo, &gt, &mask), false)
            .unwrap();

        assert_relative_eq!(score.value, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn checkerboard_noise_is_clipped() {
        let gt = DisparityMap::new(8, 8);
        let algo = DisparityMap::from_fn(8, 8, |x, y| if (x + y) % 2 == 0 { 0.1 } else { 0.0 });
        let mask = Mask::boundary(8, 8, 1);

        let score = Bumpiness::continuous_surfaces(0.05, 100.0)
            .score(&input(&algo, &gt, &mask), true)
            .unwrap();

        assert_relative_eq!(score.value, 5.0, epsilon = 1e-4);
        assert!(score.visualization.is_some());
    }

    #[test]
    fn mismatched_maps_are_rejected() {
        let gt = DisparityMap::new(8, 8);
        let algo = DisparityMap::new(4, 4);
        let mask = Mask::full(8, 8);

        match Bumpiness::planes(0.05, 100.0).score(&input(&algo, &gt, &mask), false) {
            Err(Error::ShapeMismatch { expected, actual }) => {
                assert_eq!(expected, (8, 8));
                assert_eq!(actual, (4, 4));
            }
            other => panic!("unexpected result {:?}", other.map(|s| s.value)),
        }
    }
}
