//! # Scenes
//!
//! A scene supplies ground truth disparity, the center view of the light field, region masks and
//! the camera geometry. Scenes are immutable: every accessor that depends on the sampling density
//! takes an explicit [`Resolution`].

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::collections::HashMap;
use std::fmt;

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::disparity::{DisparityMap, Mask};
use crate::error::*;

// -----------------------------------------------------------------------------------------------
// CONSTANTS
// -----------------------------------------------------------------------------------------------

/// Per-axis sampling factor of high resolution ground truth.
pub const HIGH_RES_SCALE: f64 = 10.0;

// -----------------------------------------------------------------------------------------------
// ENUMERATIONS
// -----------------------------------------------------------------------------------------------

/// Sampling density of an evaluation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    Low,
    High,
}

/// Named region for which scenes provide evaluation masks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Planes,
    ContinuousSurfaces,
    Discontinuities,
    FineStructure,
}

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Camera and lens parameters of a scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraGeometry {
    pub baseline_mm: f64,
    pub focal_length_mm: f64,
    pub sensor_size_mm: f64,
    pub focus_distance_m: f64,
    pub original_height: usize,
    pub original_width: usize,
}

/// Scene backed by assets held in memory.
pub struct InMemoryScene {
    name: String,
    display_name: Option<String>,
    geometry: CameraGeometry,
    center_view: RgbImage,
    gt: HashMap<Resolution, DisparityMap>,
    masks: HashMap<(Region, Resolution), Mask>,
}

// -----------------------------------------------------------------------------------------------
// TRAITS
// -----------------------------------------------------------------------------------------------

pub trait Scene {
    /// Unique scene identifier.
    fn name(&self) -> &str;

    fn display_name(&self) -> String {
        self.name().to_string()
    }

    fn geometry(&self) -> &CameraGeometry;

    /// Center view of the light field, 8 bit RGB at low resolution.
    fn center_view(&self) -> Result<RgbImage>;

    /// Ground truth disparity sampled at the given resolution.
    fn ground_truth(&self, resolution: Resolution) -> Result<DisparityMap>;

    /// Mask asset of `region`, if the scene provides one at this resolution.
    fn mask(&self, region: Region, resolution: Resolution) -> Option<Mask>;

    fn original_height(&self) -> usize {
        self.geometry().original_height
    }

    fn original_width(&self) -> usize {
        self.geometry().original_width
    }

    /// Mask excluding `offset` low resolution pixels along every border.
    fn boundary_mask(&self, resolution: Resolution, offset: usize) -> Mask {
        let (height, width) = self.geometry().shape(resolution);
        Mask::boundary(width, height, offset * resolution.factor())
    }
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl Resolution {
    /// Multiplier applied to the scene's pixel grid along each axis.
    pub fn scale(self) -> f64 {
        match self {
            Resolution::Low => 1.0,
            Resolution::High => HIGH_RES_SCALE,
        }
    }

    pub fn factor(self) -> usize {
        self.scale() as usize
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Low => write!(f, "low"),
            Resolution::High => write!(f, "high"),
        }
    }
}

impl CameraGeometry {
    /// Pixel shape `(height, width)` at the given resolution.
    pub fn shape(&self, resolution: Resolution) -> (usize, usize) {
        let f = resolution.factor();
        (self.original_height * f, self.original_width * f)
    }

    pub fn focus_distance_mm(&self) -> f64 {
        self.focus_distance_m * 1000.0
    }

    fn max_res(&self) -> f64 {
        self.original_width.max(self.original_height) as f64
    }

    /// Depth in millimeters of a pixel with disparity `d`.
    ///
    /// The baseline term keeps the denominator positive at zero disparity.
    pub fn depth_mm(&self, d: f64) -> f64 {
        let max_res = self.max_res();
        let focus_dist_mm = self.focus_distance_mm();
        let b = self.baseline_mm * self.focal_length_mm * focus_dist_mm * max_res;

        b / (d * focus_dist_mm * self.sensor_size_mm
            + self.baseline_mm * self.focal_length_mm * max_res)
    }
}

impl InMemoryScene {
    /// Create a scene from its low resolution ground truth and center view.
    pub fn new(
        name: &str,
        geometry: CameraGeometry,
        center_view: RgbImage,
        gt: DisparityMap,
    ) -> Result<Self> {
        let (height, width) = geometry.shape(Resolution::Low);
        gt.ensure_shape(height, width)?;

        let view_shape = (center_view.height() as usize, center_view.width() as usize);
        if view_shape != (height, width) {
            return Err(Error::ShapeMismatch {
                expected: (height, width),
                actual: view_shape,
            });
        }

        let mut gts = HashMap::new();
        gts.insert(Resolution::Low, gt);

        Ok(InMemoryScene {
            name: name.to_string(),
            display_name: None,
            geometry,
            center_view,
            gt: gts,
            masks: HashMap::new(),
        })
    }

    pub fn with_display_name(mut self, display_name: &str) -> Self {
        self.display_name = Some(display_name.to_string());
        self
    }

    pub fn with_high_res_gt(mut self, gt: DisparityMap) -> Result<Self> {
        let (height, width) = self.geometry.shape(Resolution::High);
        gt.ensure_shape(height, width)?;
        self.gt.insert(Resolution::High, gt);
        Ok(self)
    }

    pub fn with_mask(mut self, region: Region, resolution: Resolution, mask: Mask) -> Result<Self> {
        let expected = self.geometry.shape(resolution);
        if mask.shape() != expected {
            return Err(Error::ShapeMismatch {
                expected,
                actual: mask.shape(),
            });
        }

        self.masks.insert((region, resolution), mask);
        Ok(self)
    }
}

impl Scene for InMemoryScene {
    fn name(&self) -> &str {
        &self.name
    }

    fn display_name(&self) -> String {
        self.display_name.clone().unwrap_or_else(|| self.name.clone())
    }

    fn geometry(&self) -> &CameraGeometry {
        &self.geometry
    }

    fn center_view(&self) -> Result<RgbImage> {
        Ok(self.center_view.clone())
    }

    fn ground_truth(&self, resolution: Resolution) -> Result<DisparityMap> {
        self.gt
            .get(&resolution)
            .cloned()
            .ok_or_else(|| Error::MissingGroundTruth {
                scene: self.name.clone(),
                resolution,
            })
    }

    fn mask(&self, region: Region, resolution: Resolution) -> Option<Mask> {
        self.masks.get(&(region, resolution)).cloned()
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn geometry() -> CameraGeometry {
        CameraGeometry {
            baseline_mm: 50.0,
            focal_length_mm: 100.0,
            sensor_size_mm: 35.0,
            focus_distance_m: 3.5,
            original_height: 4,
            original_width: 6,
        }
    }

    fn scene() -> InMemoryScene {
        InMemoryScene::new("cotton", geometry(), RgbImage::new(6, 4), DisparityMap::new(6, 4))
            .unwrap()
    }

    #[test]
    fn zero_disparity_lies_on_focal_plane() {
        assert_relative_eq!(geometry().depth_mm(0.0), 3500.0, epsilon = 1e-9);
        assert!(geometry().depth_mm(1.0) < 3500.0);
    }

    #[test]
    fn high_resolution_shape_is_scaled() {
        assert_eq!(geometry().shape(Resolution::Low), (4, 6));
        assert_eq!(geometry().shape(Resolution::High), (40, 60));
    }

    #[test]
    fn assets_must_match_resolution() {
        assert!(scene().with_high_res_gt(DisparityMap::new(6, 4)).is_err());
        assert!(scene()
            .with_mask(Region::Planes, Resolution::High, Mask::full(6, 4))
            .is_err());

        let scene = scene()
            .with_display_name("Cotton")
            .with_mask(Region::Planes, Resolution::Low, Mask::full(6, 4))
            .unwrap();
        assert_eq!(scene.display_name(), "Cotton");
        assert!(scene.mask(Region::Planes, Resolution::Low).is_some());
        assert!(scene.mask(Region::Planes, Resolution::High).is_none());
    }

    #[test]
    fn missing_high_res_gt_is_reported() {
        match scene().ground_truth(Resolution::High) {
            Err(Error::MissingGroundTruth { scene, resolution }) => {
                assert_eq!(scene, "cotton");
                assert_eq!(resolution, Resolution::High);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn boundary_scales_with_resolution() {
        let s = scene();
        assert_eq!(s.boundary_mask(Resolution::Low, 1).count(), 4 * 2);
        assert_eq!(s.boundary_mask(Resolution::High, 1).count(), 40 * 20);
    }

    #[test]
    fn geometry_reads_from_toml() {
        let parsed: CameraGeometry = toml::from_str(
            "baseline_mm = 50.0\n\
             focal_length_mm = 100.0\n\
             sensor_size_mm = 35.0\n\
             focus_distance_m = 3.5\n\
             original_height = 4\n\
             original_width = 6\n",
        )
        .unwrap();

        assert_eq!(parsed, geometry());
        assert_relative_eq!(parsed.focus_distance_mm(), 3500.0);
    }
}
