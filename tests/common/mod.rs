//! Synthetic scenes shared by the integration tests.

#![allow(dead_code)]

use image::{Rgb, RgbImage};
use lightfield_eval::prelude::*;

pub const WIDTH: usize = 12;
pub const HEIGHT: usize = 12;

/// Unit camera: 1mm baseline, focal length and sensor, focused at 1m.
pub fn geometry(width: usize, height: usize) -> CameraGeometry {
    CameraGeometry {
        baseline_mm: 1.0,
        focal_length_mm: 1.0,
        sensor_size_mm: 1.0,
        focus_distance_m: 1.0,
        original_height: height,
        original_width: width,
    }
}

/// Center view whose red channel encodes the column and green channel the row.
pub fn gradient_view(width: usize, height: usize) -> RgbImage {
    RgbImage::from_fn(width as u32, height as u32, |x, y| Rgb([x as u8, y as u8, 7]))
}

pub fn constant(width: usize, height: usize, value: f32) -> DisparityMap {
    DisparityMap::from_fn(width, height, |_, _| value)
}

/// Fronto-parallel scene with zero ground truth disparity and no masks.
pub fn flat_scene(name: &str) -> InMemoryScene {
    InMemoryScene::new(
        name,
        geometry(WIDTH, HEIGHT),
        gradient_view(WIDTH, HEIGHT),
        constant(WIDTH, HEIGHT, 0.0),
    )
    .unwrap()
}

/// Flat scene with zero high resolution ground truth and a full mask for `region` at
/// `resolution`.
pub fn masked_scene(name: &str, region: Region, resolution: Resolution) -> InMemoryScene {
    let f = Resolution::High.factor();
    let (w, h) = match resolution {
        Resolution::Low => (WIDTH, HEIGHT),
        Resolution::High => (WIDTH * f, HEIGHT * f),
    };

    flat_scene(name)
        .with_high_res_gt(constant(WIDTH * f, HEIGHT * f, 0.0))
        .unwrap()
        .with_mask(region, resolution, Mask::full(w, h))
        .unwrap()
}

pub fn settings() -> EvaluationSettings {
    EvaluationSettings {
        boundary_offset: 1,
        ..EvaluationSettings::default()
    }
}

pub fn init_logging() {
    env_logger::builder().is_test(true).try_init().ok();
}
