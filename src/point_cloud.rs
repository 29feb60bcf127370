//! # Point clouds
//!
//! Reconstructs a colored point cloud from a disparity map using the scene's camera geometry, and
//! writes it as an ASCII PLY file.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::disparity::DisparityMap;
use crate::error::*;
use crate::scene::Scene;

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// A colored 3D point, coordinates in millimeters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl Point {
    /// Whether all coordinates are finite. Colors are not checked.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Project every pixel of `disp_map` into camera space.
///
/// Returns one point per pixel in row-major order, invalid points included. The camera looks
/// down the negative z axis with y pointing up. Colors are taken from the scene's center view.
pub fn convert(scene: &dyn Scene, disp_map: &DisparityMap) -> Result<Vec<Point>> {
    let geometry = scene.geometry();
    let (height, width) = (scene.original_height(), scene.original_width());
    disp_map.ensure_shape(height, width)?;

    let center_view = scene.center_view()?;
    let view_shape = (center_view.height() as usize, center_view.width() as usize);
    if view_shape != (height, width) {
        return Err(Error::ShapeMismatch {
            expected: (height, width),
            actual: view_shape,
        });
    }

    let norm_x = (width.max(2) - 1) as f64;
    let norm_y = (height.max(2) - 1) as f64;
    let scale = geometry.sensor_size_mm / geometry.focal_length_mm;

    let mut points = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let z = geometry.depth_mm(disp_map.get(x, y) as f64);
            let px = (x as f64 / norm_x - 0.5) * scale * z;
            let py = (y as f64 / norm_y - 0.5) * scale * z;
            let rgb = center_view.get_pixel(x as u32, y as u32);

            points.push(Point {
                x: px,
                y: -py,
                z: -z,
                r: rgb[0],
                g: rgb[1],
                b: rgb[2],
            });
        }
    }

    Ok(points)
}

/// Points with finite coordinates.
pub fn valid_points(points: &[Point]) -> Vec<Point> {
    points.iter().filter(|p| p.is_valid()).copied().collect()
}

/// Write the valid points as ASCII PLY.
pub fn write_ply<W: Write>(points: &[Point], writer: &mut W) -> Result<usize> {
    let valid = valid_points(points);

    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "element vertex {}", valid.len())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "property uchar red")?;
    writeln!(writer, "property uchar green")?;
    writeln!(writer, "property uchar blue")?;
    writeln!(writer, "end_header")?;

    for p in valid.iter() {
        writeln!(
            writer,
            "{:010.6} {:010.6} {:010.6} {} {} {}",
            p.x, p.y, p.z, p.r, p.g, p.b
        )?;
    }

    Ok(valid.len())
}

/// Save the valid points to `path` as ASCII PLY, creating missing parent directories.
///
/// Returns the number of points written. A failed write leaves a partial file behind.
pub fn save<P: AsRef<Path>>(points: &[Point], path: P) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    let written = write_ply(points, &mut writer)?;
    writer.flush()?;

    debug!("Wrote {} of {} points to {}", written, points.len(), path.display());
    Ok(written)
}
