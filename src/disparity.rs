//! # Disparity maps and masks
//!
//! This module provides the floating point disparity map and the boolean region mask shared by
//! the metrics, the scorer and the point cloud reconstruction.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::distance_transform::Norm;
use crate::error::*;

// -----------------------------------------------------------------------------------------------
// TYPES
// -----------------------------------------------------------------------------------------------

/// Single channel floating point image.
pub type GrayFloatImage = ImageBuffer<Luma<f32>, Vec<f32>>;

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// A generic floating point disparity map.
///
/// Values are stored row-major, so iterating the map visits pixel `(x, y)` at index
/// `y * width + x`.
#[derive(Clone, Debug, PartialEq)]
pub struct DisparityMap {
    data: GrayFloatImage,
}

/// Boolean pixel set marking where a metric is evaluated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    data: Vec<bool>,
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl DisparityMap {
    /// Create a zero filled map.
    pub fn new(width: usize, height: usize) -> Self {
        DisparityMap {
            data: GrayFloatImage::new(width as u32, height as u32),
        }
    }

    /// Create a map from row-major values.
    pub fn from_vec(width: usize, height: usize, values: Vec<f32>) -> Result<Self> {
        let actual = values.len();
        match GrayFloatImage::from_raw(width as u32, height as u32, values) {
            Some(data) if actual == width * height => Ok(DisparityMap { data }),
            _ => Err(Error::BufferSize {
                expected: width * height,
                actual,
            }),
        }
    }

    /// Create a map by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f32,
    {
        DisparityMap {
            data: GrayFloatImage::from_fn(width as u32, height as u32, |x, y| {
                Luma([f(x as usize, y as usize)])
            }),
        }
    }

    pub fn width(&self) -> usize {
        self.data.width() as usize
    }

    pub fn height(&self) -> usize {
        self.data.height() as usize
    }

    /// Shape as `(height, width)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data.get_pixel(x as u32, y as u32)[0]
    }

    pub fn put(&mut self, x: usize, y: usize, val: f32) {
        self.data.put_pixel(x as u32, y as u32, Luma([val]))
    }

    /// Row-major view of the values.
    pub fn as_slice(&self) -> &[f32] {
        self.data.as_raw()
    }

    /// Fail with a shape mismatch unless the map is `height x width`.
    pub fn ensure_shape(&self, height: usize, width: usize) -> Result<()> {
        if self.shape() == (height, width) {
            Ok(())
        }
        else {
            Err(Error::ShapeMismatch {
                expected: (height, width),
                actual: self.shape(),
            })
        }
    }

    /// Nearest-neighbour resize to `height x width`.
    ///
    /// Only exact integer upscaling is supported; other shapes are reported as a mismatch.
    pub fn upsample_to(&self, height: usize, width: usize) -> Result<DisparityMap> {
        if self.shape() == (height, width) {
            return Ok(self.clone());
        }

        let mismatch = Error::ShapeMismatch {
            expected: (height, width),
            actual: self.shape(),
        };

        if self.width() == 0 || self.height() == 0
            || width % self.width() != 0 || height % self.height() != 0
        {
            return Err(mismatch);
        }

        let fx = width / self.width();
        let fy = height / self.height();
        if fx != fy {
            return Err(mismatch);
        }

        Ok(DisparityMap::from_fn(width, height, |x, y| self.get(x / fx, y / fy)))
    }

    /// Finite minimum and maximum disparity, if the map holds any finite value.
    pub fn range(&self) -> Option<(f32, f32)> {
        self.as_slice()
            .iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Converts the image into a dynamic Luma8 image.
    pub fn to_luma(&self) -> GrayImage {
        to_luma(&self.data, 0.0, 1.0)
    }

    /// Converts the image to a normalised GrayImage.
    ///
    /// Stretches the finite disparity range of the map to 0..255. Maps without a finite range
    /// are equivalent to `.to_luma()`.
    pub fn to_luma_normalised(&self) -> GrayImage {
        match self.range() {
            Some((lo, hi)) if hi > lo => to_luma(&self.data, lo, 255.0 / (hi - lo)),
            _ => self.to_luma(),
        }
    }
}

impl Mask {
    /// Mask including every pixel.
    pub fn full(width: usize, height: usize) -> Self {
        Mask {
            width,
            height,
            data: vec![true; width * height],
        }
    }

    /// Mask excluding every pixel.
    pub fn empty(width: usize, height: usize) -> Self {
        Mask {
            width,
            height,
            data: vec![false; width * height],
        }
    }

    pub fn from_vec(width: usize, height: usize, data: Vec<bool>) -> Result<Self> {
        if data.len() != width * height {
            return Err(Error::BufferSize {
                expected: width * height,
                actual: data.len(),
            });
        }

        Ok(Mask { width, height, data })
    }

    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> bool,
    {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }

        Mask { width, height, data }
    }

    /// Mask excluding a border of `offset` pixels on every side.
    pub fn boundary(width: usize, height: usize, offset: usize) -> Self {
        Mask::from_fn(width, height, |x, y| {
            x >= offset && y >= offset && x + offset < width && y + offset < height
        })
    }

    /// Interpret every non-zero pixel of a grayscale image as included.
    pub fn from_luma(image: &GrayImage) -> Self {
        Mask {
            width: image.width() as usize,
            height: image.height() as usize,
            data: image.as_raw().iter().map(|&v| v > 0).collect(),
        }
    }

    pub fn to_luma(&self) -> GrayImage {
        let raw = self.data.iter().map(|&b| if b { 255 } else { 0 }).collect();
        // Length always matches the dimensions.
        GrayImage::from_raw(self.width as u32, self.height as u32, raw)
            .unwrap_or_else(|| GrayImage::new(self.width as u32, self.height as u32))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Shape as `(height, width)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, val: bool) {
        self.data[y * self.width + x] = val;
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.data
    }

    /// Number of included pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&b| b).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.data.iter().any(|&b| b)
    }

    /// Pixels included in both masks.
    pub fn and(&self, other: &Mask) -> Result<Mask> {
        self.combine(other, |a, b| a && b)
    }

    /// Pixels included in `self` but not in `other`.
    pub fn and_not(&self, other: &Mask) -> Result<Mask> {
        self.combine(other, |a, b| a && !b)
    }

    /// Grow the mask by `radius` pixels under the chessboard norm.
    pub fn dilate(&self, radius: u8) -> Mask {
        let grown = imageproc::morphology::dilate(&self.to_luma(), Norm::LInf, radius);
        Mask::from_luma(&grown)
    }

    fn combine<F>(&self, other: &Mask, op: F) -> Result<Mask>
    where
        F: Fn(bool, bool) -> bool,
    {
        if self.shape() != other.shape() {
            return Err(Error::ShapeMismatch {
                expected: self.shape(),
                actual: other.shape(),
            });
        }

        Ok(Mask {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| op(a, b))
                .collect(),
        })
    }
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Map `(v - offset) * mult` into a clamped 8 bit image. Non-finite values become black.
fn to_luma(data: &GrayFloatImage, offset: f32, mult: f32) -> GrayImage {
    let mut new = GrayImage::new(data.width(), data.height());

    for y in 0..new.height() {
        for x in 0..new.width() {
            let mut val = (data.get_pixel(x, y)[0] - offset) * mult;

            if !val.is_finite() || val < 0.0 {
                val = 0.0;
            }
            else if val > 255.0 {
                val = 255.0;
            }

            *new.get_pixel_mut(x, y) = Luma([val as u8]);
        }
    }

    new
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsample_repeats_pixels() {
        let map = DisparityMap::from_vec(2, 1, vec![1.0, 2.0]).unwrap();
        let up = map.upsample_to(3, 6).unwrap();

        assert_eq!(up.shape(), (3, 6));
        assert_eq!(up.get(2, 2), 1.0);
        assert_eq!(up.get(3, 0), 2.0);
    }

    #[test]
    fn upsample_rejects_non_integer_factor() {
        let map = DisparityMap::new(4, 4);

        match map.upsample_to(6, 6) {
            Err(Error::ShapeMismatch { expected, actual }) => {
                assert_eq!(expected, (6, 6));
                assert_eq!(actual, (4, 4));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn from_vec_checks_length() {
        assert!(DisparityMap::from_vec(3, 3, vec![0.0; 8]).is_err());
        assert!(Mask::from_vec(3, 3, vec![true; 10]).is_err());
    }

    #[test]
    fn normalised_preview_stretches_range() {
        let map = DisparityMap::from_vec(3, 1, vec![-1.0, 0.0, 1.0]).unwrap();
        let img = map.to_luma_normalised();

        assert_eq!(img.get_pixel(0, 0)[0], 0);
        assert_eq!(img.get_pixel(1, 0)[0], 127);
        assert_eq!(img.get_pixel(2, 0)[0], 255);
    }

    #[test]
    fn boundary_mask_excludes_border() {
        let mask = Mask::boundary(5, 4, 1);

        assert_eq!(mask.count(), 3 * 2);
        assert!(!mask.get(0, 0));
        assert!(mask.get(1, 1));
        assert!(!mask.get(4, 2));
    }

    #[test]
    fn dilate_grows_single_pixel() {
        let mut mask = Mask::empty(7, 7);
        mask.set(3, 3, true);

        let grown = mask.dilate(1);
        assert_eq!(grown.count(), 9);
        assert!(grown.get(2, 4));
        assert!(!grown.get(1, 3));
    }
}
