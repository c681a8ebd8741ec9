//! Pixel <-> map coordinate transformers.
//!
//! Projection math lives outside this crate. A [`CrsTransformer`] is the
//! seam through which label stores move boxes between the scene pixel frame
//! and the map frame of a GeoJSON file.

use crate::error::SceneLabelError;

/// Converts points between pixel `(x = column, y = row)` and map coordinates.
pub trait CrsTransformer: Send + Sync {
    /// Converts a pixel point into map coordinates.
    fn pixel_to_map(&self, point: (f64, f64)) -> (f64, f64);

    /// Converts a map point into pixel coordinates.
    fn map_to_pixel(&self, point: (f64, f64)) -> (f64, f64);
}

/// Transformer for scenes whose labels are already in pixel coordinates.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityTransformer;

impl CrsTransformer for IdentityTransformer {
    fn pixel_to_map(&self, point: (f64, f64)) -> (f64, f64) {
        point
    }

    fn map_to_pixel(&self, point: (f64, f64)) -> (f64, f64) {
        point
    }
}

/// North-up affine transformer: map = origin + pixel * pixel size.
///
/// `pixel_height` is usually negative, since rows grow southward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransformer {
    origin_x: f64,
    origin_y: f64,
    pixel_width: f64,
    pixel_height: f64,
}

impl AffineTransformer {
    /// Creates a transformer from the map position of the top-left pixel
    /// corner and the size of one pixel in map units.
    ///
    /// # Errors
    /// Returns [`SceneLabelError::InvalidArgument`] if either pixel size is
    /// zero or not finite.
    pub fn new(
        origin_x: f64,
        origin_y: f64,
        pixel_width: f64,
        pixel_height: f64,
    ) -> Result<Self, SceneLabelError> {
        let usable = |v: f64| v.is_finite() && v != 0.0;
        if !usable(pixel_width) || !usable(pixel_height) {
            return Err(SceneLabelError::InvalidArgument(format!(
                "pixel size must be finite and non-zero, got {}x{}",
                pixel_width, pixel_height
            )));
        }
        Ok(Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
        })
    }
}

impl CrsTransformer for AffineTransformer {
    fn pixel_to_map(&self, (col, row): (f64, f64)) -> (f64, f64) {
        (
            self.origin_x + col * self.pixel_width,
            self.origin_y + row * self.pixel_height,
        )
    }

    fn map_to_pixel(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (
            (x - self.origin_x) / self.pixel_width,
            (y - self.origin_y) / self.pixel_height,
        )
    }
}
