//! Axis-aligned box primitive in `(ymin, xmin, ymax, xmax)` layout.

use geo::{coord, Polygon, Rect};
use serde::{Deserialize, Serialize};

use crate::error::SceneLabelError;

/// An axis-aligned box in pixel coordinates, stored as
/// `(ymin, xmin, ymax, xmax)` (the "npbox" layout).
///
/// Rows grow downward (`y`), columns grow rightward (`x`). The constructor
/// does NOT enforce `min <= max`; callers are responsible for producing
/// well-formed boxes and [`BBox::is_ordered`] reports whether they did.
#[derive(Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub ymin: f64,
    pub xmin: f64,
    pub ymax: f64,
    pub xmax: f64,
}

/// Exact-value key for a box, usable in hash maps.
///
/// Two boxes produce the same key iff all four coordinates are equal
/// (`0.0` and `-0.0` are treated as equal).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxKey([u64; 4]);

impl BBox {
    /// Creates a new box from its four coordinates.
    #[inline]
    pub fn new(ymin: f64, xmin: f64, ymax: f64, xmax: f64) -> Self {
        Self {
            ymin,
            xmin,
            ymax,
            xmax,
        }
    }

    /// Creates a box from a flat `[ymin, xmin, ymax, xmax]` slice.
    ///
    /// # Errors
    /// Returns [`SceneLabelError::MalformedBox`] unless the slice holds
    /// exactly four values.
    pub fn from_npbox(npbox: &[f64]) -> Result<Self, SceneLabelError> {
        match *npbox {
            [ymin, xmin, ymax, xmax] => Ok(Self::new(ymin, xmin, ymax, xmax)),
            _ => Err(SceneLabelError::MalformedBox(npbox.len())),
        }
    }

    /// Creates a box from a `geo` rectangle whose `x` axis is columns and
    /// `y` axis is rows.
    pub fn from_rect(rect: Rect<f64>) -> Self {
        let (min, max) = (rect.min(), rect.max());
        Self::new(min.y, min.x, max.y, max.x)
    }

    /// Returns the box as `[ymin, xmin, ymax, xmax]`.
    #[inline]
    pub fn npbox(&self) -> [f64; 4] {
        [self.ymin, self.xmin, self.ymax, self.xmax]
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Returns `(height, width)`.
    #[inline]
    pub fn size(&self) -> (f64, f64) {
        (self.height(), self.width())
    }

    /// Returns the area of the box.
    ///
    /// May be negative if the box is malformed.
    #[inline]
    pub fn area(&self) -> f64 {
        self.height() * self.width()
    }

    /// Returns true if the box is properly ordered (min <= max for both axes).
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.ymin <= self.ymax && self.xmin <= self.xmax
    }

    /// Returns the exact-value key of this box.
    pub fn key(&self) -> BoxKey {
        // -0.0 and 0.0 must hash the same
        let bits = |v: f64| if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() };
        BoxKey([
            bits(self.ymin),
            bits(self.xmin),
            bits(self.ymax),
            bits(self.xmax),
        ])
    }

    /// Converts the box into a closed polygon with `x` = column, `y` = row.
    pub fn to_polygon(&self) -> Polygon<f64> {
        Rect::new(
            coord! { x: self.xmin, y: self.ymin },
            coord! { x: self.xmax, y: self.ymax },
        )
        .to_polygon()
    }

    /// Translates the box by `dy` rows and `dx` columns.
    #[inline]
    pub fn shift(&self, dy: f64, dx: f64) -> Self {
        Self::new(self.ymin + dy, self.xmin + dx, self.ymax + dy, self.xmax + dx)
    }

    /// Clamps every coordinate of the box into `window`.
    ///
    /// For overlapping boxes this is the intersection. Disjoint boxes
    /// collapse onto the nearest window edge and end up with zero area.
    pub fn clip_to(&self, window: &BBox) -> Self {
        let clamp = |v: f64, lo: f64, hi: f64| v.max(lo).min(hi);
        Self::new(
            clamp(self.ymin, window.ymin, window.ymax),
            clamp(self.xmin, window.xmin, window.xmax),
            clamp(self.ymax, window.ymin, window.ymax),
            clamp(self.xmax, window.xmin, window.xmax),
        )
    }

    /// Returns the area shared by two boxes (0 when disjoint).
    pub fn intersection_area(&self, other: &BBox) -> f64 {
        let h = self.ymax.min(other.ymax) - self.ymin.max(other.ymin);
        let w = self.xmax.min(other.xmax) - self.xmin.max(other.xmin);
        h.max(0.0) * w.max(0.0)
    }

    /// Tiles this box with `size x size` windows whose origins are `stride`
    /// apart.
    ///
    /// Windows start at `(ymin, xmin)` and continue while their origin lies
    /// inside the box, so the last row and column may extend past the far
    /// edge.
    ///
    /// # Errors
    /// Returns [`SceneLabelError::InvalidArgument`] if `size` or `stride` is
    /// not strictly positive, if `stride` is too small to move the origin
    /// at this box's coordinates, or if the tiling would exceed
    /// [`MAX_WINDOWS`] windows.
    pub fn get_windows(&self, size: f64, stride: f64) -> Result<Vec<BBox>, SceneLabelError> {
        if !(size > 0.0 && stride > 0.0) {
            return Err(SceneLabelError::InvalidArgument(format!(
                "window size and stride must be positive (size={}, stride={})",
                size, stride
            )));
        }

        let rows = origin_count(self.ymin, self.ymax, stride)?;
        let cols = origin_count(self.xmin, self.xmax, stride)?;
        if rows.checked_mul(cols).map_or(true, |n| n > MAX_WINDOWS) {
            return Err(SceneLabelError::InvalidArgument(format!(
                "{} x {} windows exceed the limit of {}",
                rows, cols, MAX_WINDOWS
            )));
        }

        let mut windows = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            let row = self.ymin + i as f64 * stride;
            for j in 0..cols {
                let col = self.xmin + j as f64 * stride;
                windows.push(BBox::new(row, col, row + size, col + size));
            }
        }
        Ok(windows)
    }
}

/// Upper bound on the number of windows [`BBox::get_windows`] produces.
pub const MAX_WINDOWS: usize = 1 << 24;

/// Number of origins `start + i * stride` lying below `end`.
fn origin_count(start: f64, end: f64, stride: f64) -> Result<usize, SceneLabelError> {
    if !(start < end) {
        return Ok(0);
    }
    if start + stride <= start {
        return Err(SceneLabelError::InvalidArgument(format!(
            "stride {} does not advance from {}",
            stride, start
        )));
    }

    let steps = ((end - start) / stride).ceil();
    if !(steps <= MAX_WINDOWS as f64) {
        return Err(SceneLabelError::InvalidArgument(format!(
            "stride {} over [{}, {}) exceeds the limit of {} windows",
            stride, start, end, MAX_WINDOWS
        )));
    }

    let mut count = steps as usize;
    // the division may round up past the last origin inside the range
    while count > 1 && start + (count - 1) as f64 * stride >= end {
        count -= 1;
    }
    Ok(count)
}

impl std::fmt::Debug for BBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BBox")
            .field("ymin", &self.ymin)
            .field("xmin", &self.xmin)
            .field("ymax", &self.ymax)
            .field("xmax", &self.xmax)
            .finish()
    }
}

impl From<[f64; 4]> for BBox {
    fn from(npbox: [f64; 4]) -> Self {
        let [ymin, xmin, ymax, xmax] = npbox;
        Self::new(ymin, xmin, ymax, xmax)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;

    #[test]
    fn test_bbox_dimensions() {
        let bbox = BBox::new(10.0, 20.0, 70.0, 110.0);
        assert_eq!(bbox.height(), 60.0);
        assert_eq!(bbox.width(), 90.0);
        assert_eq!(bbox.size(), (60.0, 90.0));
        assert_eq!(bbox.area(), 5400.0);
    }

    #[test]
    fn test_bbox_from_npbox() {
        let bbox = BBox::from_npbox(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(bbox.npbox(), [1.0, 2.0, 3.0, 4.0]);

        let err = BBox::from_npbox(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, SceneLabelError::MalformedBox(3)));
    }

    #[test]
    fn test_bbox_ordering() {
        assert!(BBox::new(0.0, 0.0, 1.0, 1.0).is_ordered());
        assert!(!BBox::new(2.0, 0.0, 1.0, 1.0).is_ordered());
    }

    #[test]
    fn test_bbox_key_ignores_zero_sign() {
        let a = BBox::new(0.0, 1.0, 2.0, 3.0);
        let b = BBox::new(-0.0, 1.0, 2.0, 3.0);
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), BBox::new(0.0, 1.0, 2.0, 3.5).key());
    }

    #[test]
    fn test_bbox_to_polygon() {
        let polygon = BBox::new(10.0, 20.0, 30.0, 60.0).to_polygon();
        assert_eq!(polygon.unsigned_area(), 800.0);

        let rect = geo::BoundingRect::bounding_rect(&polygon).unwrap();
        assert_eq!(BBox::from_rect(rect), BBox::new(10.0, 20.0, 30.0, 60.0));
    }

    #[test]
    fn test_bbox_clip_to() {
        let window = BBox::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            BBox::new(5.0, -5.0, 15.0, 5.0).clip_to(&window),
            BBox::new(5.0, 0.0, 10.0, 5.0)
        );

        let disjoint = BBox::new(20.0, 20.0, 30.0, 30.0).clip_to(&window);
        assert_eq!(disjoint.area(), 0.0);
    }

    #[test]
    fn test_bbox_intersection_area() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersection_area(&BBox::new(5.0, 5.0, 15.0, 15.0)), 25.0);
        assert_eq!(a.intersection_area(&BBox::new(20.0, 20.0, 30.0, 30.0)), 0.0);
    }

    #[test]
    fn test_bbox_get_windows() {
        let extent = BBox::new(0.0, 0.0, 10.0, 15.0);
        let windows = extent.get_windows(10.0, 5.0).unwrap();
        assert_eq!(windows.len(), 2 * 3);
        assert_eq!(windows[0], BBox::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(windows[5], BBox::new(5.0, 10.0, 15.0, 20.0));

        assert!(extent.get_windows(10.0, 0.0).is_err());
    }

    #[test]
    fn test_bbox_get_windows_stride_below_float_spacing() {
        let far = BBox::new(1e17, 0.0, 1e17 + 10.0, 1.0);
        assert!(matches!(
            far.get_windows(1.0, 1.0),
            Err(SceneLabelError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_bbox_get_windows_caps_count() {
        let huge = BBox::new(0.0, 0.0, 1e12, 1e12);
        assert!(matches!(
            huge.get_windows(1.0, 1.0),
            Err(SceneLabelError::InvalidArgument(_))
        ));
        assert!(BBox::new(0.0, 0.0, f64::INFINITY, 1.0)
            .get_windows(1.0, 1.0)
            .is_err());
    }

    #[test]
    fn test_bbox_get_windows_empty_extent() {
        let flat = BBox::new(5.0, 0.0, 5.0, 10.0);
        assert!(flat.get_windows(2.0, 2.0).unwrap().is_empty());
    }
}
