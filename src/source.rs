//! Read-only, windowed access to the labels of a scene.
//!
//! A [`LabelSource`] is to [`ObjectDetectionLabels`] what a database is to
//! a query result: training and evaluation pipelines ask it for the labels
//! of one window at a time.

use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::crs::CrsTransformer;
use crate::error::SceneLabelError;
use crate::geom::BBox;
use crate::labels::geojson::FeatureCollection;
use crate::labels::ObjectDetectionLabels;

/// One axis of a slice key, with optional bounds in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AxisSlice {
    pub start: Option<i64>,
    pub stop: Option<i64>,
}

impl AxisSlice {
    pub fn new(start: Option<i64>, stop: Option<i64>) -> Self {
        Self { start, stop }
    }

    /// The slice covering the whole axis.
    pub fn full() -> Self {
        Self::default()
    }

    fn has_negative_bound(&self) -> bool {
        self.start.is_some_and(|v| v < 0) || self.stop.is_some_and(|v| v < 0)
    }
}

impl From<Range<i64>> for AxisSlice {
    fn from(r: Range<i64>) -> Self {
        Self::new(Some(r.start), Some(r.end))
    }
}

impl From<RangeFrom<i64>> for AxisSlice {
    fn from(r: RangeFrom<i64>) -> Self {
        Self::new(Some(r.start), None)
    }
}

impl From<RangeTo<i64>> for AxisSlice {
    fn from(r: RangeTo<i64>) -> Self {
        Self::new(None, Some(r.end))
    }
}

impl From<RangeFull> for AxisSlice {
    fn from(_: RangeFull) -> Self {
        Self::full()
    }
}

/// Key accepted by [`LabelSource::get_item`].
#[derive(Clone, Debug, PartialEq)]
pub enum SliceKey {
    /// A window given directly as a box.
    Window(BBox),
    /// Row slice, optionally followed by a column slice.
    Slices(Vec<AxisSlice>),
}

impl SliceKey {
    /// Key selecting rows over the full width.
    pub fn rows(rows: impl Into<AxisSlice>) -> Self {
        SliceKey::Slices(vec![rows.into()])
    }

    /// Key selecting rows and columns.
    pub fn rows_cols(rows: impl Into<AxisSlice>, cols: impl Into<AxisSlice>) -> Self {
        SliceKey::Slices(vec![rows.into(), cols.into()])
    }
}

/// Translates a row slice and optional column slice into a window of
/// `extent`.
///
/// Open starts become 0 and open stops become the far edge of `extent`.
///
/// # Errors
/// Returns [`SceneLabelError::UnsupportedKey`] unless there are one or two
/// slices, and [`SceneLabelError::NotImplemented`] for negative bounds.
pub fn window_from_slices(slices: &[AxisSlice], extent: &BBox) -> Result<BBox, SceneLabelError> {
    let (rows, cols) = match slices {
        [rows] => (*rows, AxisSlice::full()),
        [rows, cols] => (*rows, *cols),
        _ => {
            return Err(SceneLabelError::UnsupportedKey(format!(
                "expected 1 or 2 slices, got {}",
                slices.len()
            )))
        }
    };

    if rows.has_negative_bound() || cols.has_negative_bound() {
        return Err(SceneLabelError::NotImplemented(
            "negative slice bounds".into(),
        ));
    }

    let start = |v: Option<i64>| v.map_or(0.0, |v| v as f64);
    Ok(BBox::new(
        start(rows.start),
        start(cols.start),
        rows.stop.map_or(extent.ymax, |v| v as f64),
        cols.stop.map_or(extent.xmax, |v| v as f64),
    ))
}

/// A read-only source of labels for one scene.
pub trait LabelSource {
    /// Returns the labels overlapping `window`, or all labels for `None`.
    fn get_labels(&self, window: Option<&BBox>) -> Result<ObjectDetectionLabels, SceneLabelError>;

    /// Returns the valid pixel region of the scene.
    fn extent(&self) -> BBox;

    /// Sets the valid pixel region. Setting the same extent twice has the
    /// same effect as setting it once.
    fn set_extent(&mut self, extent: BBox);

    /// Returns the transformer between pixel and map coordinates.
    fn crs_transformer(&self) -> &dyn CrsTransformer;

    /// Returns the labels of the window selected by `key`.
    ///
    /// # Errors
    /// Box keys are not supported yet and return
    /// [`SceneLabelError::NotImplemented`]; slice keys fail as described
    /// in [`window_from_slices`].
    fn get_item(&self, key: &SliceKey) -> Result<ObjectDetectionLabels, SceneLabelError> {
        match key {
            SliceKey::Window(_) => Err(SceneLabelError::NotImplemented(
                "indexing a label source with a box".into(),
            )),
            SliceKey::Slices(slices) => {
                let window = window_from_slices(slices, &self.extent())?;
                self.get_labels(Some(&window))
            }
        }
    }
}

/// Label source backed by an in-memory label set.
pub struct ObjectDetectionLabelSource {
    labels: ObjectDetectionLabels,
    extent: BBox,
    crs_transformer: Box<dyn CrsTransformer>,
}

impl ObjectDetectionLabelSource {
    /// Creates a source over labels already in the pixel frame.
    pub fn new(
        labels: ObjectDetectionLabels,
        extent: BBox,
        crs_transformer: Box<dyn CrsTransformer>,
    ) -> Self {
        Self {
            labels,
            extent,
            crs_transformer,
        }
    }

    /// Creates a source from GeoJSON in map coordinates.
    ///
    /// Features are moved to the pixel frame with `crs_transformer`; boxes
    /// less than 80% inside `extent` are dropped and the rest are clipped
    /// to it.
    pub fn from_geojson(
        collection: &FeatureCollection,
        extent: BBox,
        crs_transformer: Box<dyn CrsTransformer>,
    ) -> Result<Self, SceneLabelError> {
        let pixels =
            collection.map_positions(&|x, y| crs_transformer.map_to_pixel((x, y)));
        let labels = ObjectDetectionLabels::from_geojson(&pixels, Some(&extent))?;
        Ok(Self::new(labels, extent, crs_transformer))
    }
}

impl LabelSource for ObjectDetectionLabelSource {
    fn get_labels(&self, window: Option<&BBox>) -> Result<ObjectDetectionLabels, SceneLabelError> {
        match window {
            None => Ok(self.labels.clone()),
            // any positive overlap counts
            Some(window) => self.labels.get_overlapping(window, 0.0, false),
        }
    }

    fn extent(&self) -> BBox {
        self.extent
    }

    fn set_extent(&mut self, extent: BBox) {
        self.extent = extent;
    }

    fn crs_transformer(&self) -> &dyn CrsTransformer {
        self.crs_transformer.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::IdentityTransformer;
    use crate::geom::ClassId;

    fn source() -> ObjectDetectionLabelSource {
        let labels = ObjectDetectionLabels::new(
            vec![
                BBox::new(0.0, 0.0, 10.0, 10.0),
                BBox::new(50.0, 50.0, 60.0, 60.0),
                BBox::new(90.0, 0.0, 100.0, 10.0),
            ],
            vec![ClassId(1), ClassId(2), ClassId(3)],
            None,
        )
        .unwrap();
        ObjectDetectionLabelSource::new(
            labels,
            BBox::new(0.0, 0.0, 100.0, 100.0),
            Box::new(IdentityTransformer),
        )
    }

    #[test]
    fn test_window_from_slices() {
        let extent = BBox::new(0.0, 0.0, 100.0, 200.0);
        assert_eq!(
            window_from_slices(&[AxisSlice::from(10i64..20)], &extent).unwrap(),
            BBox::new(10.0, 0.0, 20.0, 200.0)
        );
        assert_eq!(
            window_from_slices(&[AxisSlice::from(..50i64), AxisSlice::from(5i64..)], &extent).unwrap(),
            BBox::new(0.0, 5.0, 50.0, 200.0)
        );
        assert_eq!(
            window_from_slices(&[AxisSlice::from(..), AxisSlice::from(..)], &extent).unwrap(),
            BBox::new(0.0, 0.0, 100.0, 200.0)
        );
    }

    #[test]
    fn test_window_from_slices_rejects_bad_keys() {
        let extent = BBox::new(0.0, 0.0, 100.0, 100.0);
        assert!(matches!(
            window_from_slices(&[], &extent),
            Err(SceneLabelError::UnsupportedKey(_))
        ));
        assert!(matches!(
            window_from_slices(&[AxisSlice::full(); 3], &extent),
            Err(SceneLabelError::UnsupportedKey(_))
        ));
        assert!(matches!(
            window_from_slices(&[AxisSlice::from(-5i64..10)], &extent),
            Err(SceneLabelError::NotImplemented(_))
        ));
        assert!(matches!(
            window_from_slices(&[AxisSlice::full(), AxisSlice::from(..-1i64)], &extent),
            Err(SceneLabelError::NotImplemented(_))
        ));
    }

    #[test]
    fn test_get_labels() {
        let src = source();
        assert_eq!(src.get_labels(None).unwrap().len(), 3);

        let window = BBox::new(0.0, 0.0, 55.0, 55.0);
        let labels = src.get_labels(Some(&window)).unwrap();
        assert_eq!(labels.class_ids(), &[ClassId(1), ClassId(2)]);
    }

    #[test]
    fn test_get_item() {
        let src = source();
        let labels = src.get_item(&SliceKey::rows(80i64..)).unwrap();
        assert_eq!(labels.class_ids(), &[ClassId(3)]);

        let labels = src.get_item(&SliceKey::rows_cols(..20i64, ..20i64)).unwrap();
        assert_eq!(labels.class_ids(), &[ClassId(1)]);

        assert!(matches!(
            src.get_item(&SliceKey::Window(BBox::new(0.0, 0.0, 1.0, 1.0))),
            Err(SceneLabelError::NotImplemented(_))
        ));
    }

    #[test]
    fn test_set_extent_is_idempotent() {
        let mut src = source();
        let extent = BBox::new(0.0, 0.0, 50.0, 50.0);
        src.set_extent(extent);
        src.set_extent(extent);
        assert_eq!(src.extent(), extent);

        let labels = src.get_item(&SliceKey::rows(..)).unwrap();
        assert_eq!(labels.len(), 1);
    }
}
