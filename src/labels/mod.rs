//! Scene-wide object detection label sets.
//!
//! [`ObjectDetectionLabels`] is the type the rest of the crate passes
//! around: a [`BoxList`] that always carries `classes` and `scores`, plus
//! the frame conversions and filters needed to accumulate per-window model
//! output into one label set for a whole scene.
//!
//! # Frames
//!
//! - **global**: pixel row/column within the scene extent
//! - **local**: pixel row/column within one window of the scene
//! - **normalized**: local coordinates divided by the window height
//!   (rows) and width (columns)
//!
//! # Example
//!
//! ```
//! use scenelabel::geom::{BBox, ClassId};
//! use scenelabel::labels::{ObjectDetectionLabels, WindowLabels};
//!
//! let mut labels = ObjectDetectionLabels::empty();
//! let window = BBox::new(100.0, 200.0, 164.0, 264.0);
//! labels
//!     .set_window(
//!         &window,
//!         WindowLabels::new(vec![BBox::new(0.0, 0.0, 10.0, 10.0)], vec![ClassId(1)]),
//!     )
//!     .unwrap();
//!
//! assert_eq!(labels.boxes(), &[BBox::new(100.0, 200.0, 110.0, 210.0)]);
//! ```

pub mod geojson;

use std::collections::HashMap;
use std::fmt;

use geo::{Polygon, Within};
use log::debug;

use crate::error::SceneLabelError;
use crate::geom::{ops, BBox, BoxKey, BoxList, ClassId};
use crate::store::LabelStore;

use self::geojson::FeatureCollection;

/// Default IOA threshold for windowed reads.
pub const DEFAULT_IOA_THRESH: f64 = 0.5;

/// IOA threshold applied when labels are read with an extent.
pub const EXTENT_IOA_THRESH: f64 = 0.8;

/// Options for [`ObjectDetectionLabels::prune_with`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PruneOptions {
    /// Boxes scoring below this are dropped.
    pub score_thresh: f64,
    /// Boxes whose IoU with a better box exceeds this are suppressed.
    pub merge_thresh: f64,
    /// Maximum number of boxes kept; unbounded when `None`.
    pub max_output_size: Option<usize>,
}

impl Default for PruneOptions {
    fn default() -> Self {
        Self {
            score_thresh: 0.5,
            merge_thresh: 0.5,
            max_output_size: None,
        }
    }
}

/// Model output for one window, in that window's local frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WindowLabels {
    pub boxes: Vec<BBox>,
    pub class_ids: Vec<ClassId>,
    pub scores: Option<Vec<f64>>,
}

impl WindowLabels {
    /// Creates unscored window labels.
    pub fn new(boxes: Vec<BBox>, class_ids: Vec<ClassId>) -> Self {
        Self {
            boxes,
            class_ids,
            scores: None,
        }
    }

    /// Adds scores.
    pub fn with_scores(mut self, scores: Vec<f64>) -> Self {
        self.scores = Some(scores);
        self
    }
}

/// A set of boxes with a class id and a score each.
///
/// Boxes are in the global (scene pixel) frame. Equality through `==` is
/// order independent and keyed by box coordinates, so two boxes with
/// identical coordinates count once; [`ObjectDetectionLabels::check_equal`]
/// compares row by row instead.
#[derive(Clone, Debug)]
pub struct ObjectDetectionLabels {
    box_list: BoxList,
}

impl ObjectDetectionLabels {
    /// Creates labels from global-frame boxes, class ids and optional
    /// scores (1.0 for every box when `None`).
    ///
    /// # Errors
    /// Returns [`SceneLabelError::FieldLengthMismatch`] if `class_ids` or
    /// `scores` does not hold one value per box.
    pub fn new(
        boxes: Vec<BBox>,
        class_ids: Vec<ClassId>,
        scores: Option<Vec<f64>>,
    ) -> Result<Self, SceneLabelError> {
        let scores = scores.unwrap_or_else(|| vec![1.0; class_ids.len()]);
        let mut box_list = BoxList::new(boxes);
        box_list.add_classes(class_ids)?;
        box_list.add_scores(scores)?;
        Ok(Self { box_list })
    }

    /// Creates a label set without boxes.
    pub fn empty() -> Self {
        Self {
            box_list: BoxList::empty_labeled(),
        }
    }

    /// Creates labels from a box list carrying `classes` and, optionally,
    /// `scores`. Other fields are dropped.
    ///
    /// # Errors
    /// Returns [`SceneLabelError::MissingField`] if `classes` is absent.
    pub fn from_box_list(box_list: &BoxList) -> Result<Self, SceneLabelError> {
        let class_ids = box_list.classes()?.to_vec();
        let scores = box_list.scores().ok().map(<[f64]>::to_vec);
        Self::new(box_list.get().to_vec(), class_ids, scores)
    }

    /// Creates labels from a GeoJSON feature collection in pixel
    /// coordinates.
    ///
    /// Each feature becomes the bounding envelope of its geometry, with the
    /// required `class_id` property and the optional `score` property
    /// (default 1.0). With an `extent`, only boxes lying at least 80% inside
    /// it are kept, and those are clipped to it.
    ///
    /// # Errors
    /// Fails on the first feature with a missing or invalid `class_id`,
    /// an invalid `score`, or an unusable geometry.
    pub fn from_geojson(
        collection: &FeatureCollection,
        extent: Option<&BBox>,
    ) -> Result<Self, SceneLabelError> {
        let mut boxes = Vec::with_capacity(collection.features.len());
        let mut class_ids = Vec::with_capacity(collection.features.len());
        let mut scores = Vec::with_capacity(collection.features.len());

        for (index, feature) in collection.features.iter().enumerate() {
            boxes.push(feature.envelope(index)?);
            class_ids.push(feature.class_id(index)?);
            scores.push(feature.score(index)?);
        }

        let labels = Self::new(boxes, class_ids, Some(scores))?;
        match extent {
            Some(extent) => labels.get_overlapping(extent, EXTENT_IOA_THRESH, true),
            None => Ok(labels),
        }
    }

    /// Returns the number of boxes.
    pub fn len(&self) -> usize {
        self.box_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.box_list.is_empty()
    }

    pub fn boxes(&self) -> &[BBox] {
        self.box_list.get()
    }

    /// Returns the boxes as `[ymin, xmin, ymax, xmax]` rows.
    pub fn npboxes(&self) -> Vec<[f64; 4]> {
        self.box_list.npboxes()
    }

    pub fn class_ids(&self) -> &[ClassId] {
        self.box_list.classes().unwrap_or_default()
    }

    pub fn scores(&self) -> &[f64] {
        self.box_list.scores().unwrap_or_default()
    }

    /// Returns the underlying box list.
    pub fn to_box_list(&self) -> &BoxList {
        &self.box_list
    }

    /// Returns `box -> (class id, score)`. Later rows win when several boxes
    /// share the same coordinates.
    pub fn to_map(&self) -> HashMap<BoxKey, (ClassId, f64)> {
        self.boxes()
            .iter()
            .zip(self.class_ids())
            .zip(self.scores())
            .map(|((bbox, &class_id), &score)| (bbox.key(), (class_id, score)))
            .collect()
    }

    /// Returns the rows of `first` followed by the rows of `second`.
    pub fn concatenate(first: &Self, second: &Self) -> Result<Self, SceneLabelError> {
        let box_list = ops::concatenate(&[&first.box_list, &second.box_list])?;
        Self::from_box_list(&box_list)
    }

    /// Returns the rows of `self` followed by the rows of `other`.
    pub fn merge(&self, other: &Self) -> Result<Self, SceneLabelError> {
        Self::concatenate(self, other)
    }

    /// Adds the model output of one window to this label set.
    ///
    /// `item` is in the window's local frame; it is moved to the global
    /// frame and appended after the existing rows.
    ///
    /// # Errors
    /// Returns [`SceneLabelError::FieldLengthMismatch`] if the class ids or
    /// scores of `item` do not match its boxes. `self` is left unchanged on
    /// error.
    pub fn set_window(&mut self, window: &BBox, item: WindowLabels) -> Result<(), SceneLabelError> {
        let boxes = Self::local_to_global(&item.boxes, window);
        let new_labels = Self::new(boxes, item.class_ids, item.scores)?;
        let merged = self.merge(&new_labels)?;
        self.box_list = merged.box_list;
        Ok(())
    }

    /// Returns the labels covering at least half of their own area inside
    /// `window`, unclipped.
    pub fn get_window(&self, window: &BBox) -> Result<Self, SceneLabelError> {
        self.get_overlapping(window, DEFAULT_IOA_THRESH, false)
    }

    /// Returns the labels whose intersection with `window` covers at least
    /// `ioa_thresh` of their own area, optionally clipped to `window`.
    pub fn get_overlapping(
        &self,
        window: &BBox,
        ioa_thresh: f64,
        clip: bool,
    ) -> Result<Self, SceneLabelError> {
        let window_list = BoxList::new(vec![*window]);
        let mut box_list = ops::prune_non_overlapping_boxes(&self.box_list, &window_list, ioa_thresh)?;
        if clip {
            box_list = ops::clip_to_window(&box_list, window);
        }
        Self::from_box_list(&box_list)
    }

    /// Moves boxes from the frame of `window` to the global frame.
    pub fn local_to_global(boxes: &[BBox], window: &BBox) -> Vec<BBox> {
        boxes
            .iter()
            .map(|b| b.shift(window.ymin, window.xmin))
            .collect()
    }

    /// Moves boxes from the global frame to the frame of `window`.
    pub fn global_to_local(boxes: &[BBox], window: &BBox) -> Vec<BBox> {
        boxes
            .iter()
            .map(|b| b.shift(-window.ymin, -window.xmin))
            .collect()
    }

    /// Divides local boxes by the window height (rows) and width (columns).
    ///
    /// Results are not clamped, so boxes reaching outside the window map
    /// outside `[0, 1]`.
    pub fn local_to_normalized(boxes: &[BBox], window: &BBox) -> Vec<BBox> {
        let (height, width) = window.size();
        boxes
            .iter()
            .map(|b| BBox::new(b.ymin / height, b.xmin / width, b.ymax / height, b.xmax / width))
            .collect()
    }

    /// Inverse of [`ObjectDetectionLabels::local_to_normalized`].
    pub fn normalized_to_local(boxes: &[BBox], window: &BBox) -> Vec<BBox> {
        let (height, width) = window.size();
        boxes
            .iter()
            .map(|b| BBox::new(b.ymin * height, b.xmin * width, b.ymax * height, b.xmax * width))
            .collect()
    }

    /// Keeps the boxes lying entirely within at least one AOI polygon.
    ///
    /// Boxes that merely intersect an AOI are dropped.
    pub fn filter_by_aoi(&self, aoi_polygons: &[Polygon<f64>]) -> Self {
        let keep: Vec<usize> = self
            .boxes()
            .iter()
            .enumerate()
            .filter(|(_, bbox)| {
                let polygon = bbox.to_polygon();
                aoi_polygons.iter().any(|aoi| polygon.is_within(aoi))
            })
            .map(|(index, _)| index)
            .collect();

        debug!(
            "filter_by_aoi: kept {} of {} box(es) within {} AOI polygon(s)",
            keep.len(),
            self.len(),
            aoi_polygons.len()
        );
        Self {
            box_list: self.box_list.select(&keep),
        }
    }

    /// Removes duplicate detections with non-maximum suppression.
    ///
    /// Boxes scoring below `score_thresh` are dropped and boxes whose IoU
    /// with a better-scoring box exceeds `merge_thresh` are suppressed. At
    /// most `max_output_size` boxes are kept (all of them when `None`).
    pub fn prune_duplicates(
        &self,
        score_thresh: f64,
        merge_thresh: f64,
        max_output_size: Option<usize>,
    ) -> Result<Self, SceneLabelError> {
        let max_output_size = max_output_size.unwrap_or(self.len());
        let box_list =
            ops::non_max_suppression(&self.box_list, max_output_size, merge_thresh, score_thresh)?;
        Self::from_box_list(&box_list)
    }

    /// [`ObjectDetectionLabels::prune_duplicates`] driven by [`PruneOptions`].
    pub fn prune_with(&self, opts: &PruneOptions) -> Result<Self, SceneLabelError> {
        self.prune_duplicates(opts.score_thresh, opts.merge_thresh, opts.max_output_size)
    }

    /// Compares boxes, class ids and scores row by row.
    ///
    /// # Errors
    /// Returns [`SceneLabelError::LabelsMismatch`] describing the first
    /// difference.
    pub fn check_equal(&self, expected: &Self) -> Result<(), SceneLabelError> {
        if self.len() != expected.len() {
            return Err(SceneLabelError::LabelsMismatch(format!(
                "{} box(es) vs {} expected",
                self.len(),
                expected.len()
            )));
        }

        let rows = self
            .boxes()
            .iter()
            .zip(self.class_ids())
            .zip(self.scores());
        let expected_rows = expected
            .boxes()
            .iter()
            .zip(expected.class_ids())
            .zip(expected.scores());

        for (row, (actual, wanted)) in rows.zip(expected_rows).enumerate() {
            if actual != wanted {
                return Err(SceneLabelError::LabelsMismatch(format!(
                    "row {}: {:?} vs {:?} expected",
                    row, actual, wanted
                )));
            }
        }
        Ok(())
    }

    /// Like [`ObjectDetectionLabels::check_equal`], but panics on mismatch.
    ///
    /// Meant for tests.
    #[track_caller]
    pub fn assert_equal(&self, expected: &Self) {
        if let Err(err) = self.check_equal(expected) {
            panic!("{}", err);
        }
    }

    /// Hands the labels to a label store for persistence.
    pub fn save<S: LabelStore + ?Sized>(&self, store: &S) -> Result<(), SceneLabelError> {
        store.save(self)
    }
}

impl Default for ObjectDetectionLabels {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for ObjectDetectionLabels {
    fn eq(&self, other: &Self) -> bool {
        self.to_map() == other.to_map()
    }
}

impl fmt::Display for ObjectDetectionLabels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self
            .boxes()
            .iter()
            .zip(self.class_ids())
            .zip(self.scores());
        for ((bbox, class_id), score) in rows {
            let [ymin, xmin, ymax, xmax] = bbox.npbox();
            writeln!(
                f,
                "[{}, {}, {}, {}] class={} score={}",
                ymin, xmin, ymax, xmax, class_id, score
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn labels(rows: &[[f64; 4]], classes: &[u32], scores: &[f64]) -> ObjectDetectionLabels {
        ObjectDetectionLabels::new(
            rows.iter().copied().map(BBox::from).collect(),
            classes.iter().copied().map(ClassId).collect(),
            Some(scores.to_vec()),
        )
        .unwrap()
    }

    fn sample() -> ObjectDetectionLabels {
        labels(
            &[[0.0, 0.0, 2.0, 2.0], [2.0, 2.0, 4.0, 4.0]],
            &[1, 2],
            &[0.3, 0.8],
        )
    }

    #[test]
    fn test_scores_default_to_one() {
        let l = ObjectDetectionLabels::new(
            vec![BBox::new(0.0, 0.0, 1.0, 1.0)],
            vec![ClassId(3)],
            None,
        )
        .unwrap();
        assert_eq!(l.scores(), &[1.0]);
    }

    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = ObjectDetectionLabels::new(vec![BBox::default()], vec![], None).unwrap_err();
        assert!(matches!(err, SceneLabelError::FieldLengthMismatch { .. }));

        let err = ObjectDetectionLabels::new(vec![BBox::default()], vec![ClassId(1)], Some(vec![]))
            .unwrap_err();
        assert!(matches!(err, SceneLabelError::FieldLengthMismatch { .. }));
    }

    #[test]
    fn test_from_box_list_requires_classes() {
        let list = BoxList::new(vec![BBox::default()]);
        assert!(matches!(
            ObjectDetectionLabels::from_box_list(&list),
            Err(SceneLabelError::MissingField(_))
        ));
    }

    #[test]
    fn test_merge_order() {
        let a = sample();
        let b = labels(&[[5.0, 5.0, 6.0, 6.0]], &[3], &[0.5]);
        let merged = a.merge(&b).unwrap();
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.class_ids(), &[ClassId(1), ClassId(2), ClassId(3)]);
        assert_eq!(merged.scores(), &[0.3, 0.8, 0.5]);
    }

    #[test]
    fn test_set_window_converts_to_global() {
        let mut l = sample();
        let window = BBox::new(10.0, 20.0, 30.0, 40.0);
        l.set_window(
            &window,
            WindowLabels::new(vec![BBox::new(1.0, 1.0, 3.0, 3.0)], vec![ClassId(2)])
                .with_scores(vec![0.9]),
        )
        .unwrap();

        assert_eq!(l.len(), 3);
        assert_eq!(l.boxes()[2], BBox::new(11.0, 21.0, 13.0, 23.0));
        assert_eq!(l.scores()[2], 0.9);
    }

    #[test]
    fn test_set_window_failure_leaves_labels_untouched() {
        let mut l = sample();
        let bad = WindowLabels::new(vec![BBox::default()], vec![]);
        assert!(l.set_window(&BBox::new(0.0, 0.0, 1.0, 1.0), bad).is_err());
        l.assert_equal(&sample());
    }

    #[test]
    fn test_get_window_uses_half_overlap() {
        let l = labels(
            &[[0.0, 0.0, 10.0, 10.0], [0.0, 5.0, 10.0, 15.0], [0.0, 8.0, 10.0, 18.0]],
            &[1, 1, 1],
            &[0.1, 0.2, 0.3],
        );
        let window = l.get_window(&BBox::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        assert_eq!(window.scores(), &[0.1, 0.2]);
        // not clipped
        assert_eq!(window.boxes()[1], BBox::new(0.0, 5.0, 10.0, 15.0));
    }

    #[test]
    fn test_get_overlapping_with_clip() {
        let l = labels(&[[0.0, 5.0, 10.0, 15.0]], &[1], &[0.4]);
        let clipped = l
            .get_overlapping(&BBox::new(0.0, 0.0, 10.0, 10.0), 0.5, true)
            .unwrap();
        assert_eq!(clipped.boxes(), &[BBox::new(0.0, 5.0, 10.0, 10.0)]);
        assert_eq!(clipped.scores(), &[0.4]);
    }

    #[test]
    fn test_frame_conversions() {
        let window = BBox::new(100.0, 200.0, 150.0, 300.0);
        let local = [BBox::new(10.0, 20.0, 25.0, 50.0)];

        let global = ObjectDetectionLabels::local_to_global(&local, &window);
        assert_eq!(global, vec![BBox::new(110.0, 220.0, 125.0, 250.0)]);
        assert_eq!(ObjectDetectionLabels::global_to_local(&global, &window), local);

        let normalized = ObjectDetectionLabels::local_to_normalized(&local, &window);
        assert_eq!(normalized, vec![BBox::new(0.2, 0.2, 0.5, 0.5)]);
        assert_eq!(
            ObjectDetectionLabels::normalized_to_local(&normalized, &window),
            local
        );
    }

    #[test]
    fn test_normalized_is_not_clamped() {
        let window = BBox::new(0.0, 0.0, 10.0, 10.0);
        let out = ObjectDetectionLabels::local_to_normalized(&[BBox::new(-5.0, 0.0, 20.0, 10.0)], &window);
        assert_eq!(out, vec![BBox::new(-0.5, 0.0, 2.0, 1.0)]);
    }

    #[test]
    fn test_filter_by_aoi_requires_containment() {
        let l = labels(
            &[[1.0, 1.0, 3.0, 3.0], [8.0, 8.0, 12.0, 12.0], [20.0, 20.0, 22.0, 22.0]],
            &[1, 2, 3],
            &[0.5, 0.6, 0.7],
        );
        let aoi = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 0.0, y: 10.0),
        ];
        let second = polygon![
            (x: 19.0, y: 19.0),
            (x: 30.0, y: 19.0),
            (x: 30.0, y: 30.0),
            (x: 19.0, y: 30.0),
        ];

        let filtered = l.filter_by_aoi(&[aoi.clone()]);
        assert_eq!(filtered.class_ids(), &[ClassId(1)]);

        let filtered = l.filter_by_aoi(&[aoi, second]);
        assert_eq!(filtered.class_ids(), &[ClassId(1), ClassId(3)]);

        assert!(l.filter_by_aoi(&[]).is_empty());
    }

    #[test]
    fn test_prune_duplicates() {
        let l = labels(
            &[[0.0, 0.0, 10.0, 10.0], [0.0, 0.0, 9.0, 9.0], [50.0, 50.0, 60.0, 60.0]],
            &[1, 1, 2],
            &[0.9, 0.8, 0.2],
        );

        let pruned = l.prune_duplicates(0.0, 0.5, None).unwrap();
        assert_eq!(pruned.scores(), &[0.9, 0.2]);

        let pruned = l.prune_duplicates(0.5, 0.5, None).unwrap();
        assert_eq!(pruned.scores(), &[0.9]);

        let pruned = l.prune_duplicates(0.0, 0.9, Some(2)).unwrap();
        assert_eq!(pruned.scores(), &[0.9, 0.8]);
    }

    #[test]
    fn test_prune_with_defaults() {
        let l = labels(
            &[[0.0, 0.0, 10.0, 10.0], [0.0, 0.0, 9.0, 9.0], [50.0, 50.0, 60.0, 60.0]],
            &[1, 1, 2],
            &[0.9, 0.8, 0.2],
        );
        let pruned = l.prune_with(&PruneOptions::default()).unwrap();
        pruned.assert_equal(&l.prune_duplicates(0.5, 0.5, None).unwrap());
    }

    #[test]
    fn test_equality_is_order_independent() {
        let a = sample();
        let b = labels(
            &[[2.0, 2.0, 4.0, 4.0], [0.0, 0.0, 2.0, 2.0]],
            &[2, 1],
            &[0.8, 0.3],
        );
        assert_eq!(a, b);
        assert!(a.check_equal(&b).is_err());
        a.check_equal(&sample()).unwrap();
    }

    #[test]
    #[should_panic(expected = "Labels differ")]
    fn test_assert_equal_panics_on_row_order() {
        let a = sample();
        let b = labels(
            &[[2.0, 2.0, 4.0, 4.0], [0.0, 0.0, 2.0, 2.0]],
            &[2, 1],
            &[0.8, 0.3],
        );
        a.assert_equal(&b);
    }

    #[test]
    fn test_equality_collapses_identical_boxes() {
        let a = labels(
            &[[0.0, 0.0, 1.0, 1.0], [0.0, 0.0, 1.0, 1.0]],
            &[1, 1],
            &[0.5, 0.5],
        );
        let b = labels(&[[0.0, 0.0, 1.0, 1.0]], &[1], &[0.5]);
        assert_eq!(a, b);
        assert!(a.check_equal(&b).is_err());
    }

    #[test]
    fn test_equality_sees_scores() {
        let a = labels(&[[0.0, 0.0, 1.0, 1.0]], &[1], &[0.5]);
        let b = labels(&[[0.0, 0.0, 1.0, 1.0]], &[1], &[0.6]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_closure() {
        let empty = ObjectDetectionLabels::empty();
        let window = BBox::new(0.0, 0.0, 10.0, 10.0);

        assert!(empty.merge(&empty).unwrap().is_empty());
        assert!(empty.prune_duplicates(0.5, 0.5, None).unwrap().is_empty());
        assert!(empty.get_overlapping(&window, 0.5, true).unwrap().is_empty());
        assert!(empty.get_window(&window).unwrap().is_empty());
        assert!(empty.filter_by_aoi(&[window.to_polygon()]).is_empty());
        assert_eq!(empty, ObjectDetectionLabels::default());
        assert!(empty.to_box_list().has_field(crate::geom::CLASSES));
        assert!(empty.to_box_list().has_field(crate::geom::SCORES));
    }

    #[test]
    fn test_merge_with_empty_is_identity() {
        let a = sample();
        a.merge(&ObjectDetectionLabels::empty())
            .unwrap()
            .assert_equal(&a);
        ObjectDetectionLabels::empty()
            .merge(&a)
            .unwrap()
            .assert_equal(&a);
    }

    #[test]
    fn test_display() {
        let text = sample().to_string();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("[0, 0, 2, 2] class=1 score=0.3"));
    }
}
