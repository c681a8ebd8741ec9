//! Whole-list operations on [`BoxList`]s.
//!
//! Every function here is pure: inputs are borrowed, and a new list is
//! returned with the boxes and all fields selected or appended together.

use std::cmp::Ordering;

use itertools::Itertools;
use log::debug;

use super::bbox::BBox;
use super::box_list::BoxList;
use crate::error::SceneLabelError;

/// Intersection-over-area of `bbox` against `window`: the shared area
/// divided by the area of `bbox`.
///
/// Boxes without positive area yield 0.
pub fn ioa(bbox: &BBox, window: &BBox) -> f64 {
    let area = bbox.area();
    if area <= 0.0 {
        return 0.0;
    }
    bbox.intersection_area(window) / area
}

/// Intersection-over-union of two boxes; 0 when the union has no area.
pub fn iou(a: &BBox, b: &BBox) -> f64 {
    let intersection = a.intersection_area(b);
    let union = a.area().max(0.0) + b.area().max(0.0) - intersection;
    if union <= 0.0 {
        return 0.0;
    }
    intersection / union
}

/// Keeps the boxes of `list` that overlap the window in `window_list` by at
/// least `min_overlap` of their own area.
///
/// A box must share some area with the window to be kept, so
/// `min_overlap = 0.0` keeps every box that touches the window with
/// positive overlap, and `min_overlap = 1.0` keeps boxes fully inside it.
/// If `window_list` holds several boxes, the best overlap counts. Relative
/// order of the kept boxes is preserved.
///
/// # Errors
/// Returns [`SceneLabelError::InvalidWindowList`] if `window_list` is empty.
pub fn prune_non_overlapping_boxes(
    list: &BoxList,
    window_list: &BoxList,
    min_overlap: f64,
) -> Result<BoxList, SceneLabelError> {
    if window_list.is_empty() {
        return Err(SceneLabelError::InvalidWindowList(0));
    }

    let keep: Vec<usize> = list
        .get()
        .iter()
        .enumerate()
        .filter_map(|(index, bbox)| {
            let best = window_list
                .get()
                .iter()
                .map(|window| ioa(bbox, window))
                .fold(0.0, f64::max);
            (best > 0.0 && best >= min_overlap).then_some(index)
        })
        .collect();

    debug!(
        "prune_non_overlapping_boxes: kept {} of {} box(es) at min_overlap={}",
        keep.len(),
        list.len(),
        min_overlap
    );
    Ok(list.select(&keep))
}

/// Clips every box of `list` to `window`.
///
/// No box is dropped: boxes outside the window collapse to zero area on
/// its edge.
pub fn clip_to_window(list: &BoxList, window: &BBox) -> BoxList {
    list.map_boxes(|b| b.clip_to(window))
}

/// Appends the rows of all `lists` in order.
///
/// # Errors
/// Returns [`SceneLabelError::EmptyConcatenation`] for an empty slice and
/// [`SceneLabelError::IncompatibleFields`] if the inputs do not all carry
/// the same set of fields.
pub fn concatenate(lists: &[&BoxList]) -> Result<BoxList, SceneLabelError> {
    let (first, rest) = lists
        .split_first()
        .ok_or(SceneLabelError::EmptyConcatenation)?;

    let mut out = (*first).clone();
    for list in rest {
        out.extend_from(list)?;
    }
    Ok(out)
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    index: usize,
    score: f64,
}

/// Greedy non-maximum suppression.
///
/// Boxes scoring below `score_threshold` are discarded. The highest
/// scoring remaining box is then selected repeatedly, and every remaining
/// box whose IoU with it exceeds `iou_threshold` is suppressed, until no
/// boxes remain or `max_output_size` boxes have been selected. Equal scores
/// are resolved in favour of the box that comes first in `list`.
///
/// The result is in selection order (descending score).
///
/// # Errors
/// Returns [`SceneLabelError::MissingField`] if `list` has no scores and
/// [`SceneLabelError::InvalidThreshold`] if `iou_threshold` is outside
/// `[0, 1]`.
pub fn non_max_suppression(
    list: &BoxList,
    max_output_size: usize,
    iou_threshold: f64,
    score_threshold: f64,
) -> Result<BoxList, SceneLabelError> {
    if !(0.0..=1.0).contains(&iou_threshold) {
        return Err(SceneLabelError::InvalidThreshold {
            name: "iou_threshold",
            value: iou_threshold,
        });
    }
    let scores = list.scores()?;
    let boxes = list.get();

    // sorted_by is stable, so ties keep their original order
    let candidates = scores
        .iter()
        .enumerate()
        .filter(|(_, &score)| score >= score_threshold)
        .map(|(index, &score)| Candidate { index, score })
        .sorted_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
        .collect::<Vec<_>>();

    let mut suppressed = vec![false; candidates.len()];
    let mut selected = Vec::new();

    for (pos, cb) in candidates.iter().enumerate() {
        if selected.len() >= max_output_size {
            break;
        }
        if suppressed[pos] {
            continue;
        }
        selected.push(cb.index);

        for (offset, ob) in candidates[pos + 1..].iter().enumerate() {
            let other = pos + 1 + offset;
            if suppressed[other] {
                continue;
            }
            if iou(&boxes[cb.index], &boxes[ob.index]) > iou_threshold {
                suppressed[other] = true;
            }
        }
    }

    debug!(
        "non_max_suppression: {} of {} box(es) above score {}, {} selected",
        candidates.len(),
        list.len(),
        score_threshold,
        selected.len()
    );
    Ok(list.select(&selected))
}
