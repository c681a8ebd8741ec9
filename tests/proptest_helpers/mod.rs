#![allow(dead_code)]

use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

use scenelabel::geom::{BBox, ClassId};
use scenelabel::ObjectDetectionLabels;

/// Tolerance for boxes that went through a normalize/denormalize pass.
pub const EPS_NORMALIZED: f64 = 1e-6;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Boxes with integer corners and positive size starting inside
/// `[0, limit)`.
///
/// Integer corners keep shifts between frames exact.
pub fn arb_bbox(limit: u32) -> BoxedStrategy<BBox> {
    (0..limit, 0..limit, 1..=limit / 4 + 1, 1..=limit / 4 + 1)
        .prop_map(|(y, x, h, w)| BBox::new(y as f64, x as f64, (y + h) as f64, (x + w) as f64))
        .boxed()
}

/// A window with integer corners and positive size.
pub fn arb_window() -> BoxedStrategy<BBox> {
    (0u32..10_000, 0u32..10_000, 1u32..2048, 1u32..2048)
        .prop_map(|(y, x, h, w)| BBox::new(y as f64, x as f64, (y + h) as f64, (x + w) as f64))
        .boxed()
}

/// Labels of up to `max_boxes` rows with scores in `[0, 1)`.
pub fn arb_labels(max_boxes: usize) -> BoxedStrategy<ObjectDetectionLabels> {
    proptest::collection::vec((arb_bbox(512), 0u32..5, 0.0f64..1.0), 0..=max_boxes)
        .prop_map(|rows| {
            let mut boxes = Vec::with_capacity(rows.len());
            let mut class_ids = Vec::with_capacity(rows.len());
            let mut scores = Vec::with_capacity(rows.len());
            for (bbox, class_id, score) in rows {
                boxes.push(bbox);
                class_ids.push(ClassId(class_id));
                scores.push(score);
            }
            ObjectDetectionLabels::new(boxes, class_ids, Some(scores))
                .expect("columns have matching lengths")
        })
        .boxed()
}

pub fn boxes_close(a: &[BBox], b: &[BBox], eps: f64) -> Result<(), String> {
    if a.len() != b.len() {
        return Err(format!("{} box(es) vs {}", a.len(), b.len()));
    }
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        let close = x
            .npbox()
            .iter()
            .zip(y.npbox())
            .all(|(p, q)| (p - q).abs() <= eps);
        if !close {
            return Err(format!("box {}: {:?} vs {:?}", i, x, y));
        }
    }
    Ok(())
}
