//! Box geometry for scene-wide detection labels.
//!
//! This module holds the building blocks that the label set is made of:
//!
//! - [`BBox`]: a single axis-aligned box in `(ymin, xmin, ymax, xmax)` layout
//! - [`BoxList`]: a columnar list of boxes with per-box fields
//! - [`ops`]: pure operations over box lists (overlap pruning, clipping,
//!   concatenation, non-maximum suppression)
//!
//! # Example
//!
//! ```
//! use scenelabel::geom::{ops, BBox, BoxList, ClassId};
//!
//! let mut list = BoxList::from_npboxes(&[[0.0, 0.0, 10.0, 10.0], [0.0, 0.0, 9.0, 9.0]]);
//! list.add_classes(vec![ClassId(1), ClassId(1)]).unwrap();
//! list.add_scores(vec![0.9, 0.8]).unwrap();
//!
//! let kept = ops::non_max_suppression(&list, 10, 0.5, 0.0).unwrap();
//! assert_eq!(kept.get(), &[BBox::new(0.0, 0.0, 10.0, 10.0)]);
//! ```

mod bbox;
mod box_list;
mod ids;
pub mod ops;

pub use bbox::{BBox, BoxKey, MAX_WINDOWS};
pub use box_list::{BoxList, CLASSES, SCORES};
pub use ids::ClassId;
