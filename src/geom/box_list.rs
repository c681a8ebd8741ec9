//! Columnar container of boxes plus parallel per-box fields.

use std::collections::BTreeMap;

use super::bbox::BBox;
use super::ids::ClassId;
use crate::error::SceneLabelError;

/// Name of the class id field.
pub const CLASSES: &str = "classes";

/// Name of the score field.
pub const SCORES: &str = "scores";

/// An ordered list of N boxes with named, length-N fields.
///
/// `classes` and `scores` are stored as typed columns; any other numeric
/// per-box data goes into the extra field map. Every field always has
/// exactly one value per box, and all transforms that select or append rows
/// apply to the boxes and every field together.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoxList {
    boxes: Vec<BBox>,
    classes: Option<Vec<ClassId>>,
    scores: Option<Vec<f64>>,
    extra: BTreeMap<String, Vec<f64>>,
}

impl BoxList {
    /// Creates a box list without any fields.
    pub fn new(boxes: Vec<BBox>) -> Self {
        Self {
            boxes,
            ..Default::default()
        }
    }

    /// Creates a box list without boxes whose `classes` and `scores` fields
    /// are present and empty.
    pub fn empty_labeled() -> Self {
        Self {
            classes: Some(Vec::new()),
            scores: Some(Vec::new()),
            ..Default::default()
        }
    }

    /// Creates a box list from rows in `[ymin, xmin, ymax, xmax]` layout.
    pub fn from_npboxes(npboxes: &[[f64; 4]]) -> Self {
        Self::new(npboxes.iter().copied().map(BBox::from).collect())
    }

    /// Returns the number of boxes.
    #[inline]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Returns the boxes.
    #[inline]
    pub fn get(&self) -> &[BBox] {
        &self.boxes
    }

    /// Returns the boxes as `[ymin, xmin, ymax, xmax]` rows.
    pub fn npboxes(&self) -> Vec<[f64; 4]> {
        self.boxes.iter().map(BBox::npbox).collect()
    }

    fn check_len(&self, field: &str, actual: usize) -> Result<(), SceneLabelError> {
        if actual != self.len() {
            return Err(SceneLabelError::FieldLengthMismatch {
                field: field.to_string(),
                expected: self.len(),
                actual,
            });
        }
        Ok(())
    }

    /// Attaches the class id field, replacing any previous one.
    ///
    /// # Errors
    /// Returns [`SceneLabelError::FieldLengthMismatch`] if `classes` does not
    /// hold one value per box.
    pub fn add_classes(&mut self, classes: Vec<ClassId>) -> Result<(), SceneLabelError> {
        self.check_len(CLASSES, classes.len())?;
        self.classes = Some(classes);
        Ok(())
    }

    /// Attaches the score field, replacing any previous one.
    ///
    /// # Errors
    /// Returns [`SceneLabelError::FieldLengthMismatch`] if `scores` does not
    /// hold one value per box.
    pub fn add_scores(&mut self, scores: Vec<f64>) -> Result<(), SceneLabelError> {
        self.check_len(SCORES, scores.len())?;
        self.scores = Some(scores);
        Ok(())
    }

    /// Attaches a numeric field under `name`.
    ///
    /// `"scores"` is routed to the typed score column. `"classes"` holds
    /// class ids and must be attached with [`BoxList::add_classes`].
    pub fn add_field(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), SceneLabelError> {
        let name = name.into();
        match name.as_str() {
            SCORES => self.add_scores(values),
            CLASSES => Err(SceneLabelError::UnsupportedKey(
                "'classes' holds class ids, use add_classes".into(),
            )),
            _ => {
                self.check_len(&name, values.len())?;
                self.extra.insert(name, values);
                Ok(())
            }
        }
    }

    /// Returns true if a field named `name` is attached.
    pub fn has_field(&self, name: &str) -> bool {
        match name {
            CLASSES => self.classes.is_some(),
            SCORES => self.scores.is_some(),
            _ => self.extra.contains_key(name),
        }
    }

    /// Returns the class ids.
    pub fn classes(&self) -> Result<&[ClassId], SceneLabelError> {
        self.classes
            .as_deref()
            .ok_or_else(|| SceneLabelError::MissingField(CLASSES.into()))
    }

    /// Returns the scores.
    pub fn scores(&self) -> Result<&[f64], SceneLabelError> {
        self.scores
            .as_deref()
            .ok_or_else(|| SceneLabelError::MissingField(SCORES.into()))
    }

    /// Returns a numeric field by name (`"scores"` or an extra field).
    pub fn get_field(&self, name: &str) -> Result<&[f64], SceneLabelError> {
        match name {
            SCORES => self.scores(),
            _ => self
                .extra
                .get(name)
                .map(Vec::as_slice)
                .ok_or_else(|| SceneLabelError::MissingField(name.to_string())),
        }
    }

    /// Returns the names of all attached fields, sorted.
    pub fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.extra.keys().cloned().collect();
        if self.classes.is_some() {
            names.push(CLASSES.to_string());
        }
        if self.scores.is_some() {
            names.push(SCORES.to_string());
        }
        names.sort();
        names
    }

    /// Returns a new list holding the rows at `indices`, in that order.
    ///
    /// # Panics
    /// Panics if an index is out of bounds.
    pub fn select(&self, indices: &[usize]) -> Self {
        fn pick<T: Copy>(values: &[T], indices: &[usize]) -> Vec<T> {
            indices.iter().map(|&i| values[i]).collect()
        }

        Self {
            boxes: pick(&self.boxes, indices),
            classes: self.classes.as_deref().map(|c| pick(c, indices)),
            scores: self.scores.as_deref().map(|s| pick(s, indices)),
            extra: self
                .extra
                .iter()
                .map(|(name, values)| (name.clone(), pick(values, indices)))
                .collect(),
        }
    }

    /// Returns a copy of this list with its boxes replaced and every field
    /// kept.
    ///
    /// # Errors
    /// Returns [`SceneLabelError::FieldLengthMismatch`] if the number of
    /// boxes changes.
    pub fn with_boxes(&self, boxes: Vec<BBox>) -> Result<Self, SceneLabelError> {
        self.check_len("boxes", boxes.len())?;
        Ok(Self {
            boxes,
            ..self.clone()
        })
    }

    /// Returns a copy of this list with `f` applied to every box.
    pub fn map_boxes(&self, f: impl Fn(&BBox) -> BBox) -> Self {
        Self {
            boxes: self.boxes.iter().map(f).collect(),
            classes: self.classes.clone(),
            scores: self.scores.clone(),
            extra: self.extra.clone(),
        }
    }

    /// Appends `other` row-wise. Both lists must carry the same fields.
    pub(crate) fn extend_from(&mut self, other: &BoxList) -> Result<(), SceneLabelError> {
        if self.field_names() != other.field_names() {
            return Err(SceneLabelError::IncompatibleFields {
                left: self.field_names(),
                right: other.field_names(),
            });
        }

        self.boxes.extend_from_slice(&other.boxes);
        if let (Some(mine), Some(theirs)) = (self.classes.as_mut(), other.classes.as_ref()) {
            mine.extend_from_slice(theirs);
        }
        if let (Some(mine), Some(theirs)) = (self.scores.as_mut(), other.scores.as_ref()) {
            mine.extend_from_slice(theirs);
        }
        for (name, values) in self.extra.iter_mut() {
            if let Some(theirs) = other.extra.get(name) {
                values.extend_from_slice(theirs);
            }
        }
        Ok(())
    }
}
