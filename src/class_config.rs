//! Class id -> class name mapping.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::SceneLabelError;
use crate::geom::ClassId;

/// Names of the object classes of a scene, indexed by [`ClassId`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassConfig {
    /// Class names; the name at index `i` belongs to `ClassId(i)`.
    pub names: Vec<String>,

    /// Optional id of the "nothing here" class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null_class: Option<ClassId>,

    /// Name ids without an entry in `names` as `class_{id}` instead of
    /// failing.
    #[serde(skip)]
    numbered_fallback: bool,
}

impl ClassConfig {
    /// Creates a class config from class names.
    pub fn new(names: Vec<String>) -> Self {
        Self {
            names,
            null_class: None,
            numbered_fallback: false,
        }
    }

    /// Creates a config without names that calls every class `class_{id}`.
    pub fn numbered() -> Self {
        Self::new(Vec::new()).with_numbered_fallback()
    }

    /// Names ids past the end of `names` as `class_{id}`.
    pub fn with_numbered_fallback(mut self) -> Self {
        self.numbered_fallback = true;
        self
    }

    /// Sets the null class.
    pub fn with_null_class(mut self, class_id: impl Into<ClassId>) -> Self {
        self.null_class = Some(class_id.into());
        self
    }

    /// Returns the number of classes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the name of a class.
    ///
    /// # Errors
    /// Returns [`SceneLabelError::UnknownClass`] if the id has no name and
    /// the config has no numbered fallback.
    pub fn get_name(&self, class_id: ClassId) -> Result<Cow<'_, str>, SceneLabelError> {
        match self.names.get(class_id.as_u32() as usize) {
            Some(name) => Ok(Cow::Borrowed(name.as_str())),
            None if self.numbered_fallback => Ok(Cow::Owned(format!("class_{}", class_id))),
            None => Err(SceneLabelError::UnknownClass(class_id)),
        }
    }

    /// Returns the id of the class called `name`, if any.
    pub fn get_class_id(&self, name: &str) -> Option<ClassId> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| u32::try_from(i).ok())
            .map(ClassId)
    }
}
