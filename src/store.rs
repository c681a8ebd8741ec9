//! Persistence of label sets.
//!
//! Labels never write themselves: [`ObjectDetectionLabels::save`] hands them
//! to whatever [`LabelStore`] the caller injects.

use std::path::{Path, PathBuf};

use log::info;

use crate::class_config::ClassConfig;
use crate::crs::CrsTransformer;
use crate::error::SceneLabelError;
use crate::geom::BBox;
use crate::labels::geojson::{labels_to_geojson, read_geojson, write_geojson};
use crate::labels::{ObjectDetectionLabels, DEFAULT_IOA_THRESH};

/// Storage for the labels of one scene.
pub trait LabelStore {
    /// Persists `labels`, replacing whatever the store held before.
    fn save(&self, labels: &ObjectDetectionLabels) -> Result<(), SceneLabelError>;

    /// Loads the stored labels.
    fn get_labels(&self) -> Result<ObjectDetectionLabels, SceneLabelError>;

    /// Returns a label set suitable for accumulating predictions.
    fn empty_labels(&self) -> ObjectDetectionLabels {
        ObjectDetectionLabels::empty()
    }
}

/// Label store backed by a GeoJSON file in map coordinates.
pub struct GeoJsonLabelStore {
    path: PathBuf,
    class_config: ClassConfig,
    crs_transformer: Box<dyn CrsTransformer>,
    extent: Option<BBox>,
}

impl GeoJsonLabelStore {
    /// Creates a store writing to and reading from `path`.
    pub fn new(
        path: impl Into<PathBuf>,
        class_config: ClassConfig,
        crs_transformer: Box<dyn CrsTransformer>,
    ) -> Self {
        Self {
            path: path.into(),
            class_config,
            crs_transformer,
            extent: None,
        }
    }

    /// Restricts [`LabelStore::get_labels`] to labels overlapping `extent`.
    pub fn with_extent(mut self, extent: BBox) -> Self {
        self.extent = Some(extent);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn class_config(&self) -> &ClassConfig {
        &self.class_config
    }

    pub fn extent(&self) -> Option<BBox> {
        self.extent
    }

    pub fn set_extent(&mut self, extent: BBox) {
        self.extent = Some(extent);
    }

    pub fn crs_transformer(&self) -> &dyn CrsTransformer {
        self.crs_transformer.as_ref()
    }
}

impl LabelStore for GeoJsonLabelStore {
    fn save(&self, labels: &ObjectDetectionLabels) -> Result<(), SceneLabelError> {
        info!(
            "Saving {} box(es) as GeoJSON to {}",
            labels.len(),
            self.path.display()
        );
        let collection =
            labels_to_geojson(labels, &self.class_config, self.crs_transformer.as_ref())?;
        write_geojson(&self.path, &collection)
    }

    fn get_labels(&self) -> Result<ObjectDetectionLabels, SceneLabelError> {
        let collection = read_geojson(&self.path)?;
        let crs = self.crs_transformer.as_ref();
        let pixels = collection.map_positions(&|x, y| crs.map_to_pixel((x, y)));
        let labels = ObjectDetectionLabels::from_geojson(&pixels, None)?;
        info!(
            "Loaded {} box(es) from {}",
            labels.len(),
            self.path.display()
        );

        match &self.extent {
            Some(extent) => labels.get_overlapping(extent, DEFAULT_IOA_THRESH, false),
            None => Ok(labels),
        }
    }
}
