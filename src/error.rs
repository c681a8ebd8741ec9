use std::path::PathBuf;
use thiserror::Error;

use crate::geom::ClassId;

/// The main error type for scenelabel operations.
#[derive(Debug, Error)]
pub enum SceneLabelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse GeoJSON from {path}: {source}")]
    GeoJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write GeoJSON to {path}: {source}")]
    GeoJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Field '{field}' has {actual} value(s) but the box list holds {expected} box(es)")]
    FieldLengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Box list has no field '{0}'")]
    MissingField(String),

    #[error("Cannot concatenate box lists with different fields: {left:?} vs {right:?}")]
    IncompatibleFields {
        left: Vec<String>,
        right: Vec<String>,
    },

    #[error("Cannot concatenate an empty list of box lists")]
    EmptyConcatenation,

    #[error("Window list must hold at least one box, got {0}")]
    InvalidWindowList(usize),

    #[error("Expected 4 box coordinates, got {0}")]
    MalformedBox(usize),

    #[error("Threshold '{name}' must lie in [0, 1], got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("Unsupported key: {0}")]
    UnsupportedKey(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Feature {feature} has no '{property}' property")]
    MissingProperty {
        feature: usize,
        property: &'static str,
    },

    #[error("Feature {feature} has an invalid '{property}' property: {message}")]
    InvalidProperty {
        feature: usize,
        property: &'static str,
        message: String,
    },

    #[error("Feature {feature} has an unsupported geometry: {message}")]
    UnsupportedGeometry { feature: usize, message: String },

    #[error("Unknown class id {0}")]
    UnknownClass(ClassId),

    #[error("Labels differ: {0}")]
    LabelsMismatch(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
