//! GeoJSON reading and writing for detection labels.
//!
//! Only the subset of GeoJSON that label files use is modelled: a
//! `FeatureCollection` of features with a single geometry and a free-form
//! property map. Coordinates are `[x, y]` positions; extra dimensions
//! (e.g. altitude) are ignored.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use geo::{BoundingRect, Coord, LineString, MultiLineString, MultiPoint, MultiPolygon, Point};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ObjectDetectionLabels;
use crate::class_config::ClassConfig;
use crate::crs::CrsTransformer;
use crate::error::SceneLabelError;
use crate::geom::{BBox, ClassId};

/// Property holding the integer class id of a feature.
pub const CLASS_ID_PROPERTY: &str = "class_id";

/// Property holding the optional confidence score of a feature.
pub const SCORE_PROPERTY: &str = "score";

/// Property holding the class name, written for human readers.
pub const CLASS_NAME_PROPERTY: &str = "class_name";

/// A GeoJSON position: `[x, y, ...]`.
pub type Position = Vec<f64>;

/// A GeoJSON feature collection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,

    pub features: Vec<Feature>,
}

/// A single GeoJSON feature.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,

    /// The feature geometry. GeoJSON allows `null` here.
    pub geometry: Option<Geometry>,

    /// Free-form feature properties. GeoJSON allows `null` here.
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

/// The GeoJSON geometry types that label files use.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

impl FeatureCollection {
    /// Creates a feature collection from features.
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }

    /// Returns a copy with every position passed through `f(x, y)`.
    pub fn map_positions(&self, f: &impl Fn(f64, f64) -> (f64, f64)) -> Self {
        Self {
            kind: self.kind.clone(),
            features: self
                .features
                .iter()
                .map(|feature| Feature {
                    kind: feature.kind.clone(),
                    geometry: feature.geometry.as_ref().map(|g| g.map_positions(f)),
                    properties: feature.properties.clone(),
                })
                .collect(),
        }
    }
}

impl Feature {
    /// Creates a feature from a geometry and its properties.
    pub fn new(geometry: Geometry, properties: Map<String, Value>) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry: Some(geometry),
            properties: Some(properties),
        }
    }

    fn property(&self, name: &str) -> Option<&Value> {
        self.properties
            .as_ref()
            .and_then(|p| p.get(name))
            .filter(|v| !v.is_null())
    }

    /// Reads the required `class_id` property.
    ///
    /// Integral floats such as `1.0` are accepted. `index` is the position of the feature in its collection and is only
    /// used for error messages.
    pub fn class_id(&self, index: usize) -> Result<ClassId, SceneLabelError> {
        let value = self
            .property(CLASS_ID_PROPERTY)
            .ok_or(SceneLabelError::MissingProperty {
                feature: index,
                property: CLASS_ID_PROPERTY,
            })?;

        value
            .as_u64()
            .or_else(|| {
                value
                    .as_f64()
                    .filter(|v| v.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(v))
                    .map(|v| v as u64)
            })
            .and_then(|id| u32::try_from(id).ok())
            .map(ClassId)
            .ok_or_else(|| SceneLabelError::InvalidProperty {
                feature: index,
                property: CLASS_ID_PROPERTY,
                message: format!("expected a non-negative integer, got {}", value),
            })
    }

    /// Reads the optional `score` property, defaulting to 1.0.
    pub fn score(&self, index: usize) -> Result<f64, SceneLabelError> {
        match self.property(SCORE_PROPERTY) {
            None => Ok(1.0),
            Some(value) => value.as_f64().ok_or_else(|| SceneLabelError::InvalidProperty {
                feature: index,
                property: SCORE_PROPERTY,
                message: format!("expected a number, got {}", value),
            }),
        }
    }

    /// Returns the bounding envelope of the feature geometry as a box.
    pub fn envelope(&self, index: usize) -> Result<BBox, SceneLabelError> {
        let geometry = self
            .geometry
            .as_ref()
            .ok_or_else(|| SceneLabelError::UnsupportedGeometry {
                feature: index,
                message: "geometry is null".into(),
            })?;

        geometry
            .to_geo(index)?
            .bounding_rect()
            .map(BBox::from_rect)
            .ok_or_else(|| SceneLabelError::UnsupportedGeometry {
                feature: index,
                message: "geometry is empty".into(),
            })
    }
}

impl Geometry {
    /// Converts into a `geo` geometry.
    pub fn to_geo(&self, index: usize) -> Result<geo::Geometry<f64>, SceneLabelError> {
        let coord = |p: &Position| -> Result<Coord<f64>, SceneLabelError> {
            match p.as_slice() {
                [x, y, ..] => Ok(Coord { x: *x, y: *y }),
                _ => Err(SceneLabelError::UnsupportedGeometry {
                    feature: index,
                    message: format!("position with {} value(s)", p.len()),
                }),
            }
        };
        let line = |ps: &[Position]| -> Result<LineString<f64>, SceneLabelError> {
            ps.iter().map(coord).collect::<Result<Vec<_>, _>>().map(LineString::new)
        };
        let polygon = |rings: &[Vec<Position>]| -> Result<geo::Polygon<f64>, SceneLabelError> {
            let mut rings = rings.iter().map(|r| line(r));
            let exterior = rings.next().transpose()?.unwrap_or_else(|| LineString::new(vec![]));
            let interiors = rings.collect::<Result<Vec<_>, _>>()?;
            Ok(geo::Polygon::new(exterior, interiors))
        };

        let geometry: geo::Geometry<f64> = match self {
            Geometry::Point(p) => Point::from(coord(p)?).into(),
            Geometry::MultiPoint(ps) => MultiPoint::new(
                ps.iter()
                    .map(|p| coord(p).map(Point::from))
                    .collect::<Result<Vec<_>, _>>()?,
            )
            .into(),
            Geometry::LineString(ps) => line(ps)?.into(),
            Geometry::MultiLineString(lines) => MultiLineString::new(
                lines
                    .iter()
                    .map(|l| line(l))
                    .collect::<Result<Vec<_>, _>>()?,
            )
            .into(),
            Geometry::Polygon(rings) => polygon(rings)?.into(),
            Geometry::MultiPolygon(polygons) => MultiPolygon::new(
                polygons
                    .iter()
                    .map(|p| polygon(p))
                    .collect::<Result<Vec<_>, _>>()?,
            )
            .into(),
        };
        Ok(geometry)
    }

    /// Returns a copy with every position passed through `f(x, y)`.
    ///
    /// Positions with fewer than two values are kept as they are.
    pub fn map_positions(&self, f: &impl Fn(f64, f64) -> (f64, f64)) -> Self {
        let pos = |p: &Position| -> Position {
            match p.as_slice() {
                [x, y, rest @ ..] => {
                    let (nx, ny) = f(*x, *y);
                    let mut out = vec![nx, ny];
                    out.extend_from_slice(rest);
                    out
                }
                _ => p.clone(),
            }
        };
        let line = |ps: &Vec<Position>| ps.iter().map(pos).collect::<Vec<_>>();
        let rings = |rs: &Vec<Vec<Position>>| rs.iter().map(line).collect::<Vec<_>>();

        match self {
            Geometry::Point(p) => Geometry::Point(pos(p)),
            Geometry::MultiPoint(ps) => Geometry::MultiPoint(line(ps)),
            Geometry::LineString(ps) => Geometry::LineString(line(ps)),
            Geometry::MultiLineString(ls) => Geometry::MultiLineString(rings(ls)),
            Geometry::Polygon(rs) => Geometry::Polygon(rings(rs)),
            Geometry::MultiPolygon(ps) => Geometry::MultiPolygon(ps.iter().map(rings).collect()),
        }
    }

    /// Builds the closed polygon outlining `bbox`, with `x` = column and
    /// `y` = row.
    pub fn from_bbox(bbox: &BBox) -> Self {
        let ring = vec![
            vec![bbox.xmin, bbox.ymin],
            vec![bbox.xmax, bbox.ymin],
            vec![bbox.xmax, bbox.ymax],
            vec![bbox.xmin, bbox.ymax],
            vec![bbox.xmin, bbox.ymin],
        ];
        Geometry::Polygon(vec![ring])
    }
}

/// Converts labels into a feature collection of box polygons in map
/// coordinates.
///
/// Each feature carries `class_id`, `class_name` and `score` properties.
///
/// # Errors
/// Returns [`SceneLabelError::UnknownClass`] if a class id has no entry in
/// `class_config`.
pub fn labels_to_geojson(
    labels: &ObjectDetectionLabels,
    class_config: &ClassConfig,
    crs_transformer: &dyn CrsTransformer,
) -> Result<FeatureCollection, SceneLabelError> {
    let to_map = |x: f64, y: f64| crs_transformer.pixel_to_map((x, y));

    let features = labels
        .boxes()
        .iter()
        .zip(labels.class_ids())
        .zip(labels.scores())
        .map(|((bbox, &class_id), &score)| -> Result<Feature, SceneLabelError> {
            let mut properties = Map::new();
            properties.insert(CLASS_ID_PROPERTY.into(), class_id.as_u32().into());
            properties.insert(
                CLASS_NAME_PROPERTY.into(),
                class_config.get_name(class_id)?.into(),
            );
            properties.insert(SCORE_PROPERTY.into(), score.into());

            let geometry = Geometry::from_bbox(bbox).map_positions(&to_map);
            Ok(Feature::new(geometry, properties))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureCollection::new(features))
}

/// Collects the Polygon and MultiPolygon geometries of a collection, e.g.
/// to use them as areas of interest. Other geometries are skipped.
pub fn polygons(collection: &FeatureCollection) -> Result<Vec<geo::Polygon<f64>>, SceneLabelError> {
    let mut out = Vec::new();
    for (index, feature) in collection.features.iter().enumerate() {
        match feature.geometry.as_ref().map(|g| g.to_geo(index)).transpose()? {
            Some(geo::Geometry::Polygon(polygon)) => out.push(polygon),
            Some(geo::Geometry::MultiPolygon(multi)) => out.extend(multi.0),
            _ => {}
        }
    }
    Ok(out)
}

/// Reads a feature collection from a GeoJSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_geojson(path: &Path) -> Result<FeatureCollection, SceneLabelError> {
    let file = File::open(path).map_err(SceneLabelError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| SceneLabelError::GeoJsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a feature collection to a GeoJSON file.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_geojson(path: &Path, collection: &FeatureCollection) -> Result<(), SceneLabelError> {
    let file = File::create(path).map_err(SceneLabelError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, collection).map_err(|source| {
        SceneLabelError::GeoJsonWrite {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Reads a feature collection from a GeoJSON string.
pub fn from_geojson_str(json: &str) -> Result<FeatureCollection, serde_json::Error> {
    serde_json::from_str(json)
}

/// Reads a feature collection from GeoJSON bytes.
pub fn from_geojson_slice(bytes: &[u8]) -> Result<FeatureCollection, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Fuzz-only entrypoint for GeoJSON label parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_labels(bytes: &[u8]) -> Result<(), SceneLabelError> {
    let collection =
        from_geojson_slice(bytes).map_err(|source| SceneLabelError::GeoJsonParse {
            path: "<fuzz>".into(),
            source,
        })?;
    let _ = ObjectDetectionLabels::from_geojson(&collection, None)?;
    Ok(())
}

/// Writes a feature collection to a GeoJSON string.
pub fn to_geojson_string(collection: &FeatureCollection) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(collection)
}
