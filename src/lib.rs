//! Scenelabel: object detection labels for large geospatial scenes.
//!
//! Scenes too large to label or predict in one pass are processed window
//! by window. Scenelabel is the bookkeeping layer between per-window model
//! output and a single scene-wide label set: it moves boxes between window,
//! scene and normalized frames, merges the label sets of many windows,
//! filters them by areas of interest and removes the duplicates that
//! overlapping windows produce.
//!
//! # Modules
//!
//! - [`geom`]: boxes, box lists and the pure operations over them
//! - [`labels`]: the [`ObjectDetectionLabels`] label set and GeoJSON I/O
//! - [`source`]: windowed, read-only access to the labels of a scene
//! - [`store`]: persistence of label sets
//! - [`crs`]: pixel <-> map coordinate transformers
//! - [`error`]: error types for scenelabel operations

pub mod class_config;
pub mod crs;
pub mod error;
pub mod geom;
pub mod labels;
pub mod source;
pub mod store;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::info;

pub use class_config::ClassConfig;
pub use error::SceneLabelError;
pub use labels::{ObjectDetectionLabels, PruneOptions, WindowLabels};

use crate::crs::IdentityTransformer;
use crate::geom::BBox;
use crate::labels::geojson::{polygons, read_geojson};
use crate::store::{GeoJsonLabelStore, LabelStore};

/// The scenelabel CLI application.
#[derive(Parser)]
#[command(name = "scenelabel")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Remove duplicate detections with non-maximum suppression.
    Prune(PruneArgs),
    /// Keep the labels lying mostly inside an extent, clipped to it.
    Crop(CropArgs),
    /// Keep the labels lying entirely inside the polygons of an AOI file.
    FilterAoi(FilterAoiArgs),
    /// Print box counts per class.
    Stats(StatsArgs),
}

/// Input and output shared by the label-rewriting subcommands.
#[derive(clap::Args)]
struct IoArgs {
    /// Input GeoJSON label file (pixel coordinates).
    input: PathBuf,

    /// Output GeoJSON label file.
    #[arg(short, long)]
    output: PathBuf,

    /// JSON class config (`{"names": [...]}`) used for class names in the
    /// output. Defaults to numbered class names.
    #[arg(long)]
    class_config: Option<PathBuf>,
}

/// Arguments for the prune subcommand.
#[derive(clap::Args)]
struct PruneArgs {
    #[command(flatten)]
    io: IoArgs,

    /// Drop boxes scoring below this value.
    #[arg(long, default_value_t = PruneOptions::default().score_thresh)]
    score_thresh: f64,

    /// Suppress boxes whose IoU with a better box exceeds this value.
    #[arg(long, default_value_t = PruneOptions::default().merge_thresh)]
    merge_thresh: f64,

    /// Keep at most this many boxes.
    #[arg(long)]
    max_output_size: Option<usize>,
}

/// Arguments for the crop subcommand.
#[derive(clap::Args)]
struct CropArgs {
    #[command(flatten)]
    io: IoArgs,

    /// Extent as 'ymin,xmin,ymax,xmax' in pixels.
    #[arg(long)]
    extent: String,
}

/// Arguments for the filter-aoi subcommand.
#[derive(clap::Args)]
struct FilterAoiArgs {
    #[command(flatten)]
    io: IoArgs,

    /// GeoJSON file whose Polygon and MultiPolygon features form the AOI.
    #[arg(long)]
    aoi: PathBuf,
}

/// Arguments for the stats subcommand.
#[derive(clap::Args)]
struct StatsArgs {
    /// Input GeoJSON label file (pixel coordinates).
    input: PathBuf,
}

/// Run the scenelabel CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), SceneLabelError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Prune(args)) => run_prune(args),
        Some(Commands::Crop(args)) => run_crop(args),
        Some(Commands::FilterAoi(args)) => run_filter_aoi(args),
        Some(Commands::Stats(args)) => run_stats(args),
        None => {
            println!("scenelabel {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Object detection labels for large geospatial scenes.");
            println!();
            println!("Run 'scenelabel --help' for usage information.");
            Ok(())
        }
    }
}

fn load_labels(
    input: &Path,
    extent: Option<&BBox>,
) -> Result<ObjectDetectionLabels, SceneLabelError> {
    let collection = read_geojson(input)?;
    ObjectDetectionLabels::from_geojson(&collection, extent)
}

fn save_labels(io: &IoArgs, labels: &ObjectDetectionLabels) -> Result<(), SceneLabelError> {
    let class_config: ClassConfig = match &io.class_config {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str(&text).map_err(|e| {
                SceneLabelError::InvalidArgument(format!(
                    "bad class config {}: {}",
                    path.display(),
                    e
                ))
            })?
        }
        None => ClassConfig::numbered(),
    };

    let store = GeoJsonLabelStore::new(&io.output, class_config, Box::new(IdentityTransformer));
    labels.save(&store)
}

fn run_prune(args: PruneArgs) -> Result<(), SceneLabelError> {
    let labels = load_labels(&args.io.input, None)?;
    let opts = PruneOptions {
        score_thresh: args.score_thresh,
        merge_thresh: args.merge_thresh,
        max_output_size: args.max_output_size,
    };
    let pruned = labels.prune_with(&opts)?;
    info!("Pruned {} box(es) down to {}", labels.len(), pruned.len());
    println!("Kept {} of {} box(es)", pruned.len(), labels.len());
    save_labels(&args.io, &pruned)
}

fn run_crop(args: CropArgs) -> Result<(), SceneLabelError> {
    let extent = parse_extent(&args.extent)?;
    let labels = load_labels(&args.io.input, Some(&extent))?;
    println!("Kept {} box(es) inside the extent", labels.len());
    save_labels(&args.io, &labels)
}

fn run_filter_aoi(args: FilterAoiArgs) -> Result<(), SceneLabelError> {
    let labels = load_labels(&args.io.input, None)?;
    let aoi = read_geojson(&args.aoi)?;
    let aoi_polygons = polygons(&aoi)?;
    let filtered = labels.filter_by_aoi(&aoi_polygons);
    println!("Kept {} of {} box(es)", filtered.len(), labels.len());
    save_labels(&args.io, &filtered)
}

fn run_stats(args: StatsArgs) -> Result<(), SceneLabelError> {
    let labels = load_labels(&args.input, None)?;

    let mut per_class = BTreeMap::new();
    for class_id in labels.class_ids() {
        *per_class.entry(*class_id).or_insert(0usize) += 1;
    }

    println!("Boxes: {}", labels.len());
    for (class_id, count) in per_class {
        println!("  class {}: {}", class_id, count);
    }
    Ok(())
}

/// Parses an extent given as `ymin,xmin,ymax,xmax`.
fn parse_extent(text: &str) -> Result<BBox, SceneLabelError> {
    let values = text
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| SceneLabelError::InvalidArgument(format!("bad extent '{}': {}", text, e)))?;
    BBox::from_npbox(&values)
}
