//! JSON layer documents and run reports

use crate::alignment::placement::{PlacedTrait, align_combination};
use crate::composition::engine::{
    CapStrategy, CombinationEngine, CombinationEntry, total_combinations,
};
use crate::composition::graph::LayerGraph;
use crate::composition::layer::Layer;
use crate::io::error::{EngineError, Result};
use crate::segmentation::segmenter::BoundingBox;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Accepted layer document shapes
#[derive(Deserialize)]
#[serde(untagged)]
enum LayerDocument {
    Wrapped { layers: Vec<Layer> },
    Bare(Vec<Layer>),
}

/// Parse layers from `{"layers": [...]}` or a bare array
///
/// # Errors
///
/// Returns an error if the text is not a valid layer document
pub fn parse_layers(text: &str) -> Result<Vec<Layer>> {
    let document: LayerDocument = serde_json::from_str(text)?;
    Ok(match document {
        LayerDocument::Wrapped { layers } | LayerDocument::Bare(layers) => layers,
    })
}

/// Read and parse a layer document
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The contents are not a valid layer document
pub fn load_layers(path: &Path) -> Result<Vec<Layer>> {
    let text = std::fs::read_to_string(path).map_err(|e| EngineError::FileSystem {
        path: path.to_path_buf(),
        operation: "read layer document",
        source: e,
    })?;
    parse_layers(&text).map_err(|error| match error {
        EngineError::LayerDocument { source, .. } => EngineError::LayerDocument {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Write any serializable report as pretty JSON
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The file cannot be written
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| EngineError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    let text = serde_json::to_string_pretty(value).map_err(|e| EngineError::ReportExport {
        path: path.to_path_buf(),
        source: e,
    })?;
    std::fs::write(path, text).map_err(|e| EngineError::FileSystem {
        path: path.to_path_buf(),
        operation: "write report",
        source: e,
    })
}

/// One exported asset in a sheet manifest
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Position in segmentation discovery order
    pub index: usize,
    /// File name relative to the manifest
    pub file: String,
    /// Region bounding box on the sheet
    pub bounding_box: BoundingBox,
    /// Region pixel count
    pub pixel_count: usize,
    /// Width after trimming
    pub final_width: usize,
    /// Height after trimming
    pub final_height: usize,
    /// Top-left of the trimmed asset on the sheet
    pub crop_origin: (usize, usize),
}

/// An asset that could not be extracted
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFailure {
    /// Position in segmentation discovery order
    pub index: usize,
    /// Error message
    pub error: String,
}

/// Everything extracted from one sheet
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetManifest {
    /// Source sheet path
    pub sheet: String,
    /// Sheet width in pixels
    pub width: usize,
    /// Sheet height in pixels
    pub height: usize,
    /// Successfully exported assets
    pub assets: Vec<AssetRecord>,
    /// Assets whose extraction failed
    pub failures: Vec<AssetFailure>,
}

/// A combination with its score and placements
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComposedRecord {
    /// Position in the returned list
    pub index: usize,
    /// Mean rarity of the selected traits
    pub rarity_score: f64,
    /// Selected traits in z-order
    pub entries: Vec<CombinationEntry>,
    /// Snapped placements in z-order
    pub placements: Vec<PlacedTrait>,
}

/// Result of a composition run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositionReport {
    /// Layer names in z-order
    pub layer_order: Vec<String>,
    /// Combinations available before capping
    pub total_available: u64,
    /// Cap applied to the run
    pub cap: usize,
    /// `prefix` or `reservoir`
    pub strategy: String,
    /// Layers whose parent name matched no layer
    pub dangling_parents: Vec<String>,
    /// Produced combinations
    pub combinations: Vec<ComposedRecord>,
}

impl CompositionReport {
    /// Order layers, enumerate combinations and place every trait
    ///
    /// Placements use nominal rects; no asset measurements are applied.
    pub fn compose(layers: &[Layer], engine: &CombinationEngine) -> Self {
        let graph = LayerGraph::new(layers);
        let ordered = graph.ordered_sequence();
        let combinations = engine
            .enumerate(&ordered)
            .into_iter()
            .enumerate()
            .map(|(index, combination)| ComposedRecord {
                index,
                rarity_score: combination.rarity_score(),
                placements: align_combination(&combination, |_| None),
                entries: combination.entries,
            })
            .collect();

        Self {
            layer_order: ordered.iter().map(|layer| layer.name.clone()).collect(),
            total_available: total_combinations(&ordered),
            cap: engine.cap(),
            strategy: match engine.strategy() {
                CapStrategy::Prefix => "prefix".to_string(),
                CapStrategy::Reservoir { seed } => format!("reservoir(seed={seed})"),
            },
            dangling_parents: graph
                .dangling_parents()
                .iter()
                .map(|dangling| dangling.layer.clone())
                .collect(),
            combinations,
        }
    }
}
