//! Final placement of a combination's traits for an external renderer

use crate::alignment::canvas::{Rect, RelativeRect, to_logical_relative};
use crate::alignment::snap::{Category, rescale_and_resnap, snap};
use crate::composition::engine::{Combination, CombinationEntry};
use serde::{Deserialize, Serialize};

/// Where one trait image is drawn
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedTrait {
    /// Source layer
    pub layer_name: String,
    /// Placed trait
    pub trait_name: String,
    /// Draw order, lower is drawn first
    pub z_index: usize,
    /// Rect on the logical canvas
    pub rect: Rect,
    /// Same rect as canvas percentages
    pub relative: RelativeRect,
}

/// Place every entry of a combination
///
/// `measure` returns the actual size of an entry's asset in logical units
/// when it is known. Measured entries go through the rescale pass; the
/// rest are snapped at their nominal size. Entries without a category use
/// [`Category::Other`], which keeps the nominal rect.
pub fn align_combination<F>(combination: &Combination, measure: F) -> Vec<PlacedTrait>
where
    F: Fn(&CombinationEntry) -> Option<(f64, f64)>,
{
    combination
        .entries
        .iter()
        .map(|entry| {
            let category = entry.category.unwrap_or(Category::Other);
            let rect = match measure(entry) {
                Some((width, height)) => rescale_and_resnap(category, entry.position, width, height),
                None => snap(category, entry.position),
            };
            PlacedTrait {
                layer_name: entry.layer_name.clone(),
                trait_name: entry.trait_name.clone(),
                z_index: entry.z_index,
                rect,
                relative: to_logical_relative(&rect),
            }
        })
        .collect()
}
