//! Capped Cartesian expansion of per-layer trait choices
//!
//! Combinations are produced in lexicographic order over the ordered layer
//! sequence: the last layer varies fastest. Generation is an iterative
//! odometer rather than recursion, so layer count never grows the stack and
//! the cap stops generation as soon as it is reached.

use crate::alignment::canvas::Rect;
use crate::alignment::snap::Category;
use crate::composition::layer::{Layer, Trait};
use crate::io::configuration::DEFAULT_COMBINATION_CAP;
use crate::io::error::{Result, invalid_parameter};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

/// One layer's selected trait within a combination
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombinationEntry {
    /// Layer the trait was chosen from
    pub layer_name: String,
    /// Chosen trait
    pub trait_name: String,
    /// Trait image reference
    pub image: String,
    /// Effective rarity (absent rarities count as 100)
    pub rarity: f64,
    /// Nominal placement on the logical canvas
    pub position: Rect,
    /// Draw order; equals the entry's index in the combination
    pub z_index: usize,
    /// Snap category, when the trait or layer declares one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl CombinationEntry {
    fn new(layer: &Layer, option: &Trait, z_index: usize) -> Self {
        Self {
            layer_name: layer.name.clone(),
            trait_name: option.name.clone(),
            image: option.image.clone(),
            rarity: option.effective_rarity(),
            position: layer.position_of(option),
            z_index,
            category: layer.category_of(option),
        }
    }
}

/// Ordered selection of one trait per active layer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Combination {
    /// Entries in z-order
    pub entries: Vec<CombinationEntry>,
}

impl Combination {
    /// Arithmetic mean of the entries' rarities, 0 for an empty combination
    pub fn rarity_score(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let total: f64 = self.entries.iter().map(|entry| entry.rarity).sum();
        total / self.entries.len() as f64
    }

    /// Number of entries
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Test whether the combination has no entries
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Selected trait names in z-order
    pub fn trait_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.trait_name.as_str())
            .collect()
    }
}

/// How the cap selects combinations when the product exceeds it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CapStrategy {
    /// First `cap` combinations in enumeration order
    ///
    /// Deterministic and short-circuiting, but biased toward the first
    /// traits of the first layers.
    #[default]
    Prefix,
    /// Uniform sample of `cap` combinations, returned in enumeration order
    ///
    /// Walks the full product, so cost grows with the product size while
    /// memory stays bounded by the cap.
    Reservoir {
        /// Seed for the sampling generator
        seed: u64,
    },
}

/// Number of combinations before capping, saturating at `u64::MAX`
///
/// Zero when any layer has no traits; one for an empty layer list.
pub fn total_combinations(layers: &[&Layer]) -> u64 {
    layers
        .iter()
        .map(|layer| layer.traits.len() as u64)
        .fold(1u64, u64::saturating_mul)
}

/// Lazy lexicographic iterator over all combinations
pub struct CombinationIter<'a> {
    layers: Vec<&'a Layer>,
    indices: Vec<usize>,
    done: bool,
}

impl<'a> CombinationIter<'a> {
    /// Start at the first combination
    pub fn new(layers: &[&'a Layer]) -> Self {
        Self {
            layers: layers.to_vec(),
            indices: vec![0; layers.len()],
            done: layers.iter().any(|layer| !layer.has_traits()),
        }
    }

    fn current(&self) -> Combination {
        let entries = self
            .layers
            .iter()
            .zip(&self.indices)
            .enumerate()
            .filter_map(|(z_index, (layer, &choice))| {
                layer
                    .traits
                    .get(choice)
                    .map(|option| CombinationEntry::new(layer, option, z_index))
            })
            .collect();
        Combination { entries }
    }

    // Odometer step; the last layer is the fastest digit
    fn advance(&mut self) {
        for (index, layer) in self.indices.iter_mut().zip(&self.layers).rev() {
            *index += 1;
            if *index < layer.traits.len() {
                return;
            }
            *index = 0;
        }
        self.done = true;
    }
}

impl Iterator for CombinationIter<'_> {
    type Item = Combination;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let combination = self.current();
        self.advance();
        Some(combination)
    }
}

/// Enumerates capped combinations over an ordered layer sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CombinationEngine {
    cap: usize,
    strategy: CapStrategy,
}

impl Default for CombinationEngine {
    fn default() -> Self {
        Self::new(DEFAULT_COMBINATION_CAP)
    }
}

impl CombinationEngine {
    /// Engine with prefix capping
    pub const fn new(cap: usize) -> Self {
        Self {
            cap,
            strategy: CapStrategy::Prefix,
        }
    }

    /// Replace the cap strategy
    #[must_use]
    pub const fn with_strategy(mut self, strategy: CapStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Maximum number of combinations returned
    pub const fn cap(&self) -> usize {
        self.cap
    }

    /// Active cap strategy
    pub const fn strategy(&self) -> CapStrategy {
        self.strategy
    }

    /// Enumerate up to `cap` combinations
    ///
    /// Layer order must already be the z-order (see
    /// [`LayerGraph::ordered_sequence`](crate::composition::graph::LayerGraph::ordered_sequence)).
    /// A layer without traits zeroes the product and nothing is returned.
    pub fn enumerate(&self, ordered_layers: &[&Layer]) -> Vec<Combination> {
        if let Some(empty) = ordered_layers.iter().find(|layer| !layer.has_traits()) {
            tracing::warn!(
                layer = %empty.name,
                "layer has no traits, no combinations can be produced"
            );
            return Vec::new();
        }

        let available = total_combinations(ordered_layers);
        let combinations: Vec<Combination> = match self.strategy {
            CapStrategy::Prefix => CombinationIter::new(ordered_layers)
                .take(self.cap)
                .collect(),
            CapStrategy::Reservoir { seed } => {
                reservoir_sample(CombinationIter::new(ordered_layers), self.cap, seed)
            }
        };

        tracing::debug!(
            layers = ordered_layers.len(),
            available,
            produced = combinations.len(),
            "enumerated combinations"
        );
        combinations
    }
}

/// Enumerate with prefix capping
pub fn enumerate(ordered_layers: &[&Layer], cap: usize) -> Vec<Combination> {
    CombinationEngine::new(cap).enumerate(ordered_layers)
}

/// Reject layer lists containing a layer without traits
///
/// # Errors
///
/// Returns an error naming the first layer with an empty trait list
pub fn validate_layers(layers: &[&Layer]) -> Result<()> {
    match layers.iter().find(|layer| !layer.has_traits()) {
        Some(layer) => Err(invalid_parameter(
            "traits",
            &layer.name,
            &"layer has no traits and would zero every combination",
        )),
        None => Ok(()),
    }
}

// Algorithm R, keeping each element's position to restore enumeration order
fn reservoir_sample<I>(items: I, cap: usize, seed: u64) -> Vec<Combination>
where
    I: Iterator<Item = Combination>,
{
    if cap == 0 {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut reservoir: Vec<(usize, Combination)> = Vec::new();

    for (position, item) in items.enumerate() {
        if position < cap {
            reservoir.push((position, item));
            continue;
        }
        let slot = rng.random_range(0..=position);
        if let Some(entry) = reservoir.get_mut(slot) {
            *entry = (position, item);
        }
    }

    reservoir.sort_by_key(|(position, _)| *position);
    reservoir.into_iter().map(|(_, item)| item).collect()
}
