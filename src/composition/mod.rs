//! Layer forest and combinatorial trait expansion

/// Capped Cartesian expansion and rarity scoring
pub mod engine;
/// Parent/child forest with depth ordering
pub mod graph;
/// Layer and trait records
pub mod layer;

pub use engine::{CapStrategy, Combination, CombinationEngine, CombinationEntry};
pub use graph::{LayerGraph, build_forest};
pub use layer::{Anchors, Layer, Trait};
