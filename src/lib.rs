//! Sprite-sheet segmentation and layered trait composition
//!
//! Sheets drawn on a flat background color are cut into individual
//! transparent assets by chroma-key flood fill. Layer documents describing
//! a parent/child hierarchy of trait layers are expanded into capped,
//! rarity-scored combinations whose traits are snapped onto a shared
//! logical canvas.

#![forbid(unsafe_code)]

/// Canvas geometry, category snap rules and combination placement
pub mod alignment;
/// Layer hierarchy ordering and combination enumeration
pub mod composition;
/// Input/output operations and error handling
pub mod io;
/// Chroma-key segmentation and asset extraction
pub mod segmentation;

pub use io::error::{EngineError, Result};
