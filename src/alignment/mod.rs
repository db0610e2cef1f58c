//! Logical canvas placement with category snap rules

/// Logical canvas rects and percentage conversion
pub mod canvas;
/// Per-combination placement for renderers
pub mod placement;
/// Category snap rules and measured rescaling
pub mod snap;

pub use canvas::{Rect, RelativeRect, to_relative_rect};
pub use snap::{Category, SnapRule};
