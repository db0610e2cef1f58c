//! Logical canvas geometry and resolution-independent placement

use crate::io::configuration::LOGICAL_CANVAS_SIZE;
use serde::{Deserialize, Serialize};

/// Rectangle in logical canvas units (0..1024 on both axes)
///
/// Values are not clamped; rects may extend past the canvas or sit at
/// negative offsets after rescaling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    #[serde(default)]
    pub x: f64,
    /// Top edge
    #[serde(default)]
    pub y: f64,
    /// Horizontal extent
    #[serde(default)]
    pub width: f64,
    /// Vertical extent
    #[serde(default)]
    pub height: f64,
}

impl Rect {
    /// Create a rect from its origin and size
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rect covering the whole logical canvas
    pub const fn full_canvas() -> Self {
        Self::new(0.0, 0.0, LOGICAL_CANVAS_SIZE, LOGICAL_CANVAS_SIZE)
    }

    /// Right edge
    pub const fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub const fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Horizontal center
    pub fn center_x(&self) -> f64 {
        self.width.mul_add(0.5, self.x)
    }

    /// Same origin, different size
    #[must_use]
    pub const fn with_size(self, width: f64, height: f64) -> Self {
        Self::new(self.x, self.y, width, height)
    }

    /// Check if the rect lies within `[0, canvas_size]` on both axes
    pub const fn fits_canvas(&self, canvas_size: f64) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.right() <= canvas_size && self.bottom() <= canvas_size
    }
}

/// Rect expressed as percentages of the canvas side
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RelativeRect {
    /// Left edge, percent of canvas width
    pub left_pct: f64,
    /// Top edge, percent of canvas height
    pub top_pct: f64,
    /// Width, percent of canvas width
    pub width_pct: f64,
    /// Height, percent of canvas height
    pub height_pct: f64,
}

impl RelativeRect {
    /// All offsets and extents zero
    pub const ZERO: Self = Self {
        left_pct: 0.0,
        top_pct: 0.0,
        width_pct: 0.0,
        height_pct: 0.0,
    };
}

/// Convert a logical rect into percentage offsets
///
/// A non-positive `canvas_size` yields an all-zero rect.
pub const fn to_relative_rect(rect: &Rect, canvas_size: f64) -> RelativeRect {
    if canvas_size <= 0.0 {
        return RelativeRect::ZERO;
    }
    let scale = 100.0 / canvas_size;
    RelativeRect {
        left_pct: rect.x * scale,
        top_pct: rect.y * scale,
        width_pct: rect.width * scale,
        height_pct: rect.height * scale,
    }
}

/// Convert a rect on the standard 1024-unit canvas into percentages
pub const fn to_logical_relative(rect: &Rect) -> RelativeRect {
    to_relative_rect(rect, LOGICAL_CANVAS_SIZE)
}

/// Map percentages onto a concrete render resolution
pub const fn to_render_rect(relative: &RelativeRect, render_width: f64, render_height: f64) -> Rect {
    Rect::new(
        relative.left_pct / 100.0 * render_width,
        relative.top_pct / 100.0 * render_height,
        relative.width_pct / 100.0 * render_width,
        relative.height_pct / 100.0 * render_height,
    )
}
