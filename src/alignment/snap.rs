//! Category snap rules and the measured rescale pass
//!
//! Rules are advisory. They compute where a trait *should* sit relative to
//! fixed reference lines (the neck connection between head and body) but
//! never clamp or reject a placement.
//!
//! Placement happens twice. The nominal rect from the layer document is a
//! planning estimate; once an asset has been extracted its real pixel size
//! is known, and `rescale_and_resnap` brings it into the category's width
//! band and recomputes the snapped position from the new height.

use crate::alignment::canvas::Rect;
use crate::io::configuration::{CANVAS_CENTER, NECK_CONNECTION_Y, NECK_TOP_Y};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trait category driving snap behavior
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    /// Full-canvas backdrop
    Background,
    /// Torso, hangs from the neck line
    Body,
    /// Head, rests on the neck line
    Head,
    /// Hats, glasses and other overlays
    Accessory,
    /// Anything without a rule
    Other,
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "background" | "backdrop" | "bg" => Self::Background,
            "body" | "torso" => Self::Body,
            "head" | "face" => Self::Head,
            "accessory" | "accessories" => Self::Accessory,
            _ => Self::Other,
        }
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Background => "background",
            Self::Body => "body",
            Self::Head => "head",
            Self::Accessory => "accessory",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Vertical reference line a category aligns to
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VerticalSnap {
    /// Bottom edge lands on the line: `y = line - height`
    BottomAt(f64),
    /// Top edge starts on the line: `y = line`
    TopAt(f64),
    /// Keep the nominal `y`
    Free,
}

/// Acceptable width range and the width to rescale toward
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WidthBand {
    /// Narrowest acceptable width
    pub min: f64,
    /// Widest acceptable width
    pub max: f64,
    /// Width an out-of-band asset is scaled to
    pub target: f64,
}

impl WidthBand {
    /// Check if a width is inside the band
    pub const fn contains(&self, width: f64) -> bool {
        width >= self.min && width <= self.max
    }
}

/// Declarative placement rule for one category
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapRule {
    /// Vertical alignment
    pub vertical: VerticalSnap,
    /// Center horizontally on the canvas: `x = center - width / 2`
    pub center_horizontally: bool,
    /// Width band enforced by the rescale pass
    pub width_band: Option<WidthBand>,
}

impl SnapRule {
    /// Rule that leaves placements untouched
    pub const FREE: Self = Self {
        vertical: VerticalSnap::Free,
        center_horizontally: false,
        width_band: None,
    };

    /// Snap a rect, keeping its size
    pub fn apply(&self, rect: Rect) -> Rect {
        let x = if self.center_horizontally {
            rect.width.mul_add(-0.5, CANVAS_CENTER)
        } else {
            rect.x
        };
        let y = match self.vertical {
            VerticalSnap::BottomAt(line) => line - rect.height,
            VerticalSnap::TopAt(line) => line,
            VerticalSnap::Free => rect.y,
        };
        Rect::new(x, y, rect.width, rect.height)
    }

    /// Size an asset from its measured dimensions and snap it again
    ///
    /// Measured dimensions are in logical units. Widths outside the band
    /// are scaled toward the band target, preserving aspect ratio; the
    /// snapped position is then computed from the new height. A
    /// non-positive measured width leaves the nominal size in place.
    pub fn rescale_and_resnap(&self, nominal: Rect, actual_width: f64, actual_height: f64) -> Rect {
        if actual_width <= 0.0 {
            return self.apply(nominal);
        }

        let scale = match self.width_band {
            Some(band) if !band.contains(actual_width) => band.target / actual_width,
            _ => 1.0,
        };

        self.apply(nominal.with_size(actual_width * scale, actual_height * scale))
    }
}

const HEAD_BAND: WidthBand = WidthBand {
    min: 300.0,
    max: 520.0,
    target: 420.0,
};

const BODY_BAND: WidthBand = WidthBand {
    min: 380.0,
    max: 720.0,
    target: 560.0,
};

/// Rule table
pub const fn rule_for(category: Category) -> SnapRule {
    match category {
        Category::Head => SnapRule {
            vertical: VerticalSnap::BottomAt(NECK_CONNECTION_Y),
            center_horizontally: true,
            width_band: Some(HEAD_BAND),
        },
        Category::Body => SnapRule {
            vertical: VerticalSnap::TopAt(NECK_TOP_Y),
            center_horizontally: true,
            width_band: Some(BODY_BAND),
        },
        Category::Background => SnapRule {
            vertical: VerticalSnap::TopAt(0.0),
            center_horizontally: true,
            width_band: None,
        },
        Category::Accessory | Category::Other => SnapRule::FREE,
    }
}

/// Snap a nominal rect for a category
pub fn snap(category: Category, rect: Rect) -> Rect {
    rule_for(category).apply(rect)
}

/// Rescale a measured asset for a category and snap it
pub fn rescale_and_resnap(
    category: Category,
    nominal: Rect,
    actual_width: f64,
    actual_height: f64,
) -> Rect {
    rule_for(category).rescale_and_resnap(nominal, actual_width, actual_height)
}
