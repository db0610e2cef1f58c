//! Chroma-key pixel classification against one or more reference colors

use crate::io::error::{EngineError, Result, invalid_parameter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Background color a sheet was rendered against
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceColor {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl ReferenceColor {
    /// Pure white, the default sheet background
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a reference color from its channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Sum of absolute per-channel differences to an RGB triple
    ///
    /// Exact equality is 0 and the maximum is 765.
    pub const fn distance(&self, rgb: [u8; 3]) -> u32 {
        let [r, g, b] = rgb;
        self.r.abs_diff(r) as u32 + self.g.abs_diff(g) as u32 + self.b.abs_diff(b) as u32
    }
}

impl fmt::Display for ReferenceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for ReferenceColor {
    type Err = EngineError;

    /// Accepts `#rrggbb`, `rrggbb` or `r,g,b`
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();

        if trimmed.contains(',') {
            let channels = trimmed
                .split(',')
                .map(|part| part.trim().parse::<u8>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| invalid_parameter("key", &s, &e))?;
            return match channels.as_slice() {
                [r, g, b] => Ok(Self::new(*r, *g, *b)),
                _ => Err(invalid_parameter(
                    "key",
                    &s,
                    &"expected exactly three channels",
                )),
            };
        }

        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid_parameter("key", &s, &"expected #rrggbb"));
        }
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                .ok_or_else(|| invalid_parameter("key", &s, &"invalid hex digits"))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// Outcome of classifying a single pixel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelClass {
    /// Within tolerance of some reference color
    Background,
    /// Part of a sprite
    Foreground,
}

/// Multi-target chroma key
///
/// A pixel is background when *any* reference color lies strictly within
/// the threshold, measured as a sum of absolute channel differences.
/// Alpha is ignored unless [`ChromaKey::with_transparent_background`]
/// is enabled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChromaKey {
    references: Vec<ReferenceColor>,
    transparent_background: bool,
}

impl ChromaKey {
    /// Create a key from a non-empty set of reference colors
    ///
    /// # Errors
    ///
    /// Returns an error if no reference colors are given
    pub fn new(references: Vec<ReferenceColor>) -> Result<Self> {
        if references.is_empty() {
            return Err(invalid_parameter(
                "references",
                &"[]",
                &"at least one reference color is required",
            ));
        }
        Ok(Self {
            references,
            transparent_background: false,
        })
    }

    /// Key against a single background color
    pub fn single(reference: ReferenceColor) -> Self {
        Self {
            references: vec![reference],
            transparent_background: false,
        }
    }

    /// Also treat fully transparent pixels as background
    #[must_use]
    pub const fn with_transparent_background(mut self, enabled: bool) -> Self {
        self.transparent_background = enabled;
        self
    }

    /// Whether alpha 0 alone makes a pixel background
    pub const fn transparent_background(&self) -> bool {
        self.transparent_background
    }

    /// Reference colors in this key
    pub fn references(&self) -> &[ReferenceColor] {
        &self.references
    }

    /// Smallest distance from an RGB triple to any reference color
    pub fn min_distance(&self, rgb: [u8; 3]) -> u32 {
        self.references
            .iter()
            .map(|reference| reference.distance(rgb))
            .min()
            .unwrap_or(u32::MAX)
    }

    /// Classify a pixel at the given threshold
    pub fn classify(&self, rgba: [u8; 4], threshold: u32) -> PixelClass {
        let [r, g, b, a] = rgba;
        if (self.transparent_background && a == 0) || self.min_distance([r, g, b]) < threshold {
            PixelClass::Background
        } else {
            PixelClass::Foreground
        }
    }

    /// Shorthand for `classify(..) == PixelClass::Background`
    pub fn is_background(&self, rgba: [u8; 4], threshold: u32) -> bool {
        self.classify(rgba, threshold) == PixelClass::Background
    }
}

impl Default for ChromaKey {
    fn default() -> Self {
        Self::single(ReferenceColor::WHITE)
    }
}
