//! Per-pixel visited tracking for flood fill

use bitvec::prelude::*;
use std::fmt;

/// One bit per pixel recording which pixels a flood fill has claimed
///
/// Sized to the buffer up front so memory stays at `width * height` bits
/// regardless of how many regions are discovered.
#[derive(Clone, Debug)]
pub struct VisitedMap {
    bits: BitVec,
    width: usize,
    height: usize,
}

impl VisitedMap {
    /// Create a map with nothing visited
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            bits: bitvec![0; width * height],
            width,
            height,
        }
    }

    const fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    /// Mark a pixel as visited
    ///
    /// Returns `true` only the first time a pixel is marked. Positions
    /// outside the map are never marked.
    pub fn mark(&mut self, x: usize, y: usize) -> bool {
        let Some(index) = self.index(x, y) else {
            return false;
        };
        !self.bits.replace(index, true)
    }

    /// Test whether a pixel has been visited
    pub fn is_visited(&self, x: usize, y: usize) -> bool {
        self.index(x, y)
            .and_then(|index| self.bits.get(index).as_deref().copied())
            .unwrap_or(false)
    }

    /// Number of visited pixels
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Map dimensions as (width, height)
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

impl fmt::Display for VisitedMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VisitedMap({}x{}, {} visited)",
            self.width,
            self.height,
            self.count()
        )
    }
}
