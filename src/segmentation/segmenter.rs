//! Connected-component segmentation of chroma-keyed sprite sheets
//!
//! Foreground pixels are grouped into 4-connected regions by a breadth-first
//! flood fill. Seeds are found by scanning every `seed_stride`-th row, so an
//! island lying entirely between two scanned rows is not discovered; a stride
//! of 1 makes the scan exhaustive.

use crate::io::configuration::{DEFAULT_NOISE_FLOOR, DEFAULT_SEED_STRIDE, DEFAULT_THRESHOLD};
use crate::io::error::{Result, invalid_parameter};
use crate::segmentation::chroma::{ChromaKey, ReferenceColor};
use crate::segmentation::pixels::PixelBuffer;
use crate::segmentation::visited::VisitedMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Axis-aligned pixel rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Leftmost column (inclusive)
    pub left: usize,
    /// Topmost row (inclusive)
    pub top: usize,
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
}

impl BoundingBox {
    /// Create a box from its origin and size
    pub const fn new(left: usize, top: usize, width: usize, height: usize) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Build the box spanning inclusive min/max corners
    pub const fn from_extents(min_x: usize, min_y: usize, max_x: usize, max_y: usize) -> Self {
        Self::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
    }

    /// First column past the box
    pub const fn right(&self) -> usize {
        self.left + self.width
    }

    /// First row past the box
    pub const fn bottom(&self) -> usize {
        self.top + self.height
    }

    /// Number of pixels covered
    pub const fn area(&self) -> usize {
        self.width * self.height
    }

    /// Check if a pixel lies inside the box
    pub const fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }

    /// Grow the box by `padding` on every side, clamped to `width x height`
    #[must_use]
    pub fn expanded(&self, padding: usize, width: usize, height: usize) -> Self {
        let left = self.left.saturating_sub(padding);
        let top = self.top.saturating_sub(padding);
        let right = self.right().saturating_add(padding).min(width);
        let bottom = self.bottom().saturating_add(padding).min(height);
        Self::new(
            left,
            top,
            right.saturating_sub(left),
            bottom.saturating_sub(top),
        )
    }
}

/// Connected group of foreground pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Tightest box containing every pixel of the region
    pub bounding_box: BoundingBox,
    /// Number of pixels in the region
    pub pixel_count: usize,
}

/// Parameters for a segmentation run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentationConfig {
    /// Pixels closer than this to a reference color are background
    pub threshold: u32,
    /// Regions smaller than this are discarded as noise
    pub noise_floor: usize,
    /// Row stride of the seed scan
    pub seed_stride: usize,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            noise_floor: DEFAULT_NOISE_FLOOR,
            seed_stride: DEFAULT_SEED_STRIDE,
        }
    }
}

impl SegmentationConfig {
    /// Check parameter ranges
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold or seed stride is zero
    pub fn validate(&self) -> Result<()> {
        if self.threshold == 0 {
            return Err(invalid_parameter(
                "threshold",
                &self.threshold,
                &"must be at least 1 so exact reference matches are background",
            ));
        }
        if self.seed_stride == 0 {
            return Err(invalid_parameter(
                "seed_stride",
                &self.seed_stride,
                &"must be positive",
            ));
        }
        Ok(())
    }
}

/// Splits a sheet into connected foreground regions
#[derive(Clone, Debug)]
pub struct ChromaSegmenter {
    key: ChromaKey,
    config: SegmentationConfig,
}

impl ChromaSegmenter {
    /// Create a segmenter
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(key: ChromaKey, config: SegmentationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { key, config })
    }

    /// Chroma key used for classification
    pub const fn key(&self) -> &ChromaKey {
        &self.key
    }

    /// Active configuration
    pub const fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Find all regions at or above the noise floor, in discovery order
    ///
    /// An all-background buffer yields an empty list.
    pub fn segment(&self, pixels: &PixelBuffer) -> Vec<Region> {
        let (width, height) = (pixels.width(), pixels.height());
        let mut visited = VisitedMap::new(width, height);
        let mut regions = Vec::new();
        let mut discarded = 0usize;

        for y in (0..height).step_by(self.config.seed_stride) {
            for x in 0..width {
                if visited.is_visited(x, y) || self.is_background_at(pixels, x, y) {
                    continue;
                }

                let region = self.flood_fill(pixels, &mut visited, (x, y));
                if region.pixel_count >= self.config.noise_floor {
                    regions.push(region);
                } else {
                    discarded += 1;
                }
            }
        }

        tracing::debug!(
            width,
            height,
            regions = regions.len(),
            discarded,
            "segmented sheet"
        );
        regions
    }

    fn is_background_at(&self, pixels: &PixelBuffer, x: usize, y: usize) -> bool {
        pixels
            .pixel(x, y)
            .is_none_or(|rgba| self.key.is_background(rgba, self.config.threshold))
    }

    // Breadth-first 4-connected fill from an unvisited foreground seed
    fn flood_fill(
        &self,
        pixels: &PixelBuffer,
        visited: &mut VisitedMap,
        seed: (usize, usize),
    ) -> Region {
        let (width, height) = (pixels.width(), pixels.height());
        let (mut min_x, mut min_y) = seed;
        let (mut max_x, mut max_y) = seed;
        let mut pixel_count = 0;

        let mut queue = VecDeque::new();
        visited.mark(seed.0, seed.1);
        queue.push_back(seed);

        while let Some((x, y)) = queue.pop_front() {
            pixel_count += 1;
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);

            let neighbors = [
                x.checked_sub(1).map(|nx| (nx, y)),
                (x + 1 < width).then_some((x + 1, y)),
                y.checked_sub(1).map(|ny| (x, ny)),
                (y + 1 < height).then_some((x, y + 1)),
            ];

            for (nx, ny) in neighbors.into_iter().flatten() {
                if visited.is_visited(nx, ny) || self.is_background_at(pixels, nx, ny) {
                    continue;
                }
                visited.mark(nx, ny);
                queue.push_back((nx, ny));
            }
        }

        Region {
            bounding_box: BoundingBox::from_extents(min_x, min_y, max_x, max_y),
            pixel_count,
        }
    }
}

/// Segment a buffer against a set of reference colors
///
/// Uses the default seed stride.
///
/// # Errors
///
/// Returns an error if `references` is empty or `threshold` is zero
pub fn segment(
    pixels: &PixelBuffer,
    references: &[ReferenceColor],
    threshold: u32,
    noise_floor: usize,
) -> Result<Vec<Region>> {
    let key = ChromaKey::new(references.to_vec())?;
    let segmenter = ChromaSegmenter::new(
        key,
        SegmentationConfig {
            threshold,
            noise_floor,
            ..SegmentationConfig::default()
        },
    )?;
    Ok(segmenter.segment(pixels))
}
