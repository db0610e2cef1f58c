//! Cropping, alpha punching and trimming of segmented regions
//!
//! The coarse segmentation pass leaves anti-aliased fringes around each
//! sprite. Extraction re-classifies the padded crop with a stricter
//! threshold, zeroes the alpha of every background pixel and trims the
//! result to its visible content.

use crate::io::configuration::{DEFAULT_PADDING, DEFAULT_STRICT_THRESHOLD};
use crate::io::error::{EngineError, Result, WithContext, decode_error, invalid_parameter};
use crate::segmentation::chroma::{ChromaKey, ReferenceColor};
use crate::segmentation::pixels::PixelBuffer;
use crate::segmentation::segmenter::{BoundingBox, Region};
use rayon::prelude::*;

/// Parameters for extraction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtractionConfig {
    /// Pixels added around the bounding box before punching
    pub padding: usize,
    /// Threshold for the alpha-punching pass
    pub strict_threshold: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            strict_threshold: DEFAULT_STRICT_THRESHOLD,
        }
    }
}

impl ExtractionConfig {
    /// Check that the strict pass is at least as aggressive as segmentation
    ///
    /// # Errors
    ///
    /// Returns an error if `strict_threshold` is below `segmentation_threshold`
    pub fn validate(&self, segmentation_threshold: u32) -> Result<()> {
        if self.strict_threshold < segmentation_threshold {
            return Err(invalid_parameter(
                "strict_threshold",
                &self.strict_threshold,
                &format!("must be at least the segmentation threshold ({segmentation_threshold})"),
            ));
        }
        Ok(())
    }
}

/// A trimmed sprite cut out of a sheet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedAsset {
    /// Region the asset was cut from
    pub source_region: Region,
    /// Trimmed pixels with background alpha punched to zero
    pub pixels: PixelBuffer,
    /// Width after trimming
    pub final_width: usize,
    /// Height after trimming
    pub final_height: usize,
    /// Top-left of the trimmed asset in sheet coordinates
    pub crop_origin: (usize, usize),
}

impl ExtractedAsset {
    /// Flatten the asset onto an opaque canvas of a reference color
    ///
    /// Punched pixels take the reference color, so the result segments
    /// under the same key the way the sprite did on its sheet.
    pub fn on_canvas(&self, reference: ReferenceColor) -> PixelBuffer {
        let mut canvas = PixelBuffer::filled(
            self.pixels.width(),
            self.pixels.height(),
            [reference.r, reference.g, reference.b, u8::MAX],
        );
        for y in 0..self.pixels.height() {
            for x in 0..self.pixels.width() {
                let visible = self.pixels.pixel(x, y).filter(|[_, _, _, alpha]| *alpha > 0);
                if let Some(rgba) = visible {
                    canvas.set_pixel(x, y, rgba);
                }
            }
        }
        canvas
    }
}

/// Cuts regions out of a sheet
#[derive(Clone, Debug)]
pub struct RegionExtractor {
    key: ChromaKey,
    config: ExtractionConfig,
}

impl RegionExtractor {
    /// Create an extractor
    pub const fn new(key: ChromaKey, config: ExtractionConfig) -> Self {
        Self { key, config }
    }

    /// Active configuration
    pub const fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract one region
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The region does not lie inside the buffer (`ImageDecode`)
    /// - No visible pixels remain after alpha punching (`EmptyAsset`)
    pub fn extract(&self, buffer: &PixelBuffer, region: &Region) -> Result<ExtractedAsset> {
        extract(
            buffer,
            region,
            self.config.padding,
            self.config.strict_threshold,
            &self.key,
        )
    }

    /// Extract every region in parallel
    ///
    /// Results keep the order of `regions`. A failure is scoped to its own
    /// asset index and never aborts sibling extractions.
    pub fn extract_all(
        &self,
        buffer: &PixelBuffer,
        regions: &[Region],
    ) -> Vec<Result<ExtractedAsset>> {
        let results: Vec<Result<ExtractedAsset>> = regions
            .par_iter()
            .enumerate()
            .map(|(index, region)| self.extract(buffer, region).with_asset(index))
            .collect();

        for error in results.iter().filter_map(|result| result.as_ref().err()) {
            tracing::warn!(%error, "asset extraction failed");
        }
        results
    }
}

/// Extract a single region with explicit parameters
///
/// # Errors
///
/// Returns an error if:
/// - The region does not lie inside the buffer (`ImageDecode`)
/// - No visible pixels remain after alpha punching (`EmptyAsset`)
pub fn extract(
    buffer: &PixelBuffer,
    region: &Region,
    padding: usize,
    strict_threshold: u32,
    key: &ChromaKey,
) -> Result<ExtractedAsset> {
    let bounds = region.bounding_box;
    if bounds.width == 0
        || bounds.height == 0
        || bounds.right() > buffer.width()
        || bounds.bottom() > buffer.height()
    {
        return Err(decode_error(&format!(
            "region ({}, {}) {}x{} is outside the {}x{} buffer",
            bounds.left,
            bounds.top,
            bounds.width,
            bounds.height,
            buffer.width(),
            buffer.height()
        )));
    }

    let crop = bounds.expanded(padding, buffer.width(), buffer.height());
    let mut pixels = buffer
        .crop(crop.left, crop.top, crop.width, crop.height)
        .ok_or_else(|| decode_error(&"padded crop exceeds buffer"))?;

    punch_background(&mut pixels, key, strict_threshold);

    let visible = visible_bounds(&pixels).ok_or(EngineError::EmptyAsset {
        asset: None,
        region: bounds,
    })?;
    let trimmed = pixels
        .crop(visible.left, visible.top, visible.width, visible.height)
        .ok_or_else(|| decode_error(&"trim exceeds crop"))?;

    Ok(ExtractedAsset {
        source_region: *region,
        final_width: trimmed.width(),
        final_height: trimmed.height(),
        pixels: trimmed,
        crop_origin: (crop.left + visible.left, crop.top + visible.top),
    })
}

/// Zero the alpha of every pixel classified as background
pub fn punch_background(pixels: &mut PixelBuffer, key: &ChromaKey, threshold: u32) {
    for y in 0..pixels.height() {
        for x in 0..pixels.width() {
            let Some(rgba) = pixels.pixel(x, y) else {
                continue;
            };
            if key.is_background(rgba, threshold) {
                pixels.set_alpha(x, y, 0);
            }
        }
    }
}

/// Tightest box around pixels with non-zero alpha
pub fn visible_bounds(pixels: &PixelBuffer) -> Option<BoundingBox> {
    let mut extents: Option<(usize, usize, usize, usize)> = None;

    for y in 0..pixels.height() {
        for x in 0..pixels.width() {
            if pixels.pixel(x, y).is_none_or(|[_, _, _, alpha]| alpha == 0) {
                continue;
            }
            extents = Some(match extents {
                None => (x, y, x, y),
                Some((min_x, min_y, max_x, max_y)) => {
                    (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
                }
            });
        }
    }

    extents.map(|(min_x, min_y, max_x, max_y)| BoundingBox::from_extents(min_x, min_y, max_x, max_y))
}
