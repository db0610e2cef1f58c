//! Chroma-key segmentation and asset extraction
//!
//! This module contains the image side of the engine:
//! - Pixel storage and chroma-key classification
//! - Flood-fill segmentation into regions
//! - Per-region extraction with edge cleanup
//! - Spatial grouping of regions

/// Chroma-key classification against reference colors
pub mod chroma;
/// Cropping, alpha punching and trimming of regions
pub mod extractor;
/// Quadrant and reading-order grouping of regions
pub mod grouping;
/// RGBA pixel buffer
pub mod pixels;
/// Connected-component segmentation
pub mod segmenter;
/// Bitset of flood-filled pixels
pub mod visited;

pub use chroma::{ChromaKey, ReferenceColor};
pub use extractor::{ExtractedAsset, ExtractionConfig, RegionExtractor};
pub use pixels::PixelBuffer;
pub use segmenter::{BoundingBox, ChromaSegmenter, Region, SegmentationConfig};
