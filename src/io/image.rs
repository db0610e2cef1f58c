//! Sheet decoding and PNG export of extracted assets

use crate::io::error::{EngineError, Result, decode_error};
use crate::segmentation::extractor::ExtractedAsset;
use crate::segmentation::pixels::PixelBuffer;
use std::path::Path;

/// Load a sheet image from disk as RGBA
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened or read
/// - The file is not a supported image format
pub fn load_sheet(path: &Path) -> Result<PixelBuffer> {
    let image = image::open(path).map_err(|e| EngineError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(PixelBuffer::from_rgba_image(&image.to_rgba8()))
}

/// Decode an in-memory encoded image as RGBA
///
/// # Errors
///
/// Returns an `ImageDecode` error if the bytes are not a supported image
pub fn decode_sheet(bytes: &[u8]) -> Result<PixelBuffer> {
    let image = image::load_from_memory(bytes).map_err(|e| decode_error(&e))?;
    Ok(PixelBuffer::from_rgba_image(&image.to_rgba8()))
}

/// Save an extracted asset as PNG, creating parent directories
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be encoded or written
pub fn export_asset(asset: &ExtractedAsset, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| EngineError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    asset
        .pixels
        .to_rgba_image()
        .save(output_path)
        .map_err(|e| EngineError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })
}
