//! Error types and context management for segmentation and composition

use crate::segmentation::segmenter::BoundingBox;
use std::fmt;
use std::path::PathBuf;

/// Main error type for all engine operations
#[derive(Debug)]
pub enum EngineError {
    /// Failed to load a sheet image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Pixel data for one asset could not be read
    ///
    /// Scoped to a single asset: sibling extractions are unaffected.
    ImageDecode {
        /// Index of the asset within its extraction batch, when known
        asset: Option<usize>,
        /// Description of what could not be read
        reason: String,
    },

    /// Every pixel of a cropped region was punched to transparent
    EmptyAsset {
        /// Index of the asset within its extraction batch, when known
        asset: Option<usize>,
        /// Bounding box of the source region
        region: BoundingBox,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Layer document could not be parsed
    LayerDocument {
        /// Path of the document
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// Failed to write a JSON report
    ReportExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// Failed to save an extracted asset to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageDecode { asset, reason } => match asset {
                Some(index) => write!(f, "Failed to read pixels for asset {index}: {reason}"),
                None => write!(f, "Failed to read pixels: {reason}"),
            },
            Self::EmptyAsset { asset, region } => {
                let label = asset.map_or_else(|| "region".to_string(), |i| format!("asset {i}"));
                write!(
                    f,
                    "No visible pixels left in {label} at ({}, {}) {}x{}",
                    region.left, region.top, region.width, region.height
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::LayerDocument { path, source } => {
                write!(
                    f,
                    "Failed to parse layer document '{}': {source}",
                    path.display()
                )
            }
            Self::ReportExport { path, source } => {
                write!(f, "Failed to write report '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::LayerDocument { source, .. } | Self::ReportExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for engine results
pub type Result<T> = std::result::Result<T, EngineError>;

/// Additional context to enrich error messages
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Index of the asset being processed
    pub asset: Option<usize>,
    /// File being processed
    pub path: Option<PathBuf>,
}

/// Scopes errors to the asset or file that produced them
pub trait WithContext<T> {
    /// Add error context to a Result
    ///
    /// # Errors
    ///
    /// Propagates the original error with additional context applied
    fn with_context(self, context: ErrorContext) -> Result<T>;

    /// Attach just the asset index
    ///
    /// # Errors
    ///
    /// Propagates the original error scoped to the given asset
    fn with_asset(self, asset: usize) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<EngineError>,
{
    fn with_context(self, context: ErrorContext) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            match &mut error {
                EngineError::ImageDecode { asset, .. } | EngineError::EmptyAsset { asset, .. } => {
                    if context.asset.is_some() {
                        *asset = context.asset;
                    }
                }
                EngineError::ImageLoad { path, .. }
                | EngineError::ImageExport { path, .. }
                | EngineError::FileSystem { path, .. }
                | EngineError::LayerDocument { path, .. }
                | EngineError::ReportExport { path, .. } => {
                    if let Some(context_path) = &context.path {
                        if path.as_os_str() == UNKNOWN_PATH {
                            path.clone_from(context_path);
                        }
                    }
                }
                EngineError::InvalidParameter { .. } => {}
            }
            error
        })
    }

    fn with_asset(self, asset: usize) -> Result<T> {
        self.with_context(ErrorContext {
            asset: Some(asset),
            ..Default::default()
        })
    }
}

const UNKNOWN_PATH: &str = "<unknown>";

impl From<image::ImageError> for EngineError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from(UNKNOWN_PATH),
            source: err,
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from(UNKNOWN_PATH),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::LayerDocument {
            path: PathBuf::from(UNKNOWN_PATH),
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> EngineError {
    EngineError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an asset-scoped decode error without an index yet
pub fn decode_error(reason: &impl ToString) -> EngineError {
    EngineError::ImageDecode {
        asset: None,
        reason: reason.to_string(),
    }
}
