//! Engine constants and runtime configuration defaults

// Chroma-key classification
/// Sum-of-absolute-differences below which a pixel matches a reference color
pub const DEFAULT_THRESHOLD: u32 = 60;
/// Stricter threshold used when punching alpha during extraction
pub const DEFAULT_STRICT_THRESHOLD: u32 = 120;
/// Regions with fewer pixels than this are treated as noise
pub const DEFAULT_NOISE_FLOOR: usize = 100;
/// Row stride used when scanning for flood-fill seeds
pub const DEFAULT_SEED_STRIDE: usize = 10;
/// Pixels added around each bounding box before extraction
pub const DEFAULT_PADDING: usize = 4;
/// Default chroma-key background
pub const DEFAULT_KEY_COLOR: &str = "#ffffff";

// Combination enumeration
/// Upper bound on combinations produced per run
pub const DEFAULT_COMBINATION_CAP: usize = 10_000;
/// Rarity assumed for traits without a numeric rarity
pub const DEFAULT_RARITY: f64 = 100.0;
/// Fixed seed for reproducible sampling
pub const DEFAULT_SEED: u64 = 42;

// Logical canvas geometry
/// Side length of the logical canvas all positions are expressed in
pub const LOGICAL_CANVAS_SIZE: f64 = 1024.0;
/// Horizontal center line of the logical canvas
pub const CANVAS_CENTER: f64 = LOGICAL_CANVAS_SIZE / 2.0;
/// Line the bottom edge of a head lands on
pub const NECK_CONNECTION_Y: f64 = 440.0;
/// Line the top edge of a body starts at
pub const NECK_TOP_Y: f64 = 420.0;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

// Output settings
/// Suffix of the directory holding extracted assets
pub const ASSET_DIR_SUFFIX: &str = "_assets";
/// File name of the per-sheet extraction manifest
pub const MANIFEST_FILE_NAME: &str = "manifest.json";
/// Suffix added to combination report filenames
pub const COMBINATIONS_SUFFIX: &str = "_combinations";
