//! Command-line interface for sheet segmentation and trait composition

use crate::composition::engine::{CapStrategy, CombinationEngine, validate_layers};
use crate::io::configuration::{
    ASSET_DIR_SUFFIX, COMBINATIONS_SUFFIX, DEFAULT_COMBINATION_CAP, DEFAULT_KEY_COLOR,
    DEFAULT_NOISE_FLOOR, DEFAULT_PADDING, DEFAULT_SEED, DEFAULT_SEED_STRIDE, DEFAULT_STRICT_THRESHOLD,
    DEFAULT_THRESHOLD, MANIFEST_FILE_NAME,
};
use crate::io::document::{
    AssetFailure, AssetRecord, CompositionReport, SheetManifest, load_layers, write_json,
};
use crate::io::error::{EngineError, ErrorContext, Result, WithContext, invalid_parameter};
use crate::io::image::{export_asset, load_sheet};
use crate::io::progress::ProgressManager;
use crate::segmentation::chroma::{ChromaKey, ReferenceColor};
use crate::segmentation::extractor::{ExtractionConfig, RegionExtractor};
use crate::segmentation::pixels::PixelBuffer;
use crate::segmentation::segmenter::{ChromaSegmenter, Region, SegmentationConfig};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "traitsheet")]
#[command(
    author,
    version,
    about = "Cut sprite sheets into assets and expand layered trait combinations"
)]
/// Command-line arguments
pub struct Cli {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Log level selected by `--quiet` / `--verbose`
    pub const fn log_level(&self) -> tracing::Level {
        match (self.quiet, self.verbose) {
            (true, _) => tracing::Level::ERROR,
            (false, 0) => tracing::Level::WARN,
            (false, 1) => tracing::Level::DEBUG,
            (false, _) => tracing::Level::TRACE,
        }
    }
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Segment sheets into individual PNG assets
    Segment(SegmentArgs),
    /// Enumerate trait combinations from a layer document
    Compose(ComposeArgs),
}

/// Arguments for `segment`
#[derive(Args)]
pub struct SegmentArgs {
    /// Sheet PNG file or directory of sheets
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Background color as #rrggbb or r,g,b (repeat for several)
    #[arg(short, long = "key", default_value = DEFAULT_KEY_COLOR)]
    pub keys: Vec<ReferenceColor>,

    /// Coarse classification threshold
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: u32,

    /// Edge-cleaning threshold used during extraction
    #[arg(short, long, default_value_t = DEFAULT_STRICT_THRESHOLD)]
    pub strict_threshold: u32,

    /// Minimum pixel count for a region to be kept
    #[arg(short = 'f', long, default_value_t = DEFAULT_NOISE_FLOOR)]
    pub noise_floor: usize,

    /// Row stride of the seed scan
    #[arg(long, default_value_t = DEFAULT_SEED_STRIDE)]
    pub stride: usize,

    /// Padding around each region before extraction
    #[arg(short, long, default_value_t = DEFAULT_PADDING)]
    pub padding: usize,

    /// Process sheets even if their asset directory exists
    #[arg(short, long)]
    pub no_skip: bool,

    /// Treat fully transparent pixels as background whatever their color
    #[arg(long)]
    pub transparent_background: bool,
}

impl SegmentArgs {
    /// Check if existing output should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Segmentation parameters from the flags
    pub const fn segmentation_config(&self) -> SegmentationConfig {
        SegmentationConfig {
            threshold: self.threshold,
            noise_floor: self.noise_floor,
            seed_stride: self.stride,
        }
    }

    /// Chroma key built from the key colors and transparency flag
    ///
    /// # Errors
    ///
    /// Returns an error if no key color is given
    pub fn chroma_key(&self) -> Result<ChromaKey> {
        Ok(ChromaKey::new(self.keys.clone())?
            .with_transparent_background(self.transparent_background))
    }

    /// Extraction parameters from the flags
    pub const fn extraction_config(&self) -> ExtractionConfig {
        ExtractionConfig {
            padding: self.padding,
            strict_threshold: self.strict_threshold,
        }
    }
}

/// Arguments for `compose`
#[derive(Args)]
pub struct ComposeArgs {
    /// Layer document (JSON)
    #[arg(value_name = "LAYERS")]
    pub document: PathBuf,

    /// Maximum number of combinations
    #[arg(short, long, default_value_t = DEFAULT_COMBINATION_CAP)]
    pub cap: usize,

    /// Sample uniformly instead of taking the first combinations
    /// (`--sample` or `--sample=SEED`, seed defaults to 42)
    #[arg(
        short,
        long,
        value_name = "SEED",
        num_args = 0..=1,
        require_equals = true
    )]
    pub sample: Option<Option<u64>>,

    /// Fail when any layer has no traits instead of leaving it out
    #[arg(long)]
    pub strict: bool,

    /// Report path (defaults to <LAYERS>_combinations.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ComposeArgs {
    /// Engine configured from the flags
    pub fn engine(&self) -> CombinationEngine {
        let strategy = self.sample.map_or(CapStrategy::Prefix, |seed| {
            CapStrategy::Reservoir {
                seed: seed.unwrap_or(DEFAULT_SEED),
            }
        });
        CombinationEngine::new(self.cap).with_strategy(strategy)
    }

    /// Where the report is written
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| combinations_path(&self.document))
    }
}

/// Run the parsed command
///
/// # Errors
///
/// Returns an error if the selected command fails
pub fn run(cli: Cli) -> Result<()> {
    let show_progress = cli.should_show_progress();
    match cli.command {
        Command::Segment(args) => SheetProcessor::new(args, show_progress)?.process(),
        Command::Compose(args) => run_compose(&args),
    }
}

/// Orchestrates batch segmentation of sheets with progress tracking
pub struct SheetProcessor {
    args: SegmentArgs,
    segmenter: ChromaSegmenter,
    extractor: RegionExtractor,
    progress_manager: Option<ProgressManager>,
}

impl SheetProcessor {
    /// Create a processor from segmentation arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the thresholds, stride or key colors are invalid
    pub fn new(args: SegmentArgs, show_progress: bool) -> Result<Self> {
        let key = args.chroma_key()?;
        let segmentation = args.segmentation_config();
        let extraction = args.extraction_config();
        extraction.validate(segmentation.threshold)?;

        Ok(Self {
            segmenter: ChromaSegmenter::new(key.clone(), segmentation)?,
            extractor: RegionExtractor::new(key, extraction),
            progress_manager: show_progress.then(ProgressManager::new),
            args,
        })
    }

    /// Process every sheet selected by the target
    ///
    /// # Errors
    ///
    /// Returns an error if target validation fails or a sheet cannot be
    /// loaded or written
    pub fn process(&mut self) -> Result<()> {
        let sheets = self.collect_sheets()?;

        if sheets.is_empty() {
            tracing::warn!(target = %self.args.target.display(), "no sheets to process");
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(sheets.len());
        }

        for (index, sheet) in sheets.iter().enumerate() {
            self.process_sheet(sheet, index)?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    fn collect_sheets(&self) -> Result<Vec<PathBuf>> {
        let target = &self.args.target;
        if target.is_file() {
            if !is_png(target) {
                return Err(invalid_parameter(
                    "target",
                    &target.display(),
                    &"sheet must be a PNG image",
                ));
            }
            return Ok(if self.should_process_sheet(target) {
                vec![target.clone()]
            } else {
                Vec::new()
            });
        }

        if target.is_dir() {
            let entries = std::fs::read_dir(target).map_err(|e| EngineError::FileSystem {
                path: target.clone(),
                operation: "read directory",
                source: e,
            })?;
            let mut sheets = Vec::new();
            for entry in entries {
                let path = entry
                    .with_context(ErrorContext {
                        path: Some(target.clone()),
                        ..Default::default()
                    })?
                    .path();
                if is_png(&path) && self.should_process_sheet(&path) {
                    sheets.push(path);
                }
            }
            sheets.sort();
            return Ok(sheets);
        }

        Err(invalid_parameter(
            "target",
            &target.display(),
            &"must be a PNG file or directory",
        ))
    }

    fn should_process_sheet(&self, sheet: &Path) -> bool {
        if !self.args.skip_existing() {
            return true;
        }
        let exists = asset_dir(sheet).exists();
        if exists {
            tracing::info!(sheet = %sheet.display(), "skipping, assets already exist");
        }
        !exists
    }

    fn process_sheet(&mut self, sheet: &Path, index: usize) -> Result<()> {
        if let Some(ref mut pm) = self.progress_manager {
            pm.start_sheet(index, sheet);
        }

        let pixels = load_sheet(sheet)?;
        let regions = self.segmenter.segment(&pixels);
        if let Some(ref mut pm) = self.progress_manager {
            pm.advance(index, "segmented");
        }

        let manifest = export_regions(
            sheet,
            &pixels,
            &regions,
            &asset_dir(sheet),
            &self.extractor,
        )?;
        if let Some(ref mut pm) = self.progress_manager {
            pm.advance(index, "extracted");
            pm.complete_sheet(index, manifest.assets.len());
        }
        Ok(())
    }
}

/// Segment one sheet and write its assets and manifest into `output_dir`
///
/// Assets whose extraction fails are listed in the manifest's failures and
/// do not stop the rest of the sheet.
///
/// # Errors
///
/// Returns an error if the sheet cannot be loaded or an output file cannot
/// be written
pub fn segment_sheet(
    sheet: &Path,
    output_dir: &Path,
    segmenter: &ChromaSegmenter,
    extractor: &RegionExtractor,
) -> Result<SheetManifest> {
    let pixels = load_sheet(sheet)?;
    let regions = segmenter.segment(&pixels);
    export_regions(sheet, &pixels, &regions, output_dir, extractor)
}

/// Extract already segmented regions and write assets and manifest
///
/// # Errors
///
/// Returns an error if an output file cannot be written
pub fn export_regions(
    sheet: &Path,
    pixels: &PixelBuffer,
    regions: &[Region],
    output_dir: &Path,
    extractor: &RegionExtractor,
) -> Result<SheetManifest> {
    if regions.is_empty() {
        tracing::warn!(sheet = %sheet.display(), "no regions found");
    }

    let mut manifest = SheetManifest {
        sheet: sheet.display().to_string(),
        width: pixels.width(),
        height: pixels.height(),
        ..SheetManifest::default()
    };

    for (index, result) in extractor
        .extract_all(pixels, regions)
        .into_iter()
        .enumerate()
    {
        match result {
            Ok(asset) => {
                let file = format!("asset_{index:02}.png");
                export_asset(&asset, &output_dir.join(&file))?;
                manifest.assets.push(AssetRecord {
                    index,
                    file,
                    bounding_box: asset.source_region.bounding_box,
                    pixel_count: asset.source_region.pixel_count,
                    final_width: asset.final_width,
                    final_height: asset.final_height,
                    crop_origin: asset.crop_origin,
                });
            }
            Err(error) => manifest.failures.push(AssetFailure {
                index,
                error: error.to_string(),
            }),
        }
    }

    write_json(&manifest, &output_dir.join(MANIFEST_FILE_NAME))?;
    tracing::info!(
        sheet = %sheet.display(),
        assets = manifest.assets.len(),
        failures = manifest.failures.len(),
        "sheet processed"
    );
    Ok(manifest)
}

fn run_compose(args: &ComposeArgs) -> Result<()> {
    let layers = load_layers(&args.document)?;

    if args.strict {
        validate_layers(&layers.iter().collect::<Vec<_>>())?;
    }

    let report = CompositionReport::compose(&layers, &args.engine());
    let output = args.output_path();
    write_json(&report, &output)?;
    tracing::info!(
        output = %output.display(),
        combinations = report.combinations.len(),
        available = report.total_available,
        "composition written"
    );
    Ok(())
}

fn is_png(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("png")
}

/// Directory assets of a sheet are written to
pub fn asset_dir(sheet: &Path) -> PathBuf {
    let stem = sheet.file_stem().unwrap_or_default();
    let name = format!("{}{ASSET_DIR_SUFFIX}", stem.to_string_lossy());
    sheet
        .parent()
        .map_or_else(|| PathBuf::from(&name), |parent| parent.join(&name))
}

/// Default report path for a layer document
pub fn combinations_path(document: &Path) -> PathBuf {
    let stem = document.file_stem().unwrap_or_default();
    let name = format!("{}{COMBINATIONS_SUFFIX}.json", stem.to_string_lossy());
    document
        .parent()
        .map_or_else(|| PathBuf::from(&name), |parent| parent.join(&name))
}
