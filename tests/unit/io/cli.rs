//! Tests for command-line parsing and batch processing of sheets and layer documents

#[cfg(test)]
mod tests {
    use clap::Parser;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use traitsheet::composition::engine::CapStrategy;
    use traitsheet::io::cli::{
        Cli, Command, ComposeArgs, SegmentArgs, SheetProcessor, asset_dir, combinations_path,
        run, segment_sheet,
    };
    use traitsheet::io::configuration::{
        DEFAULT_COMBINATION_CAP, DEFAULT_NOISE_FLOOR, DEFAULT_SEED, DEFAULT_THRESHOLD,
    };
    use traitsheet::io::document::SheetManifest;
    use traitsheet::segmentation::chroma::{ChromaKey, ReferenceColor};
    use traitsheet::segmentation::extractor::{ExtractionConfig, RegionExtractor};
    use traitsheet::segmentation::pixels::PixelBuffer;
    use traitsheet::segmentation::segmenter::{ChromaSegmenter, SegmentationConfig};

    fn segment_args(cli: Cli) -> SegmentArgs {
        match cli.command {
            Command::Segment(args) => args,
            Command::Compose(_) => unreachable!("Expected segment command"),
        }
    }

    fn compose_args(cli: Cli) -> ComposeArgs {
        match cli.command {
            Command::Compose(args) => args,
            Command::Segment(_) => unreachable!("Expected compose command"),
        }
    }

    // White sheet with two 20x20 sprites crossing row 10
    fn write_sheet(path: &Path) {
        let mut buffer = PixelBuffer::filled(60, 40, [255, 255, 255, 255]);
        for y in 5..25 {
            for x in 5..25 {
                buffer.set_pixel(x, y, [200, 0, 0, 255]);
                buffer.set_pixel(x + 30, y, [0, 0, 200, 255]);
            }
        }
        assert!(buffer.to_rgba_image().save(path).is_ok());
    }

    // Tests segment parsing with only the target
    // Verified by changing default values to ensure defaults are used
    #[test]
    fn test_segment_minimal_args() {
        let cli = Cli::parse_from(["traitsheet", "segment", "sheet.png"]);
        assert!(cli.should_show_progress());
        let args = segment_args(cli);

        assert_eq!(args.target, PathBuf::from("sheet.png"));
        assert_eq!(args.keys, vec![ReferenceColor::WHITE]);
        assert_eq!(args.threshold, DEFAULT_THRESHOLD);
        assert_eq!(args.noise_floor, DEFAULT_NOISE_FLOOR);
        assert!(args.skip_existing());
    }

    // Tests every segment flag reaches the configs
    // Verified by swapping threshold and strict threshold
    #[test]
    fn test_segment_all_args() {
        let cli = Cli::parse_from([
            "traitsheet",
            "segment",
            "sheets",
            "--key",
            "#00ff00",
            "-k",
            "255,0,255",
            "--threshold",
            "30",
            "--strict-threshold",
            "90",
            "--noise-floor",
            "5",
            "--stride",
            "2",
            "--padding",
            "1",
            "--no-skip",
            "--quiet",
        ]);
        assert!(!cli.should_show_progress());
        let args = segment_args(cli);

        assert_eq!(
            args.keys,
            vec![ReferenceColor::new(0, 255, 0), ReferenceColor::new(255, 0, 255)]
        );
        assert_eq!(
            args.segmentation_config(),
            SegmentationConfig {
                threshold: 30,
                noise_floor: 5,
                seed_stride: 2,
            }
        );
        assert_eq!(
            args.extraction_config(),
            ExtractionConfig {
                padding: 1,
                strict_threshold: 90,
            }
        );
        assert!(!args.skip_existing());
    }

    // Tests invalid key colors are rejected by the parser
    // Verified by falling back to white on parse errors
    #[test]
    fn test_invalid_key_rejected() {
        let result = Cli::try_parse_from(["traitsheet", "segment", "a.png", "--key", "#12"]);

        assert!(result.is_err());
    }

    // Tests verbosity maps to log levels
    // Verified by letting --quiet lose to --verbose
    #[test]
    fn test_log_level() {
        let level = |args: &[&str]| Cli::parse_from(args).log_level();

        assert_eq!(level(&["t", "compose", "l.json"]), tracing::Level::WARN);
        assert_eq!(level(&["t", "compose", "l.json", "-v"]), tracing::Level::DEBUG);
        assert_eq!(level(&["t", "-vv", "compose", "l.json"]), tracing::Level::TRACE);
        assert_eq!(level(&["t", "compose", "l.json", "-q", "-v"]), tracing::Level::ERROR);
    }

    // Tests compose flags select the cap strategy
    // Verified by ignoring the sample seed
    #[test]
    fn test_compose_strategy() {
        let prefix = compose_args(Cli::parse_from(["t", "compose", "layers.json"]));
        assert_eq!(prefix.engine().strategy(), CapStrategy::Prefix);
        assert_eq!(prefix.engine().cap(), DEFAULT_COMBINATION_CAP);
        assert_eq!(prefix.output_path(), PathBuf::from("layers_combinations.json"));

        let seeded = compose_args(Cli::parse_from([
            "t", "compose", "layers.json", "--sample=7", "--cap", "3",
        ]));
        assert_eq!(seeded.engine().strategy(), CapStrategy::Reservoir { seed: 7 });
        assert_eq!(seeded.engine().cap(), 3);

        let unseeded = compose_args(Cli::parse_from(["t", "compose", "layers.json", "--sample"]));
        assert_eq!(
            unseeded.engine().strategy(),
            CapStrategy::Reservoir { seed: DEFAULT_SEED }
        );
    }

    // Tests a bare --sample before the document leaves the document positional
    // Verified by letting --sample consume the next argument as its seed
    #[test]
    fn test_sample_flag_before_document() {
        let Ok(cli) = Cli::try_parse_from(["t", "compose", "--sample", "layers.json"]) else {
            unreachable!("bare --sample should not swallow the document");
        };
        let args = compose_args(cli);

        assert_eq!(args.document, PathBuf::from("layers.json"));
        assert_eq!(
            args.engine().strategy(),
            CapStrategy::Reservoir { seed: DEFAULT_SEED }
        );
        assert!(Cli::try_parse_from(["t", "compose", "layers.json", "--sample", "7"]).is_err());
    }

    // Tests transparency keying is off unless requested
    // Verified by enabling transparency keying by default
    #[test]
    fn test_transparent_background_flag() {
        let plain = segment_args(Cli::parse_from(["t", "segment", "a.png"]));
        let Ok(key) = plain.chroma_key() else {
            unreachable!("default key colors should build a key");
        };
        assert!(!key.transparent_background());

        let keyed = segment_args(Cli::parse_from([
            "t",
            "segment",
            "a.png",
            "--transparent-background",
        ]));
        let Ok(key) = keyed.chroma_key() else {
            unreachable!("default key colors should build a key");
        };
        assert!(key.transparent_background());
        assert!(key.is_background([0, 0, 0, 0], DEFAULT_THRESHOLD));
    }

    // Tests output paths sit next to their inputs
    // Verified by writing outputs to the working directory
    #[test]
    fn test_output_paths() {
        assert_eq!(
            asset_dir(Path::new("art/sheet.png")),
            PathBuf::from("art/sheet_assets")
        );
        assert_eq!(
            combinations_path(Path::new("proj/layers.json")),
            PathBuf::from("proj/layers_combinations.json")
        );
    }

    // Tests a sheet is cut into numbered assets with a manifest
    // Verified by numbering assets from 1
    #[test]
    fn test_segment_sheet() {
        let Ok(dir) = TempDir::new() else {
            unreachable!("temporary directory should be created");
        };
        let sheet = dir.path().join("sheet.png");
        write_sheet(&sheet);
        let output = asset_dir(&sheet);

        let Ok(segmenter) = ChromaSegmenter::new(ChromaKey::default(), SegmentationConfig::default())
        else {
            unreachable!("default segmenter should build");
        };
        let extractor = RegionExtractor::new(ChromaKey::default(), ExtractionConfig::default());

        let Ok(manifest) = segment_sheet(&sheet, &output, &segmenter, &extractor) else {
            unreachable!("sheet should segment");
        };

        let [red, blue] = manifest.assets.as_slice() else {
            unreachable!("expected two assets, found {}", manifest.assets.len());
        };
        assert!(manifest.failures.is_empty());
        assert_eq!(red.file, "asset_00.png");
        assert_eq!(blue.crop_origin, (35, 5));
        assert!(output.join("asset_00.png").exists());
        assert!(output.join("asset_01.png").exists());

        let Ok(text) = fs::read_to_string(output.join("manifest.json")) else {
            unreachable!("manifest should be written");
        };
        let parsed: Result<SheetManifest, _> = serde_json::from_str(&text);
        assert_eq!(parsed.ok(), Some(manifest));
    }

    // Tests directories are processed and existing outputs skipped
    // Verified by reprocessing sheets whose asset directory exists
    #[test]
    fn test_processor_skips_existing() {
        let Ok(dir) = TempDir::new() else {
            unreachable!("temporary directory should be created");
        };
        let sheet = dir.path().join("a.png");
        write_sheet(&sheet);
        assert!(fs::write(dir.path().join("notes.txt"), "ignored").is_ok());
        let target = dir.path().to_string_lossy().to_string();

        let cli = Cli::parse_from(["t", "-q", "segment", target.as_str()]);
        assert!(run(cli).is_ok());
        let manifest = asset_dir(&sheet).join("manifest.json");
        assert!(manifest.exists());

        assert!(fs::remove_file(&manifest).is_ok());
        let cli = Cli::parse_from(["t", "-q", "segment", target.as_str()]);
        assert!(run(cli).is_ok());
        assert!(!manifest.exists());

        let cli = Cli::parse_from(["t", "-q", "segment", target.as_str(), "--no-skip"]);
        assert!(run(cli).is_ok());
        assert!(manifest.exists());
    }

    // Tests inconsistent thresholds and bad targets are rejected
    // Verified by removing the strict threshold validation
    #[test]
    fn test_processor_validation() {
        let cli = Cli::parse_from([
            "t",
            "segment",
            "a.png",
            "--threshold",
            "100",
            "--strict-threshold",
            "50",
        ]);
        assert!(SheetProcessor::new(segment_args(cli), false).is_err());

        let cli = Cli::parse_from(["t", "-q", "segment", "/definitely/not/here.png"]);
        assert!(run(cli).is_err());
    }

    // Tests compose writes a report and strict mode rejects empty layers
    // Verified by ignoring the strict flag
    #[test]
    fn test_run_compose() {
        let Ok(dir) = TempDir::new() else {
            unreachable!("temporary directory should be created");
        };
        let document = dir.path().join("layers.json");
        let text = r#"[
            {"name": "Body", "traits": [{"name": "A"}, {"name": "B"}]},
            {"name": "Head", "parent": "Body", "traits": [{"name": "C"}]},
            {"name": "Empty", "traits": []}
        ]"#;
        assert!(fs::write(&document, text).is_ok());
        let path = document.to_string_lossy().to_string();

        assert!(run(Cli::parse_from(["t", "compose", path.as_str()])).is_ok());
        let Ok(report) = fs::read_to_string(combinations_path(&document)) else {
            unreachable!("report should be written");
        };
        assert!(report.contains("\"total_available\": 2"));

        assert!(run(Cli::parse_from(["t", "compose", path.as_str(), "--strict"])).is_err());

        let custom = dir.path().join("custom.json");
        let custom_arg = custom.to_string_lossy().to_string();
        let cli = Cli::parse_from(["t", "compose", path.as_str(), "-o", custom_arg.as_str()]);
        assert!(run(cli).is_ok());
        assert!(custom.exists());
    }
}
