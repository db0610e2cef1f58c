//! CLI entry point for sheet segmentation and trait composition

use clap::Parser;
use traitsheet::io::cli::{Cli, run};

fn main() -> traitsheet::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    run(cli)
}
