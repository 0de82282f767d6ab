//! CLI entry point for bottle-cap mosaic generation

use capmosaic::io::cli::{Cli, FileProcessor};
use capmosaic::io::logging;
use clap::Parser;

fn main() -> capmosaic::Result<()> {
    let cli = Cli::parse();
    logging::init(logging::level_for(cli.quiet, cli.verbose));
    let mut processor = FileProcessor::new(cli);
    processor.process()
}
