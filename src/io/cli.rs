//! Command-line interface for batch mosaic generation

use crate::algorithm::session::MosaicSession;
use crate::io::configuration::{
    DEFAULT_GRID_SIZE, DEFAULT_TILE_DIRECTORY, HIGH_RES_SUFFIX, MANIFEST_FILENAME, OUTPUT_SUFFIX,
    PALETTE_LOAD_TIMEOUT, SOURCE_EXTENSIONS,
};
use crate::io::error::{Result, invalid_parameter};
use crate::io::image::{export_png, load_source_image};
use crate::io::progress::ProgressManager;
use crate::io::report::MosaicReport;
use crate::palette::loader::{Manifest, load_palette};
use crate::spatial::grid::{GridLayout, GridSize};
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "capmosaic")]
#[command(
    author,
    version,
    about = "Rebuild images as mosaics of bottle-cap photographs"
)]
/// Command-line arguments for the mosaic tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input image file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Tile manifest, or a directory containing bottle_caps.json
    #[arg(short, long, value_name = "MANIFEST")]
    pub tiles: Option<PathBuf>,

    /// Side length of a mosaic cell in source pixels
    #[arg(short, long, default_value_t = DEFAULT_GRID_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    pub grid_size: u32,

    /// Also export a high-resolution mosaic for printing
    #[arg(short = 'H', long)]
    pub high_res: bool,

    /// Print cap count, physical size and tile usage for each image
    #[arg(short, long)]
    pub report: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,

    /// Seconds to wait for every tile image to decode
    #[arg(long, default_value_t = PALETTE_LOAD_TIMEOUT.as_secs())]
    pub load_timeout: u64,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Deadline for palette loading
    pub const fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout)
    }

    /// Resolve the manifest file from `--tiles`
    ///
    /// Without the flag the default tile directory is used. A directory
    /// resolves to the manifest file inside it.
    pub fn manifest_path(&self) -> PathBuf {
        let tiles = self
            .tiles
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TILE_DIRECTORY));

        if tiles.is_dir() {
            tiles.join(MANIFEST_FILENAME)
        } else {
            tiles
        }
    }
}

/// Orchestrates batch processing of images with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if target validation, palette loading or file
    /// processing fails
    pub fn process(&mut self) -> Result<()> {
        let files = self.collect_files()?;

        if files.is_empty() {
            log::info!("No images to process");
            return Ok(());
        }

        let grid_size = GridSize::new(self.cli.grid_size)?;
        let manifest = Manifest::load(self.cli.manifest_path())?;
        let palette = load_palette(&manifest, self.cli.load_timeout())?;
        let mut session = MosaicSession::new(palette, grid_size);

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            self.process_file(&mut session, file, index)?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if self.cli.target.is_file() {
            if is_source_image(&self.cli.target) {
                if self.should_process_file(&self.cli.target) {
                    Ok(vec![self.cli.target.clone()])
                } else {
                    Ok(vec![])
                }
            } else {
                Err(invalid_parameter(
                    "target",
                    &self.cli.target.display(),
                    &"target file must be a PNG or JPEG image",
                ))
            }
        } else if self.cli.target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(&self.cli.target)? {
                let path = entry?.path();
                if !is_source_image(&path) {
                    continue;
                }
                if is_mosaic_output(&path) {
                    log::info!("Ignoring earlier output {}", path.display());
                } else if self.should_process_file(&path) {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_parameter(
                "target",
                &self.cli.target.display(),
                &"target must be an image file or directory",
            ))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = get_output_path(input_path, OUTPUT_SUFFIX);
        if output_path.exists() {
            log::warn!("Skipping: {} (output exists)", input_path.display());
            false
        } else {
            true
        }
    }

    fn process_file(
        &mut self,
        session: &mut MosaicSession,
        input_path: &Path,
        index: usize,
    ) -> Result<()> {
        let start_time = Instant::now();
        let source = load_source_image(input_path)?;
        let layout = GridLayout::preview(source.width(), source.height(), session.grid_size());

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path, layout.cell_count());
        }

        session.upload(source);
        if let Some(ticket) = session.begin_generation() {
            let progress = &mut self.progress_manager;
            let finished = ticket.run_observed(|matched| {
                if let Some(pm) = progress.as_mut() {
                    pm.update_cells(index, matched);
                }
            })?;
            session.apply(finished);
        }

        let Some(result) = session.mosaic() else {
            return Ok(());
        };
        export_png(&result.output, get_output_path(input_path, OUTPUT_SUFFIX))?;

        if self.cli.high_res {
            let whole = GridLayout::high_res(
                result.layout.width,
                result.layout.height,
                result.layout.grid_size,
            );
            if whole.is_empty() {
                log::warn!(
                    "Skipping high-res export for {}: {}x{} is smaller than one {} cell",
                    input_path.display(),
                    whole.width,
                    whole.height,
                    whole.grid_size
                );
            } else {
                let high_res = session.export_high_res()?;
                export_png(&high_res.output, get_output_path(input_path, HIGH_RES_SUFFIX))?;
            }
        }

        if self.cli.report {
            print_report(input_path, &MosaicReport::new(&result.layout, &result.tally));
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index);
        }

        log::info!(
            "Finished {} in {:.2?}",
            input_path.display(),
            start_time.elapsed()
        );
        Ok(())
    }
}

// Reports are the tool's output, not diagnostics
#[allow(clippy::print_stdout)]
fn print_report(input_path: &Path, report: &MosaicReport) {
    println!("{}", input_path.display());
    print!("{report}");
}

fn is_source_image(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| {
            SOURCE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

// A PNG named like an output whose source image sits beside it
fn is_mosaic_output(path: &Path) -> bool {
    let is_png = path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return false;
    };
    let Some(source_stem) = stem
        .strip_suffix(HIGH_RES_SUFFIX)
        .or_else(|| stem.strip_suffix(OUTPUT_SUFFIX))
    else {
        return false;
    };

    is_png
        && SOURCE_EXTENSIONS
            .iter()
            .any(|ext| path.with_file_name(format!("{source_stem}.{ext}")).is_file())
}

/// Output path for an input image, `<stem><suffix>.png` beside the input
pub fn get_output_path(input_path: &Path, suffix: &str) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let output_name = format!("{}{suffix}.png", stem.to_string_lossy());

    if let Some(parent) = input_path.parent() {
        parent.join(output_name)
    } else {
        PathBuf::from(output_name)
    }
}
