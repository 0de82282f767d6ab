//! Mosaic constants and runtime configuration defaults

use image::imageops::FilterType;
use std::time::Duration;

// Grid sampling
/// Default side length of a mosaic cell in source pixels
pub const DEFAULT_GRID_SIZE: u32 = 10;

// Palette loading
/// Manifest filename looked up inside a tile directory
pub const MANIFEST_FILENAME: &str = "bottle_caps.json";
/// Default directory holding the tile images and their manifest
pub const DEFAULT_TILE_DIRECTORY: &str = "bottle-caps";
/// Upper bound on waiting for every tile to decode
pub const PALETTE_LOAD_TIMEOUT: Duration = Duration::from_secs(30);

// High-resolution export
/// Largest output edge the high-res sizing formula aims for
pub const HIGH_RES_MAX_DIMENSION: u32 = 8192;
/// Per-cap scale factor used by the high-res sizing formula
pub const HIGH_RES_BASE_CAP_SIZE: u32 = 300;
// Keeps high-res surfaces within what decoders and viewers accept
/// Hard cap on the pixel size of one tile in a high-res export
pub const HIGH_RES_CAP_SIZE_LIMIT: u32 = 100;

// Physical size estimate
/// Diameter of one bottle cap in millimetres
pub const CAP_DIAMETER_MM: f64 = 29.0;
/// Millimetres per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Resampling filter used when scaling tiles into cells
pub const TILE_FILTER: FilterType = FilterType::Triangle;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 30;

// Output settings
/// Suffix added to preview mosaic filenames
pub const OUTPUT_SUFFIX: &str = "_mosaic";
/// Suffix added to high-resolution mosaic filenames
pub const HIGH_RES_SUFFIX: &str = "_mosaic_hires";
/// Source image extensions picked up when processing a directory
pub const SOURCE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];
