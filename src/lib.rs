//! Bottle-cap mosaic generation by nearest average-colour tile matching
//!
//! The source image is cut into square grid cells, each cell is reduced to
//! its average colour, and the palette tile with the closest average colour
//! is drawn in its place. The same decisions can be rendered as a preview
//! the size of the source or as an enlarged high-resolution export.

#![forbid(unsafe_code)]

/// Tile matching, mosaic composition and generation sessions
pub mod algorithm;
/// Average colour extraction
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Tile palette loading and usage tallies
pub mod palette;
/// Grid geometry over source images
pub mod spatial;

pub use io::error::{MosaicError, Result};
