//! Tile palette management
//!
//! This module contains palette-related functionality including:
//! - Manifest parsing and concurrent tile decoding
//! - Per-tile usage counting

/// Manifest parsing, tiles and concurrent palette loading
pub mod loader;
/// Per-tile usage counts for one generation
pub mod tally;

pub use loader::{Manifest, Palette, Tile, load_palette};
pub use tally::UsageTally;
