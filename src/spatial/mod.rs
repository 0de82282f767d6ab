//! Grid geometry over source images

/// Grid size, cell layouts and row-major cell scanning
pub mod grid;

pub use grid::{GridLayout, GridSize};
