//! Grid geometry for sampling a source image in square cells
//!
//! The preview scans every cell that touches the image, including partial
//! cells along the right and bottom edges. The high-resolution export only
//! keeps whole cells. Both layouts come from [`grid_cells`], where the
//! difference is a single `inclusive` flag.

use crate::io::error::{Result, invalid_parameter};
use std::fmt;

/// Side length of one mosaic cell in source pixels, always at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSize(u32);

impl GridSize {
    /// Validate a grid size
    ///
    /// # Errors
    ///
    /// Returns an error if `pixels` is zero
    pub fn new(pixels: u32) -> Result<Self> {
        if pixels == 0 {
            return Err(invalid_parameter(
                "grid_size",
                &pixels,
                &"grid size must be at least 1 pixel",
            ));
        }
        Ok(Self(pixels))
    }

    /// Cell side length in pixels
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

/// Number of cells along one axis
///
/// With `inclusive` a trailing partial cell counts (ceiling division),
/// without it only whole cells count (floor division).
pub const fn grid_cells(dimension: u32, grid_size: GridSize, inclusive: bool) -> u32 {
    if inclusive {
        dimension.div_ceil(grid_size.0)
    } else {
        dimension / grid_size.0
    }
}

/// Source-space rectangle covered by one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    /// Cell row in the grid
    pub row: usize,
    /// Cell column in the grid
    pub col: usize,
    /// Left edge in source pixels
    pub x: u32,
    /// Top edge in source pixels
    pub y: u32,
    /// Sampled width, smaller than the grid size on a partial cell
    pub width: u32,
    /// Sampled height, smaller than the grid size on a partial cell
    pub height: u32,
}

/// Cell grid laid over a source image of known dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Source image width in pixels
    pub width: u32,
    /// Source image height in pixels
    pub height: u32,
    /// Sampling stride and block size
    pub grid_size: GridSize,
    /// Number of cell columns
    pub cols: u32,
    /// Number of cell rows
    pub rows: u32,
}

impl GridLayout {
    /// Layout used by the preview, covering partial edge cells
    pub const fn preview(width: u32, height: u32, grid_size: GridSize) -> Self {
        Self::with_inclusion(width, height, grid_size, true)
    }

    /// Layout used by the high-resolution export, whole cells only
    pub const fn high_res(width: u32, height: u32, grid_size: GridSize) -> Self {
        Self::with_inclusion(width, height, grid_size, false)
    }

    const fn with_inclusion(width: u32, height: u32, grid_size: GridSize, inclusive: bool) -> Self {
        Self {
            width,
            height,
            grid_size,
            cols: grid_cells(width, grid_size, inclusive),
            rows: grid_cells(height, grid_size, inclusive),
        }
    }

    /// Total number of cells in the layout
    pub const fn cell_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    /// Whether the layout has no cells at all
    pub const fn is_empty(&self) -> bool {
        self.cols == 0 || self.rows == 0
    }

    /// Iterate cells in row-major order, top to bottom, left to right
    pub fn cells(&self) -> impl Iterator<Item = CellRect> + '_ {
        let step = self.grid_size.get();
        (0..self.rows).flat_map(move |row| {
            (0..self.cols).map(move |col| {
                let x = col * step;
                let y = row * step;
                CellRect {
                    row: row as usize,
                    col: col as usize,
                    x,
                    y,
                    width: step.min(self.width.saturating_sub(x)),
                    height: step.min(self.height.saturating_sub(y)),
                }
            })
        })
    }
}
