//! Nearest-colour tile matching under L1 channel distance

use crate::analysis::color::Rgb;
use crate::io::error::{MosaicError, Result};
use crate::palette::loader::{Palette, Tile};
use crate::palette::tally::UsageTally;

/// Sum of absolute channel differences between two colours
pub fn color_distance(a: Rgb, b: Rgb) -> f64 {
    (a.r - b.r).abs() + (a.g - b.g).abs() + (a.b - b.b).abs()
}

/// Index of the colour closest to `color`, `None` for an empty slice
///
/// Scans in index order and keeps the first minimum, so among equally close
/// colours the lowest index wins.
pub fn nearest_tile_index(color: Rgb, colors: &[Rgb]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (index, &candidate) in colors.iter().enumerate() {
        let distance = color_distance(color, candidate);
        match best {
            Some((_, smallest)) if distance >= smallest => {}
            _ => best = Some((index, distance)),
        }
    }

    best.map(|(index, _)| index)
}

/// Find the palette tile closest to `color` and count one use of it
///
/// # Errors
///
/// Returns [`MosaicError::EmptyPalette`] if the palette has no tiles, in
/// which case the tally is left untouched
pub fn match_tile<'p>(color: Rgb, palette: &'p Palette, tally: &mut UsageTally) -> Result<&'p Tile> {
    let index = match_tile_index(color, palette, tally)?;
    palette.get(index).ok_or(MosaicError::EmptyPalette)
}

/// Index form of [`match_tile`], counting one use of the chosen tile
///
/// # Errors
///
/// Returns [`MosaicError::EmptyPalette`] if the palette has no tiles
pub fn match_tile_index(color: Rgb, palette: &Palette, tally: &mut UsageTally) -> Result<usize> {
    let index = nearest_tile_index(color, palette.colors()).ok_or(MosaicError::EmptyPalette)?;
    tally.record(index);
    Ok(index)
}
