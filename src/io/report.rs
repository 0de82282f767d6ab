//! Human-readable summaries of a finished mosaic

use crate::io::configuration::{CAP_DIAMETER_MM, MM_PER_INCH};
use crate::palette::tally::UsageTally;
use crate::spatial::grid::GridLayout;
use std::fmt;

/// Estimated physical size of a mosaic built from real caps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalSize {
    /// Width in millimetres
    pub width_mm: f64,
    /// Height in millimetres
    pub height_mm: f64,
}

impl PhysicalSize {
    /// Size of a grid of `caps_wide` by `caps_high` caps
    pub fn of_caps(caps_wide: u32, caps_high: u32) -> Self {
        Self {
            width_mm: f64::from(caps_wide) * CAP_DIAMETER_MM,
            height_mm: f64::from(caps_high) * CAP_DIAMETER_MM,
        }
    }

    /// Width in centimetres
    pub fn width_cm(&self) -> f64 {
        self.width_mm / 10.0
    }

    /// Height in centimetres
    pub fn height_cm(&self) -> f64 {
        self.height_mm / 10.0
    }

    /// Width in inches
    pub fn width_in(&self) -> f64 {
        self.width_mm / MM_PER_INCH
    }

    /// Height in inches
    pub fn height_in(&self) -> f64 {
        self.height_mm / MM_PER_INCH
    }
}

impl fmt::Display for PhysicalSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.0} x {:.0} mm ({:.1} x {:.1} cm, {:.1} x {:.1} in)",
            self.width_mm,
            self.height_mm,
            self.width_cm(),
            self.height_cm(),
            self.width_in(),
            self.height_in()
        )
    }
}

/// Summary shown after a generation
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicReport {
    /// Cells visited by the preview
    pub caps_used: usize,
    /// Size of the whole-cap grid
    pub size: PhysicalSize,
    /// `identifier: count` for every tile used at least once
    pub usage: Vec<String>,
}

impl MosaicReport {
    /// Summarise a preview layout and its tally
    ///
    /// The physical size counts whole cells only, as the printed mosaic does.
    pub fn new(layout: &GridLayout, tally: &UsageTally) -> Self {
        let whole = GridLayout::high_res(layout.width, layout.height, layout.grid_size);
        Self {
            caps_used: layout.cell_count(),
            size: PhysicalSize::of_caps(whole.cols, whole.rows),
            usage: usage_lines(tally),
        }
    }
}

impl fmt::Display for MosaicReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bottle Caps Used: {}", self.caps_used)?;
        writeln!(f, "Mosaic Size: {}", self.size)?;
        for line in &self.usage {
            writeln!(f, "  {line}")?;
        }
        Ok(())
    }
}

/// `identifier: count` lines for used tiles, in palette order
pub fn usage_lines(tally: &UsageTally) -> Vec<String> {
    tally
        .used()
        .map(|entry| format!("{}: {}", entry.identifier, entry.count))
        .collect()
}
