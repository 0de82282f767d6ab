//! Mosaic composition at preview and high resolution
//!
//! Composition runs in two passes. Planning scans the source grid in
//! row-major order, averages each cell and records the chosen tile index.
//! Rendering then draws those decisions at whatever cell size the output
//! needs. The preview draws at the grid size onto a surface the size of the
//! source. The high-resolution export draws whole cells only, at an enlarged
//! cap size.

use crate::algorithm::matcher::match_tile_index;
use crate::analysis::color::block_average;
use crate::io::configuration::{
    HIGH_RES_BASE_CAP_SIZE, HIGH_RES_CAP_SIZE_LIMIT, HIGH_RES_MAX_DIMENSION, TILE_FILTER,
};
use crate::io::error::{MosaicError, Result, computation_error, invalid_source};
use crate::palette::loader::Palette;
use crate::palette::tally::UsageTally;
use crate::spatial::grid::{GridLayout, GridSize};
use image::{RgbaImage, imageops};
use ndarray::{Array2, Axis, Slice};

/// Chosen tile index for every cell, indexed by (`row`, `col`)
pub type CellPlan = Array2<usize>;

/// Completed preview generation
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// Mosaic surface with the source image's exact dimensions
    pub output: RgbaImage,
    /// Tile usage, one count per visited cell
    pub tally: UsageTally,
    /// Number of cells visited
    pub cell_count: usize,
    /// Tile decisions the output was drawn from
    pub plan: CellPlan,
    /// Grid the source was sampled with
    pub layout: GridLayout,
}

/// Completed high-resolution render
#[derive(Debug, Clone)]
pub struct HighResOutput {
    /// Mosaic surface of `caps_wide * cap_size` by `caps_high * cap_size`
    pub output: RgbaImage,
    /// Whole cells across
    pub caps_wide: u32,
    /// Whole cells down
    pub caps_high: u32,
    /// Pixel size of each drawn tile
    pub cap_size: u32,
    /// Tile usage over the drawn cells only
    pub tally: UsageTally,
}

/// Pixel size of one tile in a high-resolution export
///
/// `min(100, floor(8192 / max(caps_wide, caps_high) * 300))`
pub fn high_res_cap_size(caps_wide: u32, caps_high: u32) -> u32 {
    let largest = caps_wide.max(caps_high);
    if largest == 0 {
        return HIGH_RES_CAP_SIZE_LIMIT;
    }

    let scaled = (f64::from(HIGH_RES_MAX_DIMENSION) / f64::from(largest)
        * f64::from(HIGH_RES_BASE_CAP_SIZE))
    .floor();
    scaled.min(f64::from(HIGH_RES_CAP_SIZE_LIMIT)) as u32
}

/// Choose a tile for every cell of `layout`, counting each choice in `tally`
///
/// Cells are visited top to bottom, left to right. `on_cell` receives the
/// number of cells finished so far after each one.
///
/// # Errors
///
/// Returns an error if the palette is empty or a cell has no pixels
pub fn plan_cells<F>(
    source: &RgbaImage,
    palette: &Palette,
    layout: &GridLayout,
    tally: &mut UsageTally,
    mut on_cell: F,
) -> Result<CellPlan>
where
    F: FnMut(usize),
{
    if palette.is_empty() {
        return Err(MosaicError::EmptyPalette);
    }

    let mut plan = Array2::zeros((layout.rows as usize, layout.cols as usize));

    for (visited, cell) in layout.cells().enumerate() {
        let color = block_average(source, cell)?;
        let index = match_tile_index(color, palette, tally)?;
        if let Some(slot) = plan.get_mut((cell.row, cell.col)) {
            *slot = index;
        }
        log::trace!(
            "Cell ({}, {}) average {color:?} -> tile {index}",
            cell.row,
            cell.col
        );
        on_cell(visited + 1);
    }

    Ok(plan)
}

/// Draw planned tiles scaled to `cell_size` onto a `width` by `height` surface
///
/// Cell (`row`, `col`) lands at (`col * cell_size`, `row * cell_size`).
/// Tiles reaching past the surface edge are clipped, and only the visible
/// part of a clipped tile is ever scaled.
///
/// # Errors
///
/// Returns an error if the plan references a tile outside the palette
pub fn render_plan(
    plan: &CellPlan,
    palette: &Palette,
    cell_size: u32,
    width: u32,
    height: u32,
) -> Result<RgbaImage> {
    let mut output = RgbaImage::new(width, height);
    let mut scaled: Vec<Option<RgbaImage>> = vec![None; palette.len()];

    for ((row, col), &index) in plan.indexed_iter() {
        let tile = palette.get(index).ok_or_else(|| {
            computation_error(
                "render plan",
                &format!("tile index {index} outside palette of {}", palette.len()),
            )
        })?;

        let x = u64::from(cell_size) * col as u64;
        let y = u64::from(cell_size) * row as u64;
        let visible_width = u64::from(cell_size).min(u64::from(width).saturating_sub(x)) as u32;
        let visible_height = u64::from(cell_size).min(u64::from(height).saturating_sub(y)) as u32;
        if visible_width == 0 || visible_height == 0 {
            continue;
        }

        if visible_width == cell_size && visible_height == cell_size {
            let Some(slot) = scaled.get_mut(index) else {
                continue;
            };
            let bitmap = slot.get_or_insert_with(|| {
                imageops::resize(&tile.bitmap, cell_size, cell_size, TILE_FILTER)
            });
            imageops::overlay(&mut output, bitmap, x as i64, y as i64);
        } else {
            let clipped = scale_visible(&tile.bitmap, cell_size, visible_width, visible_height);
            imageops::overlay(&mut output, &clipped, x as i64, y as i64);
        }
    }

    Ok(output)
}

// Top-left `visible_width` x `visible_height` corner of the tile as it would
// look scaled to `cell_size`, without materialising the whole scaled tile
fn scale_visible(
    bitmap: &RgbaImage,
    cell_size: u32,
    visible_width: u32,
    visible_height: u32,
) -> RgbaImage {
    let source_span = |native: u32, visible: u32| {
        let span = (u64::from(native) * u64::from(visible)).div_ceil(u64::from(cell_size));
        span.clamp(1, u64::from(native.max(1))) as u32
    };
    let crop_width = source_span(bitmap.width(), visible_width);
    let crop_height = source_span(bitmap.height(), visible_height);

    let corner = imageops::crop_imm(bitmap, 0, 0, crop_width, crop_height).to_image();
    imageops::resize(&corner, visible_width, visible_height, TILE_FILTER)
}

/// Build the preview mosaic for a source image
///
/// # Errors
///
/// Returns an error if the source has no pixels or the palette is empty
pub fn compose_mosaic(
    source: &RgbaImage,
    palette: &Palette,
    grid_size: GridSize,
) -> Result<GenerationResult> {
    compose_mosaic_observed(source, palette, grid_size, |_| {})
}

/// Build the preview mosaic, reporting progress after each cell
///
/// # Errors
///
/// Returns an error if the source has no pixels or the palette is empty
pub fn compose_mosaic_observed<F>(
    source: &RgbaImage,
    palette: &Palette,
    grid_size: GridSize,
    on_cell: F,
) -> Result<GenerationResult>
where
    F: FnMut(usize),
{
    let layout = GridLayout::preview(source.width(), source.height(), grid_size);
    if layout.is_empty() {
        return Err(invalid_source(&"source image has no pixels"));
    }

    log::info!(
        "Composing {}x{} mosaic at grid {grid_size} ({} cells)",
        layout.width,
        layout.height,
        layout.cell_count()
    );

    let mut tally = UsageTally::for_palette(palette);
    let plan = plan_cells(source, palette, &layout, &mut tally, on_cell)?;
    let output = render_plan(
        &plan,
        palette,
        grid_size.get(),
        source.width(),
        source.height(),
    )?;

    Ok(GenerationResult {
        output,
        tally,
        cell_count: layout.cell_count(),
        plan,
        layout,
    })
}

/// Re-sample the source and build a high-resolution mosaic
///
/// Only whole grid cells are drawn, so a partial trailing row or column the
/// preview shows is dropped. The returned tally is independent of any
/// preview tally.
///
/// # Errors
///
/// Returns an error if the source is smaller than one grid cell on either
/// axis or the palette is empty
pub fn compose_high_res(
    source: &RgbaImage,
    palette: &Palette,
    grid_size: GridSize,
) -> Result<HighResOutput> {
    let layout = GridLayout::high_res(source.width(), source.height(), grid_size);
    ensure_whole_cells(&layout)?;

    let mut tally = UsageTally::for_palette(palette);
    let plan = plan_cells(source, palette, &layout, &mut tally, |_| {})?;
    render_high_res(&plan, palette, &layout, tally)
}

/// Build a high-resolution mosaic from the decisions of a finished preview
///
/// Whole cells of the preview were sampled from identical blocks, so their
/// decisions are reused without matching again.
///
/// # Errors
///
/// Returns an error if the source is smaller than one grid cell on either
/// axis
pub fn high_res_from_preview(
    preview: &GenerationResult,
    palette: &Palette,
) -> Result<HighResOutput> {
    let layout = GridLayout::high_res(
        preview.layout.width,
        preview.layout.height,
        preview.layout.grid_size,
    );
    ensure_whole_cells(&layout)?;

    let plan = preview
        .plan
        .slice_axis(Axis(0), Slice::from(..layout.rows as usize))
        .slice_axis(Axis(1), Slice::from(..layout.cols as usize))
        .to_owned();

    let mut tally = UsageTally::for_palette(palette);
    for &index in &plan {
        tally.record(index);
    }

    render_high_res(&plan, palette, &layout, tally)
}

fn ensure_whole_cells(layout: &GridLayout) -> Result<()> {
    if layout.is_empty() {
        return Err(invalid_source(&format!(
            "{}x{} image is smaller than one {} grid cell",
            layout.width, layout.height, layout.grid_size
        )));
    }
    Ok(())
}

fn render_high_res(
    plan: &CellPlan,
    palette: &Palette,
    layout: &GridLayout,
    tally: UsageTally,
) -> Result<HighResOutput> {
    let cap_size = high_res_cap_size(layout.cols, layout.rows);
    let width = layout.cols * cap_size;
    let height = layout.rows * cap_size;

    log::info!(
        "Rendering high-res mosaic {width}x{height} ({}x{} caps at {cap_size}px)",
        layout.cols,
        layout.rows
    );

    let output = render_plan(plan, palette, cap_size, width, height)?;

    Ok(HighResOutput {
        output,
        caps_wide: layout.cols,
        caps_high: layout.rows,
        cap_size,
        tally,
    })
}
