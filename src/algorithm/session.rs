//! Generation bookkeeping for an interactive mosaic session
//!
//! A session holds the palette, the current upload and the latest finished
//! mosaic. Every generation is issued as a [`GenerationTicket`] carrying a
//! monotonic sequence number. Tickets can run on another thread, and a
//! finished generation is only installed if nothing newer was requested
//! meanwhile. Uploads and grid changes also advance the sequence, so a
//! generation started before them can never overwrite the newer state.

use crate::algorithm::compositor::{
    GenerationResult, HighResOutput, compose_mosaic_observed, high_res_from_preview,
};
use crate::io::error::{MosaicError, Result};
use crate::io::image::encode_png;
use crate::palette::loader::Palette;
use crate::palette::tally::UsageTally;
use crate::spatial::grid::GridSize;
use image::RgbaImage;
use std::sync::Arc;

/// Everything needed to run one generation, detached from the session
#[derive(Debug, Clone)]
pub struct GenerationTicket {
    sequence: u64,
    source: Arc<RgbaImage>,
    palette: Arc<Palette>,
    grid_size: GridSize,
}

impl GenerationTicket {
    /// Sequence number assigned when the ticket was issued
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Grid size the generation will use
    pub const fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    /// Compose the mosaic for this ticket
    ///
    /// # Errors
    ///
    /// Returns an error if composition fails
    pub fn run(self) -> Result<FinishedGeneration> {
        self.run_observed(|_| {})
    }

    /// Compose the mosaic, reporting the number of matched cells as it goes
    ///
    /// # Errors
    ///
    /// Returns an error if composition fails
    pub fn run_observed<F>(self, on_cell: F) -> Result<FinishedGeneration>
    where
        F: FnMut(usize),
    {
        let result =
            compose_mosaic_observed(&self.source, &self.palette, self.grid_size, on_cell)?;
        Ok(FinishedGeneration {
            sequence: self.sequence,
            result,
        })
    }
}

/// Output of a ticket waiting to be applied to its session
#[derive(Debug, Clone)]
pub struct FinishedGeneration {
    sequence: u64,
    result: GenerationResult,
}

impl FinishedGeneration {
    /// Sequence number of the ticket that produced this result
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// The composed mosaic
    pub const fn result(&self) -> &GenerationResult {
        &self.result
    }
}

/// Source image, palette and latest mosaic for one user session
#[derive(Debug)]
pub struct MosaicSession {
    palette: Arc<Palette>,
    source: Option<Arc<RgbaImage>>,
    grid_size: GridSize,
    show_source: bool,
    latest_sequence: u64,
    current: Option<GenerationResult>,
}

impl MosaicSession {
    /// Start a session with a loaded palette and no source image
    pub fn new(palette: impl Into<Arc<Palette>>, grid_size: GridSize) -> Self {
        Self {
            palette: palette.into(),
            source: None,
            grid_size,
            show_source: false,
            latest_sequence: 0,
            current: None,
        }
    }

    /// Replace the source image, invalidating any existing mosaic
    pub fn upload(&mut self, image: RgbaImage) {
        log::info!("Source image replaced ({}x{})", image.width(), image.height());
        self.source = Some(Arc::new(image));
        self.invalidate();
    }

    /// Change the grid size, invalidating the mosaic if it differs
    pub fn set_grid_size(&mut self, grid_size: GridSize) {
        if grid_size != self.grid_size {
            self.grid_size = grid_size;
            self.invalidate();
        }
    }

    /// Current grid size
    pub const fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    /// Palette shared by every generation of this session
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Uploaded source image, if any
    pub fn source(&self) -> Option<&RgbaImage> {
        self.source.as_deref()
    }

    /// Issue a ticket for a fresh generation
    ///
    /// Returns `None` without side effects when nothing has been uploaded.
    /// Otherwise the current mosaic is dropped until the new one is applied.
    pub fn begin_generation(&mut self) -> Option<GenerationTicket> {
        let Some(source) = self.source.clone() else {
            log::debug!("Generation requested without a source image, ignoring");
            return None;
        };

        self.invalidate();
        Some(GenerationTicket {
            sequence: self.latest_sequence,
            source,
            palette: Arc::clone(&self.palette),
            grid_size: self.grid_size,
        })
    }

    /// Install a finished generation unless a newer one has been requested
    ///
    /// Returns whether the result was installed.
    pub fn apply(&mut self, finished: FinishedGeneration) -> bool {
        if finished.sequence != self.latest_sequence {
            log::warn!(
                "Discarding stale generation {} (latest is {})",
                finished.sequence,
                self.latest_sequence
            );
            return false;
        }

        log::info!(
            "Generation {} complete: {} caps used",
            finished.sequence,
            finished.result.cell_count
        );
        self.current = Some(finished.result);
        true
    }

    /// Run a generation to completion on the calling thread
    ///
    /// Returns `Ok(None)` when no source image has been uploaded.
    ///
    /// # Errors
    ///
    /// Returns an error if composition fails
    pub fn generate(&mut self) -> Result<Option<&GenerationResult>> {
        let Some(ticket) = self.begin_generation() else {
            return Ok(None);
        };
        let finished = ticket.run()?;
        self.apply(finished);
        Ok(self.current.as_ref())
    }

    /// Latest installed mosaic
    pub const fn mosaic(&self) -> Option<&GenerationResult> {
        self.current.as_ref()
    }

    /// Usage tally of the latest installed mosaic
    pub fn tally(&self) -> Option<&UsageTally> {
        self.current.as_ref().map(|result| &result.tally)
    }

    /// Choose between showing the source image and the mosaic
    pub const fn set_show_source(&mut self, show_source: bool) {
        self.show_source = show_source;
    }

    /// Whether the source image is selected for display
    pub const fn show_source(&self) -> bool {
        self.show_source
    }

    /// Surface to display under the current toggle
    ///
    /// The mosaic side stays empty until a generation has been applied.
    pub fn displayed(&self) -> Option<&RgbaImage> {
        if self.show_source {
            self.source.as_deref()
        } else {
            self.current.as_ref().map(|result| &result.output)
        }
    }

    /// PNG bytes of the preview mosaic
    ///
    /// # Errors
    ///
    /// Returns [`MosaicError::ExportBeforeGeneration`] if no mosaic exists,
    /// or an error if encoding fails
    pub fn export_preview_png(&self) -> Result<Vec<u8>> {
        let result = self
            .current
            .as_ref()
            .ok_or(MosaicError::ExportBeforeGeneration)?;
        encode_png(&result.output)
    }

    /// High-resolution mosaic drawn from the current preview's decisions
    ///
    /// The preview's tally is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`MosaicError::ExportBeforeGeneration`] if no mosaic exists,
    /// or an error if the source is smaller than one grid cell
    pub fn export_high_res(&self) -> Result<HighResOutput> {
        let result = self
            .current
            .as_ref()
            .ok_or(MosaicError::ExportBeforeGeneration)?;
        high_res_from_preview(result, &self.palette)
    }

    /// PNG bytes of the high-resolution mosaic
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as
    /// [`MosaicSession::export_high_res`], or if encoding fails
    pub fn export_high_res_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.export_high_res()?.output)
    }

    fn invalidate(&mut self) {
        self.latest_sequence += 1;
        self.current = None;
    }
}
