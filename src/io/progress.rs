//! Per-image cell progress with a batch bar for large sets

use crate::io::configuration::{MAX_INDIVIDUAL_PROGRESS_BARS, PROGRESS_BAR_WIDTH};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

/// Redraw granularity as a fraction of an image's cells
const REDRAW_STEPS: usize = 100;

#[derive(Debug, Clone, Default)]
struct FileProgress {
    name: String,
    matched: usize,
    cells: usize,
    drawn_step: Option<usize>,
}

impl FileProgress {
    fn step(&self) -> usize {
        if self.cells == 0 {
            REDRAW_STEPS
        } else {
            self.matched.saturating_mul(REDRAW_STEPS) / self.cells
        }
    }
}

/// Coordinates progress display for batch mosaic generation
///
/// Each image gets a bar counting matched cells, redrawn once per percent.
/// Only the most recent images keep a bar, and large batches add an overall
/// image counter.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    cell_bars: Vec<ProgressBar>,
    files: Vec<FileProgress>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static CELL_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{prefix:>20}} [{{bar:{PROGRESS_BAR_WIDTH}.green/white}}] {{pos}}/{{len}} cells"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Images: [{bar:40.green/white}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a manager with no bars yet
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            cell_bars: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Create the bars for a batch of `file_count` images
    pub fn initialize(&mut self, file_count: usize) {
        if file_count > MAX_INDIVIDUAL_PROGRESS_BARS {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        for _ in 0..file_count.min(MAX_INDIVIDUAL_PROGRESS_BARS) {
            let bar = ProgressBar::new(0);
            bar.set_style(CELL_STYLE.clone());
            self.cell_bars.push(self.multi_progress.add(bar));
        }
        self.files = vec![FileProgress::default(); file_count];
    }

    /// Begin tracking image `index` with `cells` cells to match
    pub fn start_file(&mut self, index: usize, path: &Path, cells: usize) {
        if index >= self.files.len() {
            self.files.resize(index + 1, FileProgress::default());
        }
        if let Some(file) = self.files.get_mut(index) {
            *file = FileProgress {
                name: path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .into_owned(),
                matched: 0,
                cells,
                drawn_step: None,
            };
        }
        self.redraw();
    }

    /// Record `matched` finished cells for image `index`
    ///
    /// The display only changes when another percent has completed.
    pub fn update_cells(&mut self, index: usize, matched: usize) {
        let Some(file) = self.files.get_mut(index) else {
            return;
        };
        file.matched = matched;
        if file.drawn_step == Some(file.step()) {
            return;
        }
        self.redraw();
    }

    /// Mark image `index` as done
    pub fn complete_file(&mut self, index: usize) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }
        if let Some(file) = self.files.get_mut(index) {
            file.matched = file.cells;
            file.drawn_step = None;
        }
        self.redraw();
    }

    /// Remove all bars from the terminal
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All images processed");
        }
        let _ = self.multi_progress.clear();
    }

    // Most recently started images take the available bars
    fn redraw(&mut self) {
        let started = self.files.iter().filter(|file| !file.name.is_empty()).count();
        let hidden = started.saturating_sub(self.cell_bars.len());
        let mut bars = self.cell_bars.iter();

        for file in self
            .files
            .iter_mut()
            .filter(|file| !file.name.is_empty())
            .skip(hidden)
        {
            let Some(bar) = bars.next() else {
                break;
            };
            if bar.prefix() != file.name {
                bar.set_prefix(file.name.clone());
            }
            bar.set_length(file.cells as u64);
            bar.set_position(file.matched as u64);
            file.drawn_step = Some(file.step());
        }

        for bar in bars {
            bar.set_length(0);
            bar.set_position(0);
            bar.set_prefix("");
        }
    }
}
