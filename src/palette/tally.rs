//! Per-tile usage counts for one mosaic generation

use crate::palette::loader::Palette;

/// Usage count of a single tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyEntry {
    /// Tile identifier
    pub identifier: String,
    /// Number of cells that used the tile
    pub count: usize,
}

/// Mapping from tile identifier to usage count, kept in palette order
///
/// Every palette tile has an entry, including those never used.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UsageTally {
    entries: Vec<TallyEntry>,
}

impl UsageTally {
    /// Fresh all-zero tally covering every tile of the palette
    pub fn for_palette(palette: &Palette) -> Self {
        Self {
            entries: palette
                .tiles()
                .iter()
                .map(|tile| TallyEntry {
                    identifier: tile.identifier.clone(),
                    count: 0,
                })
                .collect(),
        }
    }

    /// Count one more use of the tile at `index`
    ///
    /// Indices outside the palette are ignored.
    pub fn record(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.count += 1;
        }
    }

    /// Zero every count
    pub fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.count = 0;
        }
    }

    /// Usage count for an identifier, `None` if the palette has no such tile
    pub fn get(&self, identifier: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.identifier == identifier)
            .map(|entry| entry.count)
    }

    /// Usage count for the tile at `index`
    pub fn count_at(&self, index: usize) -> Option<usize> {
        self.entries.get(index).map(|entry| entry.count)
    }

    /// All entries in palette order
    pub fn entries(&self) -> &[TallyEntry] {
        &self.entries
    }

    /// Entries with a non-zero count, in palette order
    pub fn used(&self) -> impl Iterator<Item = &TallyEntry> {
        self.entries.iter().filter(|entry| entry.count > 0)
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.entries.iter().map(|entry| entry.count).sum()
    }

    /// Number of tracked tiles
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the tally tracks no tiles
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
