//! Tile manifest parsing and concurrent palette loading
//!
//! A manifest is a JSON array of tile image filenames resolved against a base
//! directory. Loading decodes every tile on its own worker thread and joins
//! the results back into manifest order, failing on the first decode error or
//! once the deadline passes.

use crate::analysis::color::{Rgb, average_color};
use crate::io::error::{MosaicError, Result, computation_error};
use image::RgbaImage;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// Derive a tile identifier by stripping the last extension from a filename
///
/// Directory components are kept and only an extension after the final `/`
/// is removed. A trailing dot with nothing after it is left in place.
pub fn tile_identifier(filename: &str) -> &str {
    let name_start = filename.rfind('/').map_or(0, |slash| slash + 1);
    let name = filename.get(name_start..).unwrap_or(filename);

    match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() => filename.get(..name_start + dot).unwrap_or(filename),
        _ => filename,
    }
}

/// List of tile images making up a palette
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    base: PathBuf,
    filenames: Vec<String>,
}

impl Manifest {
    /// Read a manifest file, resolving tiles against the file's directory
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The content is not a JSON array of strings
    /// - The list is empty or two entries share an identifier
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| MosaicError::ManifestUnavailable {
                path: path.to_path_buf(),
                source: e,
            })?;
        let base = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        Self::parse(&content, base)
    }

    /// Parse manifest JSON, resolving tiles against `base`
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not a non-empty JSON array of
    /// strings with unique identifiers
    pub fn parse(content: &str, base: impl Into<PathBuf>) -> Result<Self> {
        let filenames: Vec<String> =
            serde_json::from_str(content).map_err(|e| MosaicError::ManifestInvalid {
                reason: e.to_string(),
            })?;

        Self::from_filenames(base, filenames)
    }

    /// Build a manifest from filenames already in memory
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or two entries share an identifier
    pub fn from_filenames(base: impl Into<PathBuf>, filenames: Vec<String>) -> Result<Self> {
        if filenames.is_empty() {
            return Err(MosaicError::ManifestInvalid {
                reason: "manifest lists no tiles".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for filename in &filenames {
            let identifier = tile_identifier(filename);
            if !seen.insert(identifier) {
                return Err(MosaicError::DuplicateTile {
                    identifier: identifier.to_string(),
                });
            }
        }

        Ok(Self {
            base: base.into(),
            filenames,
        })
    }

    /// Directory tile filenames are resolved against
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Filenames in manifest order
    pub fn filenames(&self) -> &[String] {
        &self.filenames
    }

    /// Number of listed tiles
    pub fn len(&self) -> usize {
        self.filenames.len()
    }

    /// Whether the manifest lists no tiles
    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }

    /// Identifier and resolved image path for each entry, in manifest order
    pub fn entries(&self) -> impl Iterator<Item = (String, PathBuf)> + '_ {
        self.filenames.iter().map(|filename| {
            (
                tile_identifier(filename).to_string(),
                self.base.join(filename),
            )
        })
    }
}

/// One palette image with its precomputed average colour
#[derive(Debug, Clone)]
pub struct Tile {
    /// Unique name derived from the image filename
    pub identifier: String,
    /// Decoded tile at its native dimensions
    pub bitmap: RgbaImage,
    /// Mean colour over every pixel of the bitmap
    pub average: Rgb,
}

impl Tile {
    /// Build a tile from a decoded bitmap
    ///
    /// # Errors
    ///
    /// Returns an error if the bitmap has no pixels
    pub fn from_image(identifier: impl Into<String>, bitmap: RgbaImage) -> Result<Self> {
        let average = average_color(bitmap.pixels())?;
        Ok(Self {
            identifier: identifier.into(),
            bitmap,
            average,
        })
    }

    /// Decode a tile image from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be opened or decoded, or is empty
    pub fn from_path(identifier: impl Into<String>, path: &Path) -> Result<Self> {
        let bitmap = image::open(path)
            .map_err(|e| MosaicError::TileDecode {
                path: path.to_path_buf(),
                source: e,
            })?
            .to_rgba8();
        Self::from_image(identifier, bitmap)
    }
}

/// Ordered collection of tiles available to the matcher
#[derive(Debug, Clone, Default)]
pub struct Palette {
    tiles: Vec<Tile>,
    colors: Vec<Rgb>,
}

impl Palette {
    /// Build a palette, keeping the given tile order
    ///
    /// # Errors
    ///
    /// Returns an error if two tiles share an identifier
    pub fn new(tiles: Vec<Tile>) -> Result<Self> {
        let mut seen = HashSet::new();
        for tile in &tiles {
            if !seen.insert(tile.identifier.as_str()) {
                return Err(MosaicError::DuplicateTile {
                    identifier: tile.identifier.clone(),
                });
            }
        }

        let colors = tiles.iter().map(|tile| tile.average).collect();
        Ok(Self { tiles, colors })
    }

    /// Tiles in palette order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Average colours, parallel to [`Palette::tiles`]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Tile at `index`
    pub fn get(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    /// Index of the tile with the given identifier
    pub fn position(&self, identifier: &str) -> Option<usize> {
        self.tiles
            .iter()
            .position(|tile| tile.identifier == identifier)
    }

    /// Number of tiles
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the palette has no tiles
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Decode every manifest tile concurrently and assemble the palette
///
/// Each tile decodes on its own thread. The call returns once all tiles have
/// arrived, and tile order always follows the manifest regardless of which
/// decode finishes first.
///
/// # Errors
///
/// Returns an error if:
/// - Any tile image fails to decode
/// - Not every tile has arrived before `timeout` expires
/// - A worker thread cannot be spawned
pub fn load_palette(manifest: &Manifest, timeout: Duration) -> Result<Palette> {
    let expected = manifest.len();
    let (sender, receiver) = mpsc::channel();

    for (index, (identifier, path)) in manifest.entries().enumerate() {
        let sender = sender.clone();
        thread::Builder::new()
            .name(format!("tile-{identifier}"))
            .spawn(move || {
                let result = Tile::from_path(identifier, &path);
                // Receiver is gone once loading has already failed
                let _ = sender.send((index, result));
            })
            .map_err(|e| computation_error("palette load", &e))?;
    }
    drop(sender);

    let deadline = Instant::now() + timeout;
    let mut slots: Vec<Option<Tile>> = (0..expected).map(|_| None).collect();
    let mut loaded = 0;

    while loaded < expected {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match receiver.recv_timeout(remaining) {
            Ok((index, Ok(tile))) => {
                log::debug!(
                    "Loaded tile '{}' ({}x{}), average {:?}",
                    tile.identifier,
                    tile.bitmap.width(),
                    tile.bitmap.height(),
                    tile.average
                );
                if let Some(slot) = slots.get_mut(index) {
                    *slot = Some(tile);
                }
                loaded += 1;
            }
            Ok((_, Err(error))) => return Err(error),
            Err(RecvTimeoutError::Timeout) => {
                return Err(MosaicError::PaletteTimeout {
                    loaded,
                    expected,
                    timeout,
                });
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(computation_error(
                    "palette load",
                    &"tile worker exited without reporting a result",
                ));
            }
        }
    }

    let palette = Palette::new(slots.into_iter().flatten().collect())?;
    log::info!(
        "Loaded palette of {} tiles from '{}'",
        palette.len(),
        manifest.base().display()
    );
    Ok(palette)
}
