//! Error types for palette loading, mosaic composition and export

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Main error type for all mosaic operations
#[derive(Debug)]
pub enum MosaicError {
    /// Tile manifest could not be read
    ManifestUnavailable {
        /// Path to the manifest file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Tile manifest was read but is not a usable list of filenames
    ManifestInvalid {
        /// Description of what's wrong with the manifest
        reason: String,
    },

    /// A palette tile image failed to decode
    TileDecode {
        /// Path to the tile image
        path: PathBuf,
        /// Underlying image decoding error
        source: image::ImageError,
    },

    /// Palette tiles did not all finish loading in time
    PaletteTimeout {
        /// Tiles that finished before the deadline
        loaded: usize,
        /// Tiles listed in the manifest
        expected: usize,
        /// Deadline that expired
        timeout: Duration,
    },

    /// Two manifest entries map to the same tile identifier
    DuplicateTile {
        /// The repeated identifier
        identifier: String,
    },

    /// Matching was attempted against a palette with no tiles
    EmptyPalette,

    /// Failed to load source image from filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to encode or save a generated mosaic
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// Source image doesn't meet composition requirements
    InvalidSourceData {
        /// Description of what's wrong with the source data
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Export requested before a mosaic has been generated
    ExportBeforeGeneration,

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Numerical computation produced invalid result
    Computation {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ManifestUnavailable { path, source } => {
                write!(
                    f,
                    "Tile manifest '{}' is unavailable: {source}",
                    path.display()
                )
            }
            Self::ManifestInvalid { reason } => {
                write!(f, "Invalid tile manifest: {reason}")
            }
            Self::TileDecode { path, source } => {
                write!(
                    f,
                    "Failed to decode tile image '{}': {source}",
                    path.display()
                )
            }
            Self::PaletteTimeout {
                loaded,
                expected,
                timeout,
            } => {
                write!(
                    f,
                    "Palette loading timed out after {}ms ({loaded}/{expected} tiles loaded)",
                    timeout.as_millis()
                )
            }
            Self::DuplicateTile { identifier } => {
                write!(f, "Duplicate tile identifier '{identifier}' in manifest")
            }
            Self::EmptyPalette => {
                write!(f, "Cannot match colours against an empty palette")
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::ExportBeforeGeneration => {
                write!(f, "Please generate the mosaic before downloading")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
        }
    }
}

impl std::error::Error for MosaicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TileDecode { source, .. }
            | Self::ImageLoad { source, .. }
            | Self::ImageExport { source, .. } => Some(source),
            Self::ManifestUnavailable { source, .. } | Self::FileSystem { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}

/// Convenience type alias for mosaic results
pub type Result<T> = std::result::Result<T, MosaicError>;

impl From<image::ImageError> for MosaicError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for MosaicError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MosaicError {
    MosaicError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a computation error
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> MosaicError {
    MosaicError::Computation {
        operation,
        reason: reason.to_string(),
    }
}

/// Create an invalid source data error
pub fn invalid_source(reason: &impl ToString) -> MosaicError {
    MosaicError::InvalidSourceData {
        reason: reason.to_string(),
    }
}
