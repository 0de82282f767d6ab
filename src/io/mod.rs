//! Input/output operations, configuration and error handling

/// Command-line parsing and batch file processing
pub mod cli;
/// Constants and runtime defaults
pub mod configuration;
/// Error types and constructors
pub mod error;
/// Source image decoding and PNG export
pub mod image;
/// Terminal logger setup
pub mod logging;
/// Progress bars for batch processing
pub mod progress;
/// Cap count, physical size and usage summaries
pub mod report;
