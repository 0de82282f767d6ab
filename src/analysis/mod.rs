//! Colour analysis of pixel blocks

/// Average colour extraction
pub mod color;

pub use color::Rgb;
