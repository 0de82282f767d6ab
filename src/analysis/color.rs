//! Average colour extraction over arbitrary pixel blocks

use crate::io::error::{Result, computation_error};
use crate::spatial::grid::CellRect;
use image::{Rgba, RgbaImage};

/// Floating-point RGB triple holding per-channel means in `[0, 255]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    /// Red channel mean
    pub r: f64,
    /// Green channel mean
    pub g: f64,
    /// Blue channel mean
    pub b: f64,
}

impl Rgb {
    /// Create a colour from channel values
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Exact colour of a single 8-bit pixel, alpha ignored
    pub fn from_pixel(pixel: &Rgba<u8>) -> Self {
        let [r, g, b, _] = pixel.0;
        Self::new(f64::from(r), f64::from(g), f64::from(b))
    }
}

/// Arithmetic mean of the red, green and blue channels across all samples
///
/// Alpha is ignored and no rounding is applied.
///
/// # Errors
///
/// Returns an error if the iterator yields no samples
pub fn average_color<'a, I>(samples: I) -> Result<Rgb>
where
    I: IntoIterator<Item = &'a Rgba<u8>>,
{
    let (mut red, mut green, mut blue) = (0u64, 0u64, 0u64);
    let mut count = 0u64;

    for pixel in samples {
        let [r, g, b, _] = pixel.0;
        red += u64::from(r);
        green += u64::from(g);
        blue += u64::from(b);
        count += 1;
    }

    if count == 0 {
        return Err(computation_error(
            "average colour",
            &"pixel block contains no samples",
        ));
    }

    let count = count as f64;
    Ok(Rgb::new(
        red as f64 / count,
        green as f64 / count,
        blue as f64 / count,
    ))
}

/// Average colour of one rectangular block of an image
///
/// Blocks reaching past the image edge are clipped, so partial boundary
/// cells average only the pixels they actually cover.
///
/// # Errors
///
/// Returns an error if the clipped block is empty
pub fn block_average(image: &RgbaImage, rect: CellRect) -> Result<Rgb> {
    let x = rect.x.min(image.width());
    let y = rect.y.min(image.height());
    let width = rect.width.min(image.width() - x);
    let height = rect.height.min(image.height() - y);

    average_color(
        (y..y + height).flat_map(|py| (x..x + width).map(move |px| image.get_pixel(px, py))),
    )
}
