//! Whole-image brightness

use crate::error::{PipelineError, Result};

/// Mean pixel brightness of an encoded image.
///
/// Decodes the image and averages every channel value of every pixel in the
/// image's native color layout, so an RGB frame averages over three samples
/// per pixel and a grayscale frame over one.
pub fn mean_brightness(bytes: &[u8]) -> Result<f64> {
    let img = image::load_from_memory(bytes).map_err(|e| PipelineError::parse("image", e))?;

    let samples = img.as_bytes();
    if samples.is_empty() {
        return Err(PipelineError::parse("image", "decoded image has no pixels"));
    }

    let sum: u64 = samples.iter().map(|&v| u64::from(v)).sum();
    Ok(sum as f64 / samples.len() as f64)
}
