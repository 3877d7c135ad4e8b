//! Pixel buffer to 8-bit grayscale normalization
//!
//! The conversion is an ordered chain of fallible steps:
//!
//! 1. [`first_frame`]: a decoded, 2-D reducible pixel buffer must exist
//! 2. [`UnsignedFrame::from_buffer`]: signed samples are reinterpreted as unsigned
//! 3. [`apply_window`](super::apply_window): window center/width from the file
//! 4. [`auto_normalize`]: min/max stretch when windowing is unavailable
//!
//! Any failure up to step 2 ends in the synthetic placeholder, produced in
//! exactly one place: [`normalize_with_rng`].

use super::synthetic;
use super::window::apply_window;
use super::{NormalizedRaster, RasterOrigin};
use crate::dicom::{PixelBuffer, SourceImage};
use crate::error::NormalizeError;
use crate::types::Dimensions;
use image::{GrayImage, ImageBuffer};
use rand::Rng;
use tracing::{debug, warn};

/// Single frame of samples widened to `u32` after the unsigned remap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedFrame {
    pub dimensions: Dimensions,
    pub samples: Vec<u32>,
}

impl UnsignedFrame {
    #[must_use]
    pub fn new(dimensions: Dimensions, samples: Vec<u32>) -> Self {
        Self { dimensions, samples }
    }

    /// Remap a 2-D buffer; signed samples keep their bit pattern
    #[must_use]
    pub fn from_buffer(buffer: &PixelBuffer) -> Self {
        Self::new(buffer.dimensions(), buffer.samples().to_unsigned())
    }

    pub(crate) fn to_image(&self, pixels: Vec<u8>) -> Result<GrayImage, NormalizeError> {
        let Dimensions { rows, cols } = self.dimensions;
        ImageBuffer::from_raw(cols, rows, pixels).ok_or(NormalizeError::RasterSize { rows, cols })
    }
}

/// Normalize with the thread-local random source for the placeholder texture
pub fn normalize(source: Option<&SourceImage>) -> NormalizedRaster {
    normalize_with_rng(source, &mut rand::rng())
}

/// Always produce a raster: the rendered source, or the synthetic placeholder
pub fn normalize_with_rng<R: Rng + ?Sized>(source: Option<&SourceImage>, rng: &mut R) -> NormalizedRaster {
    render(source).unwrap_or_else(|e| {
        warn!(reason = %e, "Pixel data not renderable, using synthetic image");
        NormalizedRaster::new(synthetic::generate(rng), RasterOrigin::Synthetic)
    })
}

/// Render the source's first frame, windowed if possible, else auto-normalized
pub fn render(source: Option<&SourceImage>) -> Result<NormalizedRaster, NormalizeError> {
    let source = source.ok_or(NormalizeError::MissingSource)?;
    let frame = first_frame(source)?;
    if source.number_of_frames > 1 {
        debug!(frames = source.number_of_frames, "Multi-frame DICOM, using first frame");
    }
    let frame = UnsignedFrame::from_buffer(&frame);

    apply_window(&frame, &source.window)
        .map(|image| NormalizedRaster::new(image, RasterOrigin::Windowed))
        .or_else(|e| {
            debug!(reason = %e, "Windowing skipped, auto-normalizing");
            auto_normalize(&frame).map(|image| NormalizedRaster::new(image, RasterOrigin::AutoNormalized))
        })
}

/// The first frame, first channel of the source's pixel buffer
pub fn first_frame(source: &SourceImage) -> Result<PixelBuffer, NormalizeError> {
    let pixels = source.pixels.as_ref().ok_or(NormalizeError::MissingPixelData)?;
    Ok(pixels.first_frame()?)
}

/// Shift the minimum to zero and stretch the maximum to 255.
///
/// A constant frame stays all zero.
pub fn auto_normalize(frame: &UnsignedFrame) -> Result<GrayImage, NormalizeError> {
    let min = frame.samples.iter().copied().min().unwrap_or(0);
    let max = frame.samples.iter().map(|&s| s - min).max().unwrap_or(0);

    let pixels = if max > 0 {
        let max = f64::from(max);
        frame
            .samples
            .iter()
            .map(|&s| (f64::from(s - min) / max * 255.0) as u8)
            .collect()
    } else {
        vec![0; frame.samples.len()]
    };

    frame.to_image(pixels)
}
