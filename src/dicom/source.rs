//! Decoded pixel-related attributes of a DICOM object

use super::photometric::PhotometricInterpretation;
use super::pixel_buffer::PixelBuffer;
use crate::types::{BitDepth, Dimensions, PixelRepresentation, SOPClass, TransferSyntax, WindowHints};

/// What the normalizer needs from a decoded DICOM object.
///
/// `pixels` is `None` when the object has no Pixel Data element or it
/// could not be decoded.
#[derive(Debug, Clone, Default)]
pub struct SourceImage {
    pub dimensions: Option<Dimensions>,
    pub bit_depth: Option<BitDepth>,
    pub pixel_representation: PixelRepresentation,
    pub photometric_interpretation: PhotometricInterpretation,
    pub samples_per_pixel: u16,
    pub number_of_frames: u32,
    pub window: WindowHints,
    pub transfer_syntax: Option<TransferSyntax>,
    pub sop_class: Option<SOPClass>,
    pub pixels: Option<PixelBuffer>,
}

impl SourceImage {
    /// Source built directly from samples, without a DICOM file behind it
    #[must_use]
    pub fn from_pixels(pixels: PixelBuffer) -> Self {
        let layout = *pixels.layout();
        Self {
            dimensions: Some(layout.dimensions),
            bit_depth: Some(BitDepth::new(pixels.samples().bits(), pixels.samples().bits())),
            pixel_representation: if pixels.samples().is_signed() {
                PixelRepresentation::Signed
            } else {
                PixelRepresentation::Unsigned
            },
            photometric_interpretation: PhotometricInterpretation::Monochrome2,
            samples_per_pixel: layout.samples_per_pixel,
            number_of_frames: layout.frames,
            window: WindowHints::default(),
            transfer_syntax: None,
            sop_class: None,
            pixels: Some(pixels),
        }
    }

    #[must_use]
    pub fn with_window(mut self, window: WindowHints) -> Self {
        self.window = window;
        self
    }

    #[must_use]
    pub fn has_pixels(&self) -> bool {
        self.pixels.is_some()
    }
}
