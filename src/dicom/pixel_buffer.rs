//! Typed, shape-aware pixel sample storage

use crate::error::ShapeError;
use crate::types::Dimensions;

/// Sample storage, one variant per Bits Allocated / Pixel Representation pair
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    U8(Vec<u8>),
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    U32(Vec<u32>),
    I32(Vec<i32>),
}

impl Samples {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::I8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::I16(v) => v.len(),
            Self::U32(v) => v.len(),
            Self::I32(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_signed(&self) -> bool {
        matches!(self, Self::I8(_) | Self::I16(_) | Self::I32(_))
    }

    #[must_use]
    pub fn bits(&self) -> u16 {
        match self {
            Self::U8(_) | Self::I8(_) => 8,
            Self::U16(_) | Self::I16(_) => 16,
            Self::U32(_) | Self::I32(_) => 32,
        }
    }

    /// Reinterpret signed samples as the unsigned type of the same width.
    ///
    /// The bit pattern is kept, so `-1i16` becomes `65535`. Unsigned
    /// variants are widened unchanged.
    #[must_use]
    pub fn to_unsigned(&self) -> Vec<u32> {
        match self {
            Self::U8(v) => v.iter().map(|&s| u32::from(s)).collect(),
            Self::I8(v) => v.iter().map(|&s| u32::from(s as u8)).collect(),
            Self::U16(v) => v.iter().map(|&s| u32::from(s)).collect(),
            Self::I16(v) => v.iter().map(|&s| u32::from(s as u16)).collect(),
            Self::U32(v) => v.clone(),
            Self::I32(v) => v.iter().map(|&s| s as u32).collect(),
        }
    }

    fn gather(&self, indices: impl Iterator<Item = usize>) -> Self {
        match self {
            Self::U8(v) => Self::U8(indices.map(|i| v[i]).collect()),
            Self::I8(v) => Self::I8(indices.map(|i| v[i]).collect()),
            Self::U16(v) => Self::U16(indices.map(|i| v[i]).collect()),
            Self::I16(v) => Self::I16(indices.map(|i| v[i]).collect()),
            Self::U32(v) => Self::U32(indices.map(|i| v[i]).collect()),
            Self::I32(v) => Self::I32(indices.map(|i| v[i]).collect()),
        }
    }
}

/// Geometry of a pixel buffer: `frames × rows × cols × samples_per_pixel`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelLayout {
    pub frames: u32,
    pub dimensions: Dimensions,
    pub samples_per_pixel: u16,
    /// Planar Configuration 1: each frame stores channel planes one after another
    pub planar: bool,
}

impl PixelLayout {
    #[must_use]
    pub fn grayscale(rows: u32, cols: u32) -> Self {
        Self::new(1, rows, cols, 1)
    }

    #[must_use]
    pub fn new(frames: u32, rows: u32, cols: u32, samples_per_pixel: u16) -> Self {
        Self {
            frames,
            dimensions: Dimensions::new(rows, cols),
            samples_per_pixel,
            planar: false,
        }
    }

    #[must_use]
    pub fn with_planar(mut self, planar: bool) -> Self {
        self.planar = planar;
        self
    }

    #[inline]
    #[must_use]
    pub fn samples_per_frame(&self) -> Option<usize> {
        self.dimensions
            .pixel_count()?
            .checked_mul(usize::from(self.samples_per_pixel))
    }

    /// Sample count the layout describes; `None` on arithmetic overflow
    #[inline]
    #[must_use]
    pub fn total_samples(&self) -> Option<usize> {
        self.samples_per_frame()?
            .checked_mul(usize::try_from(self.frames).ok()?)
    }

    #[must_use]
    pub fn is_2d(&self) -> bool {
        self.frames == 1 && self.samples_per_pixel == 1
    }

    /// Total sample count of a usable layout.
    ///
    /// Zero-sized axes and layouts too large to address are rejected.
    pub fn expected_samples(&self) -> Result<usize, ShapeError> {
        if self.frames == 0 || self.samples_per_pixel == 0 || !self.dimensions.is_valid() {
            return Err(self.invalid());
        }
        self.total_samples().ok_or_else(|| self.invalid())
    }

    fn invalid(&self) -> ShapeError {
        ShapeError::InvalidLayout {
            frames: self.frames,
            rows: self.dimensions.rows,
            cols: self.dimensions.cols,
            samples_per_pixel: self.samples_per_pixel,
        }
    }
}

/// Decoded pixel samples together with their layout
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    layout: PixelLayout,
    samples: Samples,
}

impl PixelBuffer {
    /// Wrap samples without validating them against the layout; use
    /// [`PixelBuffer::first_frame`] to obtain a checked 2-D view.
    #[must_use]
    pub fn new(layout: PixelLayout, samples: Samples) -> Self {
        Self { layout, samples }
    }

    #[must_use]
    pub fn layout(&self) -> &PixelLayout {
        &self.layout
    }

    #[must_use]
    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.layout.dimensions
    }

    /// Reduce to a single-frame, single-channel buffer.
    ///
    /// Frame 0 is kept when there are several frames; of multiple channels
    /// only the first survives. A buffer that is already 2-D is returned as
    /// a plain copy.
    pub fn first_frame(&self) -> Result<PixelBuffer, ShapeError> {
        if self.samples.is_empty() {
            return Err(ShapeError::Empty);
        }
        let expected = self.layout.expected_samples()?;
        if self.samples.len() != expected {
            return Err(ShapeError::LengthMismatch {
                expected,
                actual: self.samples.len(),
            });
        }

        let dims = self.layout.dimensions;
        if self.layout.is_2d() {
            return Ok(self.clone());
        }

        let pixels = dims.pixel_count().ok_or_else(|| self.layout.invalid())?;
        let spp = usize::from(self.layout.samples_per_pixel);
        // Frame 0 starts at offset 0; channel 0 is either the first plane or
        // every spp-th sample.
        let samples = if self.layout.planar || spp == 1 {
            self.samples.gather(0..pixels)
        } else {
            self.samples.gather((0..pixels).map(|p| p * spp))
        };

        Ok(PixelBuffer::new(
            PixelLayout::grayscale(dims.rows, dims.cols),
            samples,
        ))
    }
}
