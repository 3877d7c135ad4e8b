mod encode;
mod normalization;
mod synthetic;
mod thumbnail;
mod window;

pub use encode::{PersistedImage, encode};
pub use normalization::{UnsignedFrame, auto_normalize, first_frame, normalize, normalize_with_rng, render};
pub use synthetic::{SYNTHETIC_SIZE, generate, synthesize};
pub use thumbnail::{
    DEFAULT_THUMBNAIL_SIZE, Thumbnail, ThumbnailSize, derive_thumbnail, ensure_thumbnail,
    fit_within, thumbnail_path_for,
};
pub use window::apply_window;

use image::GrayImage;
use std::fmt;

/// Which branch of the normalization fallback chain produced a raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterOrigin {
    /// Window center/width from the file
    Windowed,
    /// Min/max stretch of the stored values
    AutoNormalized,
    /// Placeholder; the file had nothing renderable
    Synthetic,
}

impl fmt::Display for RasterOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windowed => write!(f, "windowed"),
            Self::AutoNormalized => write!(f, "auto-normalized"),
            Self::Synthetic => write!(f, "synthetic"),
        }
    }
}

/// Single-channel 8-bit raster ready for encoding
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRaster {
    pub image: GrayImage,
    pub origin: RasterOrigin,
}

impl NormalizedRaster {
    #[must_use]
    pub fn new(image: GrayImage, origin: RasterOrigin) -> Self {
        Self { image, origin }
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
