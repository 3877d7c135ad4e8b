use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Pixel buffer whose layout cannot be reduced to a single 2-D frame
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("pixel buffer is empty")]
    Empty,

    #[error("invalid frame layout: {frames} frame(s) of {cols}x{rows} with {samples_per_pixel} sample(s) per pixel")]
    InvalidLayout {
        frames: u32,
        rows: u32,
        cols: u32,
        samples_per_pixel: u16,
    },

    #[error("pixel buffer holds {actual} samples, layout requires {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Reasons a normalization step hands over to the next fallback
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("no decodable DICOM object")]
    MissingSource,

    #[error("DICOM object carries no usable pixel data")]
    MissingPixelData,

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("window center/width not present")]
    NoWindow,

    #[error("unusable window: center={center}, width={width}")]
    DegenerateWindow { center: f64, width: f64 },

    #[error("normalized samples do not fill a {cols}x{rows} raster")]
    RasterSize { rows: u32, cols: u32 },
}

/// Failure to persist a raster; the one error the pipeline never absorbs
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to create output directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write image {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode PNG for {}", path.display())]
    Png {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl EncodeError {
    /// Destination the failed write was aimed at
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::CreateDir { path, .. } | Self::Write { path, .. } | Self::Png { path, .. } => path,
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
}
