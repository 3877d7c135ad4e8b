use crate::error::EncodeError;
use image::{GrayImage, ImageError, ImageFormat};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A PNG written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Write `image` as an 8-bit grayscale PNG, creating parent directories.
///
/// An existing file at `path` is overwritten.
pub fn encode(image: &GrayImage, path: &Path) -> Result<PersistedImage, EncodeError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|source| EncodeError::CreateDir {
        path: parent.to_path_buf(),
        source,
    })?;

    let file = File::create(path).map_err(|source| EncodeError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    image
        .write_to(&mut writer, ImageFormat::Png)
        .map_err(|e| match e {
            ImageError::IoError(source) => EncodeError::Write {
                path: path.to_path_buf(),
                source,
            },
            other => EncodeError::Png {
                path: path.to_path_buf(),
                source: other,
            },
        })?;

    // Flush explicitly so a late write error is not swallowed by Drop
    writer
        .into_inner()
        .map_err(|e| EncodeError::Write {
            path: path.to_path_buf(),
            source: e.into_error(),
        })?;

    debug!(path = %path.display(), width = image.width(), height = image.height(), "PNG written");

    Ok(PersistedImage {
        path: path.to_path_buf(),
        width: image.width(),
        height: image.height(),
    })
}
