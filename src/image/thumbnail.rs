//! Fixed-size previews of persisted rasters

use super::encode::encode;
use anyhow::{Context, Result, bail};
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const BACKGROUND: Luma<u8> = Luma([255]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSize {
    pub width: u32,
    pub height: u32,
}

impl ThumbnailSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub const fn square(edge: u32) -> Self {
        Self::new(edge, edge)
    }
}

pub const DEFAULT_THUMBNAIL_SIZE: ThumbnailSize = ThumbnailSize::square(48);

impl Default for ThumbnailSize {
    fn default() -> Self {
        DEFAULT_THUMBNAIL_SIZE
    }
}

/// Outcome of thumbnail derivation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Thumbnail {
    /// Padded preview written at this path
    Derived(PathBuf),
    /// Derivation failed; the full-size source stands in for the preview
    Degraded(PathBuf),
}

impl Thumbnail {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Derived(p) | Self::Degraded(p) => p,
        }
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }
}

/// `<dir>/<stem>_thumb.png` next to the full-size image
#[must_use]
pub fn thumbnail_path_for(image_path: &Path) -> PathBuf {
    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    image_path.with_file_name(format!("{stem}_thumb.png"))
}

/// Largest size with the source aspect ratio that fits in `size`.
///
/// Never upscales. Each side is at least one pixel.
#[must_use]
pub fn fit_within(width: u32, height: u32, size: ThumbnailSize) -> (u32, u32) {
    if width <= size.width && height <= size.height {
        return (width.max(1), height.max(1));
    }

    let scale = (f64::from(size.width) / f64::from(width)).min(f64::from(size.height) / f64::from(height));
    let fit = |side: u32, limit: u32| ((f64::from(side) * scale).round() as u32).clamp(1, limit.max(1));

    (fit(width, size.width), fit(height, size.height))
}

/// Resize the raster at `source` into a white canvas of `size` and write it
/// to `dest`.
///
/// Never fails: any error is logged and the source path is returned as the
/// degraded preview.
pub fn derive_thumbnail(source: &Path, dest: &Path, size: ThumbnailSize) -> Thumbnail {
    match render_thumbnail(source, size).and_then(|thumb| {
        encode(&thumb, dest)?;
        Ok(())
    }) {
        Ok(()) => {
            debug!(path = %dest.display(), "Thumbnail created");
            Thumbnail::Derived(dest.to_path_buf())
        }
        Err(e) => {
            warn!(source = %source.display(), error = %format!("{e:#}"), "Thumbnail failed, using full image");
            Thumbnail::Degraded(source.to_path_buf())
        }
    }
}

/// Derive only when nothing exists at `dest` yet
pub fn ensure_thumbnail(source: &Path, dest: &Path, size: ThumbnailSize) -> Thumbnail {
    if dest.exists() {
        debug!(path = %dest.display(), "Thumbnail already present");
        return Thumbnail::Derived(dest.to_path_buf());
    }
    derive_thumbnail(source, dest, size)
}

fn render_thumbnail(source: &Path, size: ThumbnailSize) -> Result<GrayImage> {
    if size.width == 0 || size.height == 0 {
        bail!("Thumbnail size {}x{} is empty", size.width, size.height);
    }

    let image = image::open(source)
        .with_context(|| format!("Failed to open raster {}", source.display()))?
        .to_luma8();

    let (w, h) = fit_within(image.width(), image.height(), size);
    let resized = if (w, h) == image.dimensions() {
        image
    } else {
        imageops::resize(&image, w, h, FilterType::Lanczos3)
    };

    let mut canvas = GrayImage::from_pixel(size.width, size.height, BACKGROUND);
    let x = (size.width - w) / 2;
    let y = (size.height - h) / 2;
    imageops::overlay(&mut canvas, &resized, i64::from(x), i64::from(y));

    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_garbage;
    use std::fs;

    /// Uniform gray content so padding is the only white
    fn gray_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        encode(&GrayImage::from_pixel(width, height, Luma([100])), &path).unwrap();
        path
    }

    fn is_background_row(image: &GrayImage, y: u32) -> bool {
        (0..image.width()).all(|x| image.get_pixel(x, y)[0] == 255)
    }

    fn is_background_col(image: &GrayImage, x: u32) -> bool {
        (0..image.height()).all(|y| image.get_pixel(x, y)[0] == 255)
    }

    fn padding(image: &GrayImage) -> (u32, u32, u32, u32) {
        let (w, h) = image.dimensions();
        let top = (0..h).take_while(|&y| is_background_row(image, y)).count() as u32;
        let bottom = (0..h).rev().take_while(|&y| is_background_row(image, y)).count() as u32;
        let left = (0..w).take_while(|&x| is_background_col(image, x)).count() as u32;
        let right = (0..w).rev().take_while(|&x| is_background_col(image, x)).count() as u32;
        (top, bottom, left, right)
    }

    #[test]
    fn fit_preserves_aspect_ratio() {
        let size = DEFAULT_THUMBNAIL_SIZE;
        assert_eq!(fit_within(512, 512, size), (48, 48));
        assert_eq!(fit_within(200, 100, size), (48, 24));
        assert_eq!(fit_within(100, 300, size), (16, 48));
        assert_eq!(fit_within(100, 30, size), (48, 14));
        assert_eq!(fit_within(5000, 2, size), (48, 1));
    }

    #[test]
    fn fit_never_upscales() {
        assert_eq!(fit_within(10, 20, DEFAULT_THUMBNAIL_SIZE), (10, 20));
        assert_eq!(fit_within(48, 48, DEFAULT_THUMBNAIL_SIZE), (48, 48));
    }

    #[test]
    fn fit_into_zero_target_keeps_one_pixel() {
        assert_eq!(fit_within(100, 50, ThumbnailSize::new(0, 48)), (1, 1));
        assert_eq!(fit_within(100, 50, ThumbnailSize::new(48, 0)), (1, 1));
    }

    #[test]
    fn thumbnail_path_sits_next_to_image() {
        assert_eq!(
            thumbnail_path_for(Path::new("static/images/1.2.3.png")),
            PathBuf::from("static/images/1.2.3_thumb.png")
        );
    }

    #[test]
    fn every_aspect_yields_centered_square() {
        let dir = tempfile::tempdir().unwrap();
        for (w, h) in [(512, 512), (200, 100), (100, 300), (100, 30), (10, 20), (3, 1)] {
            let source = gray_png(dir.path(), &format!("src_{w}x{h}.png"), w, h);
            let dest = dir.path().join(format!("thumb_{w}x{h}.png"));

            let thumb = derive_thumbnail(&source, &dest, DEFAULT_THUMBNAIL_SIZE);
            assert_eq!(thumb, Thumbnail::Derived(dest.clone()));

            let image = image::open(&dest).unwrap().to_luma8();
            assert_eq!(image.dimensions(), (48, 48), "{w}x{h}");

            let (top, bottom, left, right) = padding(&image);
            assert!(top.abs_diff(bottom) <= 1, "{w}x{h}: top {top} bottom {bottom}");
            assert!(left.abs_diff(right) <= 1, "{w}x{h}: left {left} right {right}");
        }
    }

    #[test]
    fn small_source_is_pasted_unscaled() {
        let dir = tempfile::tempdir().unwrap();
        let source = gray_png(dir.path(), "small.png", 10, 20);
        let dest = dir.path().join("small_thumb.png");

        derive_thumbnail(&source, &dest, DEFAULT_THUMBNAIL_SIZE);
        let image = image::open(&dest).unwrap().to_luma8();

        assert_eq!(padding(&image), (14, 14, 19, 19));
        assert_eq!(image.get_pixel(19, 14)[0], 100);
        assert_eq!(image.get_pixel(28, 33)[0], 100);
    }

    #[test]
    fn custom_size_is_honoured() {
        let dir = tempfile::tempdir().unwrap();
        let source = gray_png(dir.path(), "wide.png", 300, 100);
        let dest = dir.path().join("wide_thumb.png");

        derive_thumbnail(&source, &dest, ThumbnailSize::new(96, 64));
        let image = image::open(&dest).unwrap().to_luma8();
        assert_eq!(image.dimensions(), (96, 64));
    }

    #[test]
    fn unreadable_source_degrades_to_source_path() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_garbage(dir.path(), "broken.png");
        let dest = dir.path().join("broken_thumb.png");

        let thumb = derive_thumbnail(&source, &dest, DEFAULT_THUMBNAIL_SIZE);

        assert!(thumb.is_degraded());
        assert_eq!(thumb.path(), source.as_path());
        assert!(!dest.exists());
    }

    #[test]
    fn zero_sized_target_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let source = gray_png(dir.path(), "flat.png", 64, 32);
        let dest = dir.path().join("flat_thumb.png");

        for size in [ThumbnailSize::new(0, 48), ThumbnailSize::new(48, 0), ThumbnailSize::square(0)] {
            let thumb = derive_thumbnail(&source, &dest, size);
            assert_eq!(thumb, Thumbnail::Degraded(source.clone()), "{size:?}");
        }
        assert!(!dest.exists());
    }

    #[test]
    fn rederiving_overwrites_with_identical_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let source = crate::test_support::gradient_png(dir.path(), "gradient.png", 300, 120);
        let dest = dir.path().join("gradient_thumb.png");

        derive_thumbnail(&source, &dest, DEFAULT_THUMBNAIL_SIZE);
        let first = fs::read(&dest).unwrap();
        derive_thumbnail(&source, &dest, DEFAULT_THUMBNAIL_SIZE);
        let second = fs::read(&dest).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn ensure_keeps_existing_thumbnail() {
        let dir = tempfile::tempdir().unwrap();
        let source = gray_png(dir.path(), "cached.png", 64, 64);
        let dest = dir.path().join("cached_thumb.png");
        fs::write(&dest, b"stale but present").unwrap();

        let thumb = ensure_thumbnail(&source, &dest, DEFAULT_THUMBNAIL_SIZE);

        assert_eq!(thumb, Thumbnail::Derived(dest.clone()));
        assert_eq!(fs::read(&dest).unwrap(), b"stale but present");
    }

    #[test]
    fn ensure_derives_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let source = gray_png(dir.path(), "fresh.png", 64, 32);
        let dest = thumbnail_path_for(&source);

        let thumb = ensure_thumbnail(&source, &dest, DEFAULT_THUMBNAIL_SIZE);

        assert_eq!(thumb, Thumbnail::Derived(dir.path().join("fresh_thumb.png")));
        assert_eq!(image::open(&dest).unwrap().to_luma8().dimensions(), (48, 48));
    }
}
