//! One uploaded file in, one PNG and one thumbnail out

use crate::dicom::{self, Descriptor, SourceImage};
use crate::error::PipelineError;
use crate::image::{
    PersistedImage, RasterOrigin, Thumbnail, ThumbnailSize, derive_thumbnail, encode, normalize_with_rng,
    thumbnail_path_for,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::path::Path;
use tracing::info;

/// Knobs for [`process`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    pub thumbnail_size: ThumbnailSize,
    /// Fixes synthesized UIDs and the placeholder texture
    pub seed: Option<u64>,
}

impl PipelineOptions {
    fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rand::rng()),
        }
    }
}

/// Everything the caller persists about one converted file
#[derive(Debug, Clone)]
pub struct Conversion {
    pub descriptor: Descriptor,
    pub source: Option<SourceImage>,
    pub raster_origin: RasterOrigin,
    pub image: PersistedImage,
    pub thumbnail: Thumbnail,
}

/// Convert `dicom_path` into `<output_dir>/<instance_uid>.png` plus its
/// `_thumb.png` preview.
///
/// Unreadable input still produces output (defaults and the synthetic
/// placeholder); only a failed write is an error.
pub fn process(dicom_path: &Path, output_dir: &Path, options: &PipelineOptions) -> Result<Conversion, PipelineError> {
    let mut rng = options.rng();

    let (descriptor, source) = dicom::extract_with_rng(dicom_path, &mut rng);
    let raster = normalize_with_rng(source.as_ref(), &mut rng);

    let image_path = output_dir.join(format!("{}.png", file_stem_for(&descriptor.instance_uid)));
    let image = encode(&raster.image, &image_path)?;
    let thumbnail = derive_thumbnail(&image.path, &thumbnail_path_for(&image.path), options.thumbnail_size);

    info!(
        input = %dicom_path.display(),
        output = %image.path.display(),
        origin = %raster.origin,
        "Converted"
    );

    Ok(Conversion {
        descriptor,
        source,
        raster_origin: raster.origin,
        image,
        thumbnail,
    })
}

/// Instance UID reduced to characters safe in a file name
#[must_use]
pub fn file_stem_for(instance_uid: &str) -> String {
    let stem: String = instance_uid
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();

    if stem.chars().all(|c| c == '.') {
        "instance".to_string()
    } else {
        stem
    }
}
