//! DICOM file parsing and metadata extraction
//!
//! Reading never fails towards the caller: an unreadable file yields a
//! defaulted [`Descriptor`] and no [`SourceImage`], a readable one yields
//! whatever attributes could be recovered.

mod descriptor;
mod parser;
mod photometric;
mod pixel_buffer;
mod pixel_data;
mod source;
mod validation;

// Re-export public API
pub use descriptor::{
    DEFAULT_MODALITY, DEFAULT_ORDINAL, DEFAULT_STUDY_DATE, Descriptor, UNKNOWN_PATIENT,
    UNREADABLE_PATIENT, UidLevel, synthesize_uid,
};
pub use parser::decompose_person_name;
pub use photometric::PhotometricInterpretation;
pub use pixel_buffer::{PixelBuffer, PixelLayout, Samples};
pub use source::SourceImage;

use anyhow::{Context, Result, bail};
use dicom::dictionary_std::{tags, uids};
use dicom::encoding::TransferSyntaxIndex;
use dicom::object::file::ReadPreamble;
use dicom::object::{DefaultDicomObject, FileMetaTableBuilder, InMemDicomObject, OpenFileOptions};
use dicom::transfer_syntax::TransferSyntaxRegistry;
use pixel_data::PixelDescription;
use rand::Rng;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Open and parse a DICOM file, with or without the 128-byte preamble.
///
/// A file that lacks the file meta group is read again as a bare data set
/// in Implicit or Explicit VR Little Endian, whichever the first element
/// header looks like.
pub fn open_dicom_file(file_path: &Path) -> Result<DefaultDicomObject> {
    match OpenFileOptions::new()
        .read_preamble(ReadPreamble::Auto)
        .open_file(file_path)
    {
        Ok(obj) => Ok(obj),
        Err(e) => {
            debug!(path = %file_path.display(), error = %e, "No readable file meta group, trying bare data set");
            read_bare_dataset(file_path).with_context(|| {
                format!("Failed to open DICOM file: {} ({e})", file_path.display())
            })
        }
    }
}

fn read_bare_dataset(file_path: &Path) -> Result<DefaultDicomObject> {
    let bytes = fs::read(file_path).with_context(|| format!("Failed to read {}", file_path.display()))?;
    if !plausible_dataset_start(&bytes) {
        bail!("Content does not start with a data set element");
    }

    let candidates = if has_explicit_vr(&bytes) {
        [uids::EXPLICIT_VR_LITTLE_ENDIAN, uids::IMPLICIT_VR_LITTLE_ENDIAN]
    } else {
        [uids::IMPLICIT_VR_LITTLE_ENDIAN, uids::EXPLICIT_VR_LITTLE_ENDIAN]
    };

    for uid in candidates {
        let Some(ts) = TransferSyntaxRegistry.get(uid) else {
            continue;
        };
        match InMemDicomObject::read_dataset_with_ts(bytes.as_slice(), ts) {
            Ok(obj) if obj.iter().next().is_some() => {
                debug!(transfer_syntax = uid, "Read bare data set");
                return obj
                    .with_meta(FileMetaTableBuilder::new().transfer_syntax(uid))
                    .context("Failed to build file meta group");
            }
            Ok(_) => debug!(transfer_syntax = uid, "Bare data set is empty"),
            Err(e) => debug!(transfer_syntax = uid, error = %e, "Bare data set not readable"),
        }
    }

    bail!("Not a bare data set in a little endian transfer syntax")
}

/// First element tag of a bare data set: an even group between the
/// identifying and the image pixel groups.
fn plausible_dataset_start(bytes: &[u8]) -> bool {
    bytes.len() >= 8 && {
        let group = u16::from_le_bytes([bytes[0], bytes[1]]);
        group.is_multiple_of(2) && (0x0008..=0x0028).contains(&group)
    }
}

/// Two upper-case letters after the first tag read as a VR
fn has_explicit_vr(bytes: &[u8]) -> bool {
    bytes.len() >= 6 && bytes[4].is_ascii_uppercase() && bytes[5].is_ascii_uppercase()
}

/// Extract the descriptor and the decoded source image from a file.
///
/// Synthesized identifiers draw from the thread-local generator; see
/// [`extract_with_rng`] for a reproducible variant.
pub fn extract(file_path: &Path) -> (Descriptor, Option<SourceImage>) {
    extract_with_rng(file_path, &mut rand::rng())
}

/// [`extract`] with an explicit random source for synthesized identifiers
pub fn extract_with_rng<R: Rng + ?Sized>(
    file_path: &Path,
    rng: &mut R,
) -> (Descriptor, Option<SourceImage>) {
    match open_dicom_file(file_path) {
        Ok(obj) => {
            let descriptor = Descriptor::from_object(&obj, rng);
            info!(
                path = %file_path.display(),
                study_uid = %descriptor.study_uid,
                series_uid = %descriptor.series_uid,
                instance_uid = %descriptor.instance_uid,
                modality = %descriptor.modality,
                "Extracted DICOM descriptor"
            );
            (descriptor, Some(extract_source_image(&obj)))
        }
        Err(e) => {
            warn!(path = %file_path.display(), error = %format!("{e:#}"), "Unreadable DICOM file, using defaults");
            (Descriptor::unreadable(rng), None)
        }
    }
}

/// Collect the pixel-related attributes and decode the pixel data.
///
/// Decode failures leave `pixels` empty; the normalizer decides what to
/// render instead.
pub fn extract_source_image(obj: &DefaultDicomObject) -> SourceImage {
    let dimensions = parser::extract_dimensions(obj);
    let bit_depth = parser::extract_bit_depth(obj);
    let pixel_representation = parser::extract_pixel_representation(obj);
    let samples_per_pixel = parser::extract_samples_per_pixel(obj);
    let number_of_frames = parser::extract_number_of_frames(obj);
    let planar_configuration = parser::extract_planar_configuration(obj);
    let transfer_syntax = parser::extract_transfer_syntax(obj);
    let sop_class = parser::extract_sop_class(obj);
    let window = parser::window_hints(obj);

    let photometric_interpretation = parser::text(obj, tags::PHOTOMETRIC_INTERPRETATION)
        .map(|s| s.parse::<PhotometricInterpretation>().unwrap_or_default())
        .unwrap_or_default();

    if let Err(e) = validation::validate_photometric_samples(&photometric_interpretation, samples_per_pixel) {
        warn!(error = %e, "Photometric interpretation disagrees with samples per pixel");
    }

    let pixels = match (dimensions, bit_depth) {
        _ if obj.get(tags::PIXEL_DATA).is_none() => {
            debug!("No Pixel Data element");
            None
        }
        (Some(dims), Some(bit_depth)) => {
            let layout = PixelLayout::new(number_of_frames, dims.rows, dims.cols, samples_per_pixel)
                .with_planar(planar_configuration == Some(1));
            let description = PixelDescription {
                layout,
                bit_depth,
                pixel_representation,
                photometric_interpretation: &photometric_interpretation,
                transfer_syntax: &transfer_syntax,
            };
            pixel_data::extract_pixel_buffer(obj, &description)
                .inspect_err(|e| warn!(error = %format!("{e:#}"), "Pixel data could not be extracted"))
                .ok()
        }
        _ => {
            warn!("Pixel Data present but Rows/Columns/Bits Allocated missing");
            None
        }
    };

    SourceImage {
        dimensions,
        bit_depth,
        pixel_representation,
        photometric_interpretation,
        samples_per_pixel,
        number_of_frames,
        window,
        transfer_syntax: Some(transfer_syntax),
        sop_class,
        pixels,
    }
}
