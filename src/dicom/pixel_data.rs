//! DICOM pixel data extraction
//!
//! This module handles pixel data extraction from DICOM objects, including
//! compression detection, endianness conversion, and conversion of the raw
//! bytes into typed samples.

use super::photometric::PhotometricInterpretation;
use super::pixel_buffer::{PixelBuffer, PixelLayout, Samples};
use super::validation;
use crate::types::{BitDepth, PixelRepresentation, TransferSyntax};
use anyhow::{Context, Result, bail};
use dicom::core::PrimitiveValue;
use dicom::dictionary_std::tags;
use dicom::object::DefaultDicomObject;
use dicom::pixeldata::PixelDecoder;

/// What the caller already knows about the pixel data attributes
#[derive(Debug, Clone)]
pub struct PixelDescription<'a> {
    pub layout: PixelLayout,
    pub bit_depth: BitDepth,
    pub pixel_representation: PixelRepresentation,
    pub photometric_interpretation: &'a PhotometricInterpretation,
    pub transfer_syntax: &'a TransferSyntax,
}

/// Extract pixel data from a DICOM object as a typed buffer
pub fn extract_pixel_buffer(
    obj: &DefaultDicomObject,
    description: &PixelDescription<'_>,
) -> Result<PixelBuffer> {
    validation::validate_bits_allocated(description.bit_depth.allocated)?;
    let expected_samples = description.layout.expected_samples()?;

    let bytes = extract_pixel_bytes(obj, description)?;
    let samples = bytes_to_samples(
        &bytes,
        description.bit_depth,
        description.pixel_representation,
        expected_samples,
    )?;

    Ok(PixelBuffer::new(description.layout, samples))
}

fn extract_pixel_bytes(obj: &DefaultDicomObject, description: &PixelDescription<'_>) -> Result<Vec<u8>> {
    let transfer_syntax = description.transfer_syntax;
    let bits_allocated = description.bit_depth.allocated;
    let is_compressed = detect_compression(&transfer_syntax.uid);
    let needs_raw_fallback = !is_compressed
        && (description.photometric_interpretation.needs_raw_read() || bits_allocated == 32);

    if bits_allocated == 16 && transfer_syntax.is_big_endian() {
        extract_big_endian_16bit(obj)
    } else if needs_raw_fallback {
        extract_raw_pixel_data(obj)
    } else {
        extract_decoded_pixel_data(obj)
    }
}

/// Detect if transfer syntax uses compression
#[inline]
#[must_use]
fn detect_compression(uid: &str) -> bool {
    uid.starts_with("1.2.840.10008.1.2.4")      // JPEG family, JPEG-LS, JPEG 2000
        || uid.starts_with("1.2.840.10008.1.2.5") // RLE lossless
}

/// Little-endian bytes of 16-bit pixel data stored as Explicit VR Big Endian.
///
/// An OW value has already been decoded into native words by the parser;
/// only an OB value still holds the big-endian byte stream.
fn extract_big_endian_16bit(obj: &DefaultDicomObject) -> Result<Vec<u8>> {
    let value = obj
        .get(tags::PIXEL_DATA)
        .context("Missing pixel data")?
        .value()
        .primitive()
        .context("Encapsulated pixel data is not valid for Explicit VR Big Endian")?;

    match value {
        PrimitiveValue::U16(words) => Ok(words.iter().flat_map(|w| w.to_le_bytes()).collect()),
        PrimitiveValue::I16(words) => Ok(words.iter().flat_map(|w| w.to_le_bytes()).collect()),
        other => {
            let raw_bytes = other.to_bytes();
            if !raw_bytes.len().is_multiple_of(2) {
                bail!("Invalid 16-bit pixel data length");
            }

            Ok(raw_bytes
                .chunks_exact(2)
                .flat_map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]).to_le_bytes())
                .collect())
        }
    }
}

/// Extract raw pixel data (for YCbCr, Palette, 32-bit)
fn extract_raw_pixel_data(obj: &DefaultDicomObject) -> Result<Vec<u8>> {
    Ok(obj
        .get(tags::PIXEL_DATA)
        .context("Missing pixel data")?
        .to_bytes()
        .context("Failed to get raw pixel data bytes")?
        .to_vec())
}

/// Extract decoded pixel data (handles compression)
fn extract_decoded_pixel_data(obj: &DefaultDicomObject) -> Result<Vec<u8>> {
    let decoded = obj
        .decode_pixel_data()
        .context("Failed to decode pixel data")?;

    // Raw little-endian samples, before any modality or VOI LUT
    Ok(decoded.data().to_vec())
}

/// Reinterpret little-endian bytes as samples of the allocated width.
///
/// Trailing bytes beyond `expected_samples` (odd-length padding, extra
/// fragments) are dropped.
fn bytes_to_samples(
    bytes: &[u8],
    bit_depth: BitDepth,
    representation: PixelRepresentation,
    expected_samples: usize,
) -> Result<Samples> {
    let width = bit_depth.bytes_per_sample();
    let available = bytes.len() / width.max(1);
    let bytes = &bytes[..available.min(expected_samples) * width];
    let signed = representation.is_signed();

    let samples = match (bit_depth.allocated, signed) {
        (8, false) => Samples::U8(bytes.to_vec()),
        (8, true) => Samples::I8(bytes.iter().map(|&b| b as i8).collect()),
        (16, false) => Samples::U16(
            bytes
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]))
                .collect(),
        ),
        (16, true) => Samples::I16(
            bytes
                .chunks_exact(2)
                .map(|c| i16::from_le_bytes([c[0], c[1]]))
                .collect(),
        ),
        (32, false) => Samples::U32(
            bytes
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        (32, true) => Samples::I32(
            bytes
                .chunks_exact(4)
                .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        (other, _) => bail!("Unsupported bits allocated: {other}"),
    };

    Ok(samples)
}
