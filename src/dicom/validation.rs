use super::photometric::PhotometricInterpretation;
use anyhow::{Result, bail};

#[inline]
pub fn validate_bits_allocated(bits_allocated: u16) -> Result<()> {
    if !matches!(bits_allocated, 8 | 16 | 32) {
        bail!("Unsupported bits allocated: {bits_allocated} (expected 8, 16, or 32)");
    }

    Ok(())
}

/// Check that the declared channel count agrees with the color space.
///
/// A mismatch does not stop extraction (the first channel is used either
/// way); callers log it.
#[inline]
pub fn validate_photometric_samples(
    photometric_interpretation: &PhotometricInterpretation,
    samples_per_pixel: u16,
) -> Result<()> {
    let is_valid = match (photometric_interpretation, samples_per_pixel) {
        (pi, 1) if pi.is_grayscale() || matches!(pi, PhotometricInterpretation::Palette) => true,
        (PhotometricInterpretation::Rgb, 3) => true,
        (pi, 3) if pi.is_ycbcr() => true,
        (PhotometricInterpretation::Unknown(_), _) => true,
        _ => false,
    };

    if !is_valid {
        bail!(
            "Inconsistent photometric interpretation {photometric_interpretation} with samples per pixel {samples_per_pixel}"
        );
    }

    Ok(())
}
