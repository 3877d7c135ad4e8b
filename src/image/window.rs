//! Clinical windowing (VOI linear window without the DICOM -0.5/-1 offsets)

use super::normalization::UnsignedFrame;
use crate::error::NormalizeError;
use crate::types::WindowHints;
use image::GrayImage;

/// Clip samples to `[center - width/2, center + width/2]` and stretch that
/// range linearly onto `[0, 255]`.
///
/// Only the first value of multi-valued hints is used. A missing hint or a
/// window that collapses to a single value is an error so the caller can
/// fall back to auto-normalization.
pub fn apply_window(frame: &UnsignedFrame, hints: &WindowHints) -> Result<GrayImage, NormalizeError> {
    let (center, width) = hints.first().ok_or(NormalizeError::NoWindow)?;

    let lo = center - width / 2.0;
    let hi = center + width / 2.0;
    if !lo.is_finite() || !hi.is_finite() || hi <= lo {
        return Err(NormalizeError::DegenerateWindow { center, width });
    }

    let range = hi - lo;
    let pixels = frame
        .samples
        .iter()
        .map(|&s| {
            let clipped = f64::from(s).clamp(lo, hi);
            // Saturating cast truncates towards zero
            ((clipped - lo) / range * 255.0) as u8
        })
        .collect();

    frame.to_image(pixels)
}
