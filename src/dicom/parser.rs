use crate::types::{BitDepth, Dimensions, PixelRepresentation, SOPClass, TransferSyntax, WindowHints};
use dicom::core::Tag;
use dicom::core::dictionary::UidDictionary;
use dicom::dictionary_std::sop_class;
use dicom::dictionary_std::tags;
use dicom::encoding::TransferSyntaxIndex;
use dicom::object::DefaultDicomObject;
use dicom::transfer_syntax::TransferSyntaxRegistry;

/// String value of an element with DICOM padding removed; empty values count as absent
pub fn text(obj: &DefaultDicomObject, tag: Tag) -> Option<String> {
    obj.get(tag)
        .and_then(|e| e.value().to_str().ok())
        .map(|s| s.trim_end_matches('\0').trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Integer String (IS) parsed from its textual form
pub fn integer(obj: &DefaultDicomObject, tag: Tag) -> Option<i32> {
    text(obj, tag).and_then(|s| s.parse::<i32>().ok())
}

/// Patient's Name rendered as "Family Given".
///
/// Falls back to the raw stored string when the components are all empty.
pub fn patient_name(obj: &DefaultDicomObject) -> Option<String> {
    let raw = text(obj, tags::PATIENT_NAME)?;
    decompose_person_name(&raw).or(Some(raw))
}

/// Join the family and given name components of a PN value
pub fn decompose_person_name(raw: &str) -> Option<String> {
    // Only the alphabetic representation (before the first '=') is used
    let alphabetic = raw.split('=').next().unwrap_or_default();
    let mut components = alphabetic.split('^').map(str::trim);
    let family = components.next().unwrap_or_default();
    let given = components.next().unwrap_or_default();

    let joined = format!("{family} {given}");
    let joined = joined.trim();
    (!joined.is_empty()).then(|| joined.to_string())
}

pub fn window_hints(obj: &DefaultDicomObject) -> WindowHints {
    let center = obj
        .get(tags::WINDOW_CENTER)
        .and_then(|e| e.to_multi_float64().ok())
        .unwrap_or_default();

    let width = obj
        .get(tags::WINDOW_WIDTH)
        .and_then(|e| e.to_multi_float64().ok())
        .unwrap_or_default();

    WindowHints::new(center, width)
}

pub fn extract_dimensions(obj: &DefaultDicomObject) -> Option<Dimensions> {
    let rows = obj.get(tags::ROWS).and_then(|e| e.to_int::<u32>().ok())?;
    let cols = obj.get(tags::COLUMNS).and_then(|e| e.to_int::<u32>().ok())?;
    Some(Dimensions::new(rows, cols))
}

pub fn extract_bit_depth(obj: &DefaultDicomObject) -> Option<BitDepth> {
    let allocated = obj
        .get(tags::BITS_ALLOCATED)
        .and_then(|e| e.to_int::<u16>().ok())?;

    let stored = obj
        .get(tags::BITS_STORED)
        .and_then(|e| e.to_int::<u16>().ok())
        .unwrap_or(allocated);

    Some(BitDepth::new(allocated, stored))
}

#[inline]
pub fn extract_pixel_representation(obj: &DefaultDicomObject) -> PixelRepresentation {
    obj.get(tags::PIXEL_REPRESENTATION)
        .and_then(|e| e.to_int::<u16>().ok())
        .map(PixelRepresentation::from_code)
        .unwrap_or_default()
}

#[inline]
pub fn extract_number_of_frames(obj: &DefaultDicomObject) -> u32 {
    obj.get(tags::NUMBER_OF_FRAMES)
        .and_then(|e| e.to_int::<u32>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(1)
}

#[inline]
pub fn extract_samples_per_pixel(obj: &DefaultDicomObject) -> u16 {
    obj.get(tags::SAMPLES_PER_PIXEL)
        .and_then(|e| e.to_int::<u16>().ok())
        .unwrap_or(1)
}

#[inline]
pub fn extract_planar_configuration(obj: &DefaultDicomObject) -> Option<u16> {
    obj.get(tags::PLANAR_CONFIGURATION)
        .and_then(|e| e.to_int::<u16>().ok())
}

pub fn extract_transfer_syntax(obj: &DefaultDicomObject) -> TransferSyntax {
    let uid = obj
        .meta()
        .transfer_syntax()
        .trim_end_matches('\0')
        .to_string();
    let name = TransferSyntaxRegistry
        .get(&uid)
        .map_or_else(|| "Unknown".to_string(), |ts| ts.name().to_string());

    TransferSyntax::new(uid, name)
}

pub fn extract_sop_class(obj: &DefaultDicomObject) -> Option<SOPClass> {
    let uid = text(obj, tags::SOP_CLASS_UID)?;
    let name = sop_class::StandardSopClassDictionary
        .by_uid(&uid)
        .map_or_else(|| "Unknown".to_string(), |entry| entry.name.to_string());
    Some(SOPClass::new(uid, name))
}
