//! Identity record extracted from a DICOM file

use super::parser;
use dicom::dictionary_std::tags;
use dicom::object::DefaultDicomObject;
use rand::Rng;

pub const UNKNOWN_PATIENT: &str = "Unknown Patient";
pub const UNREADABLE_PATIENT: &str = "Test Patient";
pub const DEFAULT_STUDY_DATE: &str = "20240101";
pub const DEFAULT_MODALITY: &str = "OT";
pub const DEFAULT_ORDINAL: i32 = 1;

/// Root shared by every synthesized UID
const SYNTHETIC_UID_ROOT: &str = "1.2.3";

/// Study/series/instance identity, always fully populated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub study_uid: String,
    pub series_uid: String,
    pub instance_uid: String,
    pub patient_name: String,
    /// `YYYYMMDD`
    pub study_date: String,
    pub series_number: i32,
    pub instance_number: i32,
    pub modality: String,
}

/// Hierarchy level of a synthesized UID; deeper levels get extra `.1` suffixes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UidLevel {
    Study,
    Series,
    Instance,
}

impl UidLevel {
    fn suffix(self) -> &'static str {
        match self {
            Self::Study => "",
            Self::Series => ".1",
            Self::Instance => ".1.1",
        }
    }
}

/// Pseudo-unique stand-in UID: `1.2.3.<nnnn>[.1[.1]]`
pub fn synthesize_uid<R: Rng + ?Sized>(rng: &mut R, level: UidLevel) -> String {
    let n: u16 = rng.random_range(1000..9999);
    format!("{SYNTHETIC_UID_ROOT}.{n}{}", level.suffix())
}

impl Descriptor {
    /// Descriptor for a file that could not be decoded at all
    pub fn unreadable<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            study_uid: synthesize_uid(rng, UidLevel::Study),
            series_uid: synthesize_uid(rng, UidLevel::Series),
            instance_uid: synthesize_uid(rng, UidLevel::Instance),
            patient_name: UNREADABLE_PATIENT.to_string(),
            study_date: DEFAULT_STUDY_DATE.to_string(),
            series_number: DEFAULT_ORDINAL,
            instance_number: DEFAULT_ORDINAL,
            modality: DEFAULT_MODALITY.to_string(),
        }
    }

    /// Read every field independently, substituting its default when the
    /// element is absent, empty or unparsable.
    pub fn from_object<R: Rng + ?Sized>(obj: &DefaultDicomObject, rng: &mut R) -> Self {
        let study_uid = parser::text(obj, tags::STUDY_INSTANCE_UID)
            .unwrap_or_else(|| synthesize_uid(rng, UidLevel::Study));
        let series_uid = parser::text(obj, tags::SERIES_INSTANCE_UID)
            .unwrap_or_else(|| synthesize_uid(rng, UidLevel::Series));
        let instance_uid = parser::text(obj, tags::SOP_INSTANCE_UID)
            .unwrap_or_else(|| synthesize_uid(rng, UidLevel::Instance));

        Self {
            study_uid,
            series_uid,
            instance_uid,
            patient_name: parser::patient_name(obj).unwrap_or_else(|| UNKNOWN_PATIENT.to_string()),
            study_date: parser::text(obj, tags::STUDY_DATE)
                .unwrap_or_else(|| DEFAULT_STUDY_DATE.to_string()),
            series_number: parser::integer(obj, tags::SERIES_NUMBER).unwrap_or(DEFAULT_ORDINAL),
            instance_number: parser::integer(obj, tags::INSTANCE_NUMBER).unwrap_or(DEFAULT_ORDINAL),
            modality: parser::text(obj, tags::MODALITY)
                .unwrap_or_else(|| DEFAULT_MODALITY.to_string()),
        }
    }

    /// True when the UID was made up by [`synthesize_uid`] rather than read
    #[must_use]
    pub fn is_synthetic_uid(uid: &str) -> bool {
        uid.strip_prefix(SYNTHETIC_UID_ROOT)
            .and_then(|rest| rest.strip_prefix('.'))
            .is_some_and(|rest| {
                let digits = rest.split('.').next().unwrap_or_default();
                digits.len() == 4 && digits.bytes().all(|b| b.is_ascii_digit())
            })
    }
}
