//! DICOM and raster fixtures written to temporary directories

use dicom::core::{DataElement, PrimitiveValue, Tag, VR};
use dicom::dictionary_std::{tags, uids};
use dicom::encoding::TransferSyntaxIndex;
use dicom::object::{FileMetaTableBuilder, InMemDicomObject};
use dicom::transfer_syntax::{TransferSyntaxRegistry, entries};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Builder for small, uncompressed DICOM files
pub struct DicomFixture {
    obj: InMemDicomObject,
    transfer_syntax: &'static str,
}

impl DicomFixture {
    /// Secondary capture object with identity attributes but no image
    pub fn without_pixels() -> Self {
        let mut fixture = Self {
            obj: InMemDicomObject::new_empty(),
            transfer_syntax: uids::EXPLICIT_VR_LITTLE_ENDIAN,
        };
        fixture.put_str(tags::SOP_CLASS_UID, VR::UI, uids::SECONDARY_CAPTURE_IMAGE_STORAGE);
        fixture.put_str(tags::SOP_INSTANCE_UID, VR::UI, "1.2.826.0.1.3680043.2.1125.1");
        fixture
    }

    pub fn grayscale_u8(rows: u16, cols: u16, samples: Vec<u8>) -> Self {
        Self::without_pixels()
            .image_pixel(rows, cols, 8, 0)
            .pixel_data(VR::OB, PrimitiveValue::U8(samples.into()))
    }

    pub fn grayscale_u16(rows: u16, cols: u16, samples: Vec<u16>) -> Self {
        Self::without_pixels()
            .image_pixel(rows, cols, 16, 0)
            .pixel_data(VR::OW, PrimitiveValue::U16(samples.into()))
    }

    pub fn grayscale_i16(rows: u16, cols: u16, samples: Vec<i16>) -> Self {
        let raw: Vec<u16> = samples.into_iter().map(|s| s as u16).collect();
        Self::without_pixels()
            .image_pixel(rows, cols, 16, 1)
            .pixel_data(VR::OW, PrimitiveValue::U16(raw.into()))
    }

    /// 16-bit samples kept as an OB byte stream in the file's byte order
    pub fn grayscale_u16_bytes(rows: u16, cols: u16, bytes: Vec<u8>) -> Self {
        Self::without_pixels()
            .image_pixel(rows, cols, 16, 0)
            .pixel_data(VR::OB, PrimitiveValue::U8(bytes.into()))
    }

    pub fn grayscale_u32(rows: u16, cols: u16, samples: Vec<u32>) -> Self {
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        Self::without_pixels()
            .image_pixel(rows, cols, 32, 0)
            .pixel_data(VR::OB, PrimitiveValue::U8(bytes.into()))
    }

    /// Three 8-bit planes, Y first, as PlanarConfiguration 1
    pub fn ybr_planar_u8(rows: u16, cols: u16, planes: Vec<u8>) -> Self {
        let mut fixture = Self::without_pixels().image_pixel(rows, cols, 8, 0);
        fixture.put_us(tags::SAMPLES_PER_PIXEL, 3);
        fixture.put_str(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, "YBR_FULL");
        fixture.put_us(tags::PLANAR_CONFIGURATION, 1);
        fixture.pixel_data(VR::OB, PrimitiveValue::U8(planes.into()))
    }

    fn image_pixel(mut self, rows: u16, cols: u16, bits: u16, representation: u16) -> Self {
        self.put_us(tags::ROWS, rows);
        self.put_us(tags::COLUMNS, cols);
        self.put_us(tags::SAMPLES_PER_PIXEL, 1);
        self.put_str(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, "MONOCHROME2");
        self.put_us(tags::BITS_ALLOCATED, bits);
        self.put_us(tags::BITS_STORED, bits);
        self.put_us(tags::HIGH_BIT, bits - 1);
        self.put_us(tags::PIXEL_REPRESENTATION, representation);
        self
    }

    fn pixel_data(mut self, vr: VR, value: PrimitiveValue) -> Self {
        self.obj.put(DataElement::new(tags::PIXEL_DATA, vr, value));
        self
    }

    pub fn transfer_syntax(mut self, uid: &'static str) -> Self {
        self.transfer_syntax = uid;
        self
    }

    pub fn big_endian(self) -> Self {
        #[allow(deprecated)]
        let uid = entries::EXPLICIT_VR_BIG_ENDIAN.uid();
        self.transfer_syntax(uid)
    }

    pub fn samples_per_pixel(mut self, samples_per_pixel: u16) -> Self {
        self.put_us(tags::SAMPLES_PER_PIXEL, samples_per_pixel);
        self
    }

    pub fn frames(mut self, frames: u32) -> Self {
        self.put_str(tags::NUMBER_OF_FRAMES, VR::IS, &frames.to_string());
        self
    }

    pub fn patient_name(mut self, name: &str) -> Self {
        self.put_str(tags::PATIENT_NAME, VR::PN, name);
        self
    }

    pub fn identity(mut self, study: &str, series: &str, instance: &str) -> Self {
        self.put_str(tags::STUDY_INSTANCE_UID, VR::UI, study);
        self.put_str(tags::SERIES_INSTANCE_UID, VR::UI, series);
        self.put_str(tags::SOP_INSTANCE_UID, VR::UI, instance);
        self
    }

    pub fn study_date(mut self, date: &str) -> Self {
        self.put_str(tags::STUDY_DATE, VR::DA, date);
        self
    }

    pub fn modality(mut self, modality: &str) -> Self {
        self.put_str(tags::MODALITY, VR::CS, modality);
        self
    }

    pub fn ordinals(mut self, series_number: &str, instance_number: &str) -> Self {
        self.put_str(tags::SERIES_NUMBER, VR::IS, series_number);
        self.put_str(tags::INSTANCE_NUMBER, VR::IS, instance_number);
        self
    }

    pub fn window(mut self, centers: &[&str], widths: &[&str]) -> Self {
        self.put_strs(tags::WINDOW_CENTER, centers);
        self.put_strs(tags::WINDOW_WIDTH, widths);
        self
    }

    /// Write with a preamble and a file meta group
    pub fn write(self, dir: &Path, name: &str) -> PathBuf {
        let instance_uid = self
            .obj
            .get(tags::SOP_INSTANCE_UID)
            .and_then(|e| e.value().to_str().ok())
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "1.2.826.0.1.3680043.2.1125.1".to_string());

        let file = self
            .obj
            .with_meta(
                FileMetaTableBuilder::new()
                    .transfer_syntax(self.transfer_syntax)
                    .media_storage_sop_class_uid(uids::SECONDARY_CAPTURE_IMAGE_STORAGE)
                    .media_storage_sop_instance_uid(instance_uid),
            )
            .expect("valid file meta group");

        let path = dir.join(name);
        file.write_to_file(&path).expect("fixture written");
        path
    }

    /// Write the data set alone, without preamble or file meta group
    pub fn write_bare(self, dir: &Path, name: &str) -> PathBuf {
        let ts = TransferSyntaxRegistry
            .get(self.transfer_syntax)
            .expect("registered transfer syntax");
        let path = dir.join(name);
        let file = File::create(&path).expect("fixture created");
        self.obj.write_dataset_with_ts(file, ts).expect("bare data set written");
        path
    }

    fn put_str(&mut self, tag: Tag, vr: VR, value: &str) {
        self.obj.put(DataElement::new(tag, vr, PrimitiveValue::from(value)));
    }

    fn put_strs(&mut self, tag: Tag, values: &[&str]) {
        let values: Vec<String> = values.iter().map(|s| s.to_string()).collect();
        self.obj
            .put(DataElement::new(tag, VR::DS, PrimitiveValue::Strs(values.into())));
    }

    fn put_us(&mut self, tag: Tag, value: u16) {
        self.obj.put(DataElement::new(tag, VR::US, PrimitiveValue::from(value)));
    }
}

/// A file that no DICOM reader accepts
pub fn write_garbage(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"this is not a DICOM file, just some text").expect("garbage written");
    path
}

/// A gray image of the given size with a left-to-right gradient
pub fn gradient_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let image = image::GrayImage::from_fn(width, height, |x, _| {
        image::Luma([(x * 255 / width.max(1)) as u8])
    });
    let path = dir.join(name);
    image.save(&path).expect("gradient written");
    path
}
