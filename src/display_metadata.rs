use crate::dicom::{Descriptor, SourceImage};
use crate::pipeline::Conversion;
use std::fmt::Display;

pub fn print_conversion(conversion: &Conversion) {
    print_descriptor(&conversion.descriptor);

    match &conversion.source {
        Some(source) => print_source(source),
        None => println!("{:20}: {}", "Source", "unreadable"),
    }

    println!("{:20}: {}", "Rendering", conversion.raster_origin);
    println!("{:20}: {}", "Image", conversion.image.path.display());
    println!("{:20}: {}", "Thumbnail", conversion.thumbnail.path().display());
    if conversion.thumbnail.is_degraded() {
        println!("{:20}: {}", "", "(full image, thumbnail failed)");
    }

    println!();
}

pub fn print_descriptor(descriptor: &Descriptor) {
    print_field("Patient Name", &descriptor.patient_name);
    print_field("Study Date", &descriptor.study_date);
    print_field("Modality", &descriptor.modality);
    print_field("Study UID", &descriptor.study_uid);
    print_field("Series UID", &descriptor.series_uid);
    print_field("Instance UID", &descriptor.instance_uid);
    print_field("Series Number", descriptor.series_number);
    print_field("Instance Number", descriptor.instance_number);
}

fn print_source(source: &SourceImage) {
    if let Some(dims) = source.dimensions {
        println!(
            "{:20}: {}x{} [{}]",
            "Dimensions", dims, source.samples_per_pixel, source.photometric_interpretation
        );
    }
    if source.number_of_frames > 1 {
        print_field("Frames", source.number_of_frames);
    }
    if let Some(bit_depth) = &source.bit_depth {
        println!("{:20}: {} {}", "Bit Depth", bit_depth, source.pixel_representation);
    }
    print_field("Window", &source.window);
    if let Some(sop_class) = &source.sop_class {
        print_field("SOP Class UID", sop_class);
    }
    if let Some(ts) = &source.transfer_syntax {
        print_field("Transfer Syntax", ts);
    }
    if !source.has_pixels() {
        print_field("Pixel Data", "not decodable");
    }
}

fn print_field(name: &str, value: impl Display) {
    println!("{name:20}: {value}");
}
