use crate::image::ThumbnailSize;
use crate::pipeline::PipelineOptions;
use clap::Parser;
use std::path::PathBuf;

/// Convert DICOM files into 8-bit grayscale PNGs with thumbnails
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// DICOM file path(s) to convert
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Directory receiving `<instance_uid>.png` and `<instance_uid>_thumb.png`
    #[arg(short, long, value_name = "DIR", default_value = "static/images")]
    pub output_dir: PathBuf,

    /// Thumbnail edge length in pixels
    #[arg(short, long, value_name = "N", default_value_t = 48, value_parser = clap::value_parser!(u32).range(1..))]
    pub thumbnail_size: u32,

    /// Seed for synthesized identifiers and placeholder images
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Print the extracted descriptor and pixel attributes
    #[arg(short, long)]
    pub verbose: bool,

    /// Preview the rendered image in the terminal
    #[arg(short, long)]
    pub show: bool,

    /// Preview width in terminal columns
    #[arg(short = 'W', long)]
    pub width: Option<u32>,

    /// Preview height in terminal rows
    #[arg(short = 'H', long)]
    pub height: Option<u32>,
}

impl From<&Args> for PipelineOptions {
    fn from(args: &Args) -> Self {
        Self {
            thumbnail_size: ThumbnailSize::square(args.thumbnail_size),
            seed: args.seed,
        }
    }
}
