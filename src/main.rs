use anyhow::Result;
use clap::{CommandFactory, Parser};
use dcmpng::cli::Args;
use dcmpng::display;
use dcmpng::pipeline::{self, PipelineOptions};
use std::path::Path;

fn main() {
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if args.files.is_empty() {
        let _ = Args::command().print_help();
        println!();
        return;
    }

    let options = PipelineOptions::from(&args);
    let multiple_files = args.files.len() > 1;
    let mut any_failed = false;

    for (idx, file_path) in args.files.iter().enumerate() {
        if multiple_files {
            println!("{}", file_path.display());
        }

        if let Err(e) = process_file(file_path, &args, &options) {
            println!("Error: {e:#}");
            any_failed = true;
        }

        if multiple_files && idx < args.files.len() - 1 {
            println!();
        }
    }

    if any_failed {
        std::process::exit(1);
    }
}

/// Convert a single DICOM file and report the result
fn process_file(file_path: &Path, args: &Args, options: &PipelineOptions) -> Result<()> {
    let conversion = pipeline::process(file_path, &args.output_dir, options)?;

    if args.verbose {
        dcmpng::print_conversion(&conversion);
    } else {
        println!("{}", conversion.image.path.display());
    }

    if args.show {
        display::print_image(&conversion.image.path, args)?;
    }

    Ok(())
}
