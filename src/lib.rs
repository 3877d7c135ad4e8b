pub mod cli;
pub mod dicom;
pub mod display;
pub mod display_metadata;
pub mod error;
pub mod image;
pub mod pipeline;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used items
pub use display_metadata::print_conversion;
pub use error::{EncodeError, NormalizeError, PipelineError};
pub use pipeline::{Conversion, PipelineOptions, process};
