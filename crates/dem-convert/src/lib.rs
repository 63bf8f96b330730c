//! Height raster to STL conversion.
//!
//! Ties the pieces together: resolve the requested window, sample the
//! raster once, stream points or triangles into an STL writer, and report
//! what was written.

pub mod errors;
pub mod options;
pub mod pipeline;

pub use errors::{ConvertError, OptionsError};
pub use options::{default_destination, ConvertOptions, DEFAULT_OUTPUT_NAME, DEFAULT_SCALE};
pub use pipeline::{convert, convert_file, convert_to_vec, raster_stats, ConvertReport};
