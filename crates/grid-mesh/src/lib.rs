//! Height grid to surface geometry.
//!
//! - [`window`]: turn requested axis bounds into concrete index ranges
//! - [`sampler`]: read a window once and walk it with a stride
//! - [`builder`]: lazily emit points or triangles from the sampled grid

pub mod builder;
pub mod sampler;
pub mod window;

pub use builder::{build, emission_count, MeshIter, MeshMode};
pub use sampler::SampleBuffer;
pub use window::{resolve, resolve_window};

use raster_source::RasterError;

/// Errors while sampling a raster into a grid.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("stride must be at least 1")]
    ZeroStride,

    #[error("raster returned {actual} samples, expected {expected}")]
    ShortRead { expected: usize, actual: usize },

    #[error(transparent)]
    Raster(#[from] RasterError),
}
