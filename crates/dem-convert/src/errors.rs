use std::path::PathBuf;

use grid_mesh::MeshError;
use raster_source::RasterError;
use stl_stream::StlError;
use terrain_types::Window;

/// Errors in conversion options.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("failed to read options file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse options: {0}")]
    Parse(String),

    #[error("stride must be at least 1")]
    ZeroStride,

    #[error("scale must be a finite number, got {scale}")]
    InvalidScale { scale: f64 },
}

/// Errors from a conversion run.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error("failed to sample raster window {window}: {source}")]
    Sample {
        window: Window,
        #[source]
        source: MeshError,
    },

    #[error("failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: StlError,
    },

    #[error("failed to encode STL: {0}")]
    Encode(#[from] StlError),
}
