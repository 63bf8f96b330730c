use std::path::PathBuf;

use terrain_types::Window;

/// Errors from opening or reading a height raster.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("failed to open raster {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode raster {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("unsupported sample layout in {}: {layout}", path.display())]
    UnsupportedLayout { path: PathBuf, layout: String },

    #[error("window {window} lies outside the {width}x{height} raster")]
    WindowOutOfBounds {
        window: Window,
        width: usize,
        height: usize,
    },

    #[error("raster data holds {actual} samples, expected {width}x{height}")]
    SizeMismatch {
        width: usize,
        height: usize,
        actual: usize,
    },
}
