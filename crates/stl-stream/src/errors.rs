use std::path::PathBuf;

/// Errors while writing an STL stream.
#[derive(Debug, thiserror::Error)]
pub enum StlError {
    #[error("failed to create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write STL data: {0}")]
    Write(#[from] std::io::Error),

    #[error("failed to seek to byte {offset}: {source}")]
    Seek {
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("binary STL cannot hold more than {} triangles", u32::MAX)]
    TooManyTriangles,

    #[error("STL stream ends in a partial record: {actual} bytes written, {committed} complete")]
    Torn { committed: u64, actual: u64 },

    #[error("STL stream already finalized")]
    Finalized,
}
