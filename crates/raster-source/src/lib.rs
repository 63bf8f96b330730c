pub mod memory;
pub mod stats;
pub mod tiff_raster;
pub mod traits;
pub mod types;

pub use memory::MemoryRaster;
pub use stats::RasterStats;
pub use tiff_raster::TiffRaster;
pub use traits::*;
pub use types::*;
