pub mod bounds;
pub mod geometry;
pub mod window;

pub use bounds::*;
pub use geometry::*;
pub use window::*;
