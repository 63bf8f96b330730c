use serde::{Deserialize, Serialize};
use std::fmt;

/// A concrete rectangular range of raster indices, `[lo, hi)` on each axis.
///
/// Nothing guarantees `lo <= hi` or that the range lies inside the raster;
/// sizes saturate at zero for inverted ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    pub x_lo: usize,
    pub x_hi: usize,
    pub y_lo: usize,
    pub y_hi: usize,
}

impl Window {
    pub fn new(x: (usize, usize), y: (usize, usize)) -> Self {
        Self {
            x_lo: x.0,
            x_hi: x.1,
            y_lo: y.0,
            y_hi: y.1,
        }
    }

    /// The whole of a `width` x `height` raster.
    pub fn full(width: usize, height: usize) -> Self {
        Self::new((0, width), (0, height))
    }

    pub fn width(&self) -> usize {
        self.x_hi.saturating_sub(self.x_lo)
    }

    pub fn height(&self) -> usize {
        self.y_hi.saturating_sub(self.y_lo)
    }

    /// Number of sampled columns at the given stride.
    pub fn buffer_width(&self, stride: usize) -> usize {
        self.width() / stride
    }

    /// Number of sampled rows at the given stride.
    pub fn buffer_height(&self, stride: usize) -> usize {
        self.height() / stride
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Whether the window lies within a `width` x `height` raster.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        self.x_lo <= self.x_hi && self.y_lo <= self.y_hi && self.x_hi <= width && self.y_hi <= height
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x [{}, {}) y [{}, {})",
            self.x_lo, self.x_hi, self.y_lo, self.y_hi
        )
    }
}
