//! MemoryRaster — an in-memory height grid implementing RasterSource.
//!
//! Deterministic and file-free; used by the pipeline tests and by callers
//! that already hold their samples.

use terrain_types::Window;

use crate::traits::{copy_window, RasterSource};
use crate::types::RasterError;

/// Row-major grid of samples held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryRaster {
    width: usize,
    height: usize,
    samples: Vec<f64>,
    no_data: Option<f64>,
}

impl MemoryRaster {
    /// Wrap `samples`, which must hold exactly `width * height` values.
    pub fn new(width: usize, height: usize, samples: Vec<f64>) -> Result<Self, RasterError> {
        if samples.len() != width * height {
            return Err(RasterError::SizeMismatch {
                width,
                height,
                actual: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples,
            no_data: None,
        })
    }

    /// Build a grid by evaluating `f(column, row)` at every cell.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut samples = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                samples.push(f(col, row));
            }
        }
        Self {
            width,
            height,
            samples,
            no_data: None,
        }
    }

    pub fn with_no_data(mut self, value: f64) -> Self {
        self.no_data = Some(value);
        self
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}

impl RasterSource for MemoryRaster {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn read(
        &self,
        x_off: usize,
        y_off: usize,
        width: usize,
        height: usize,
    ) -> Result<Vec<f64>, RasterError> {
        let window = Window::new((x_off, x_off + width), (y_off, y_off + height));
        copy_window(&self.samples, self.width, self.height, window)
    }

    fn no_data_value(&self) -> Option<f64> {
        self.no_data
    }
}
