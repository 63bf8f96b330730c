use raster_source::RasterSource;
use terrain_types::Window;
use tracing::{debug, instrument, warn};

use crate::MeshError;

/// Samples taken every `stride` cells from a raster window.
///
/// Buffer cell `(row, col)` holds raster cell
/// `(x_lo + col * stride, y_lo + row * stride)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    values: Vec<f64>,
    width: usize,
    height: usize,
    x_lo: usize,
    y_lo: usize,
    stride: usize,
}

impl SampleBuffer {
    /// Read `window` from `source` in one go and decimate it by `stride`.
    ///
    /// A window with no sampled rows or columns yields an empty buffer
    /// without touching the source.
    #[instrument(skip(source, window), fields(window = %window))]
    pub fn read<S: RasterSource + ?Sized>(
        source: &S,
        window: Window,
        stride: usize,
    ) -> Result<Self, MeshError> {
        if stride == 0 {
            return Err(MeshError::ZeroStride);
        }

        let width = window.buffer_width(stride);
        let height = window.buffer_height(stride);
        if width == 0 || height == 0 {
            warn!(width, height, stride, "window yields an empty sample grid");
            return Ok(Self::empty(window, stride));
        }

        let native = source.read_window(&window)?;
        Self::from_native(&native, window, stride)
    }

    /// Decimate an already-read native-resolution window.
    pub fn from_native(native: &[f64], window: Window, stride: usize) -> Result<Self, MeshError> {
        if stride == 0 {
            return Err(MeshError::ZeroStride);
        }

        let native_width = window.width();
        let expected = native_width * window.height();
        if native.len() < expected {
            return Err(MeshError::ShortRead {
                expected,
                actual: native.len(),
            });
        }

        let width = window.buffer_width(stride);
        let height = window.buffer_height(stride);

        let mut values = Vec::with_capacity(width * height);
        for row in 0..height {
            let line = row * stride * native_width;
            values.extend((0..width).map(|col| native[line + col * stride]));
        }

        debug!(width, height, stride, "sampled grid");
        Ok(Self {
            values,
            width,
            height,
            x_lo: window.x_lo,
            y_lo: window.y_lo,
            stride,
        })
    }

    fn empty(window: Window, stride: usize) -> Self {
        Self {
            values: Vec::new(),
            width: window.buffer_width(stride),
            height: window.buffer_height(stride),
            x_lo: window.x_lo,
            y_lo: window.y_lo,
            stride,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sample at buffer `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.width + col]
    }

    /// Raster column of buffer column `col`.
    pub fn raster_x(&self, col: usize) -> usize {
        col * self.stride + self.x_lo
    }

    /// Raster row of buffer row `row`.
    pub fn raster_y(&self, row: usize) -> usize {
        row * self.stride + self.y_lo
    }
}
