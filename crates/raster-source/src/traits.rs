use terrain_types::Window;

use crate::stats::RasterStats;
use crate::types::RasterError;

/// Read access to band 1 of a height raster.
/// Implemented by TiffRaster (files on disk) and MemoryRaster (in-memory grids).
pub trait RasterSource {
    /// Number of columns.
    fn width(&self) -> usize;

    /// Number of rows.
    fn height(&self) -> usize;

    /// Read `width` x `height` samples starting at column `x_off`, row `y_off`,
    /// at native resolution. Row-major.
    fn read(
        &self,
        x_off: usize,
        y_off: usize,
        width: usize,
        height: usize,
    ) -> Result<Vec<f64>, RasterError>;

    /// Value marking missing samples, if the raster declares one.
    fn no_data_value(&self) -> Option<f64> {
        None
    }

    /// Read the samples covered by `window`.
    fn read_window(&self, window: &Window) -> Result<Vec<f64>, RasterError> {
        self.read(window.x_lo, window.y_lo, window.width(), window.height())
    }

    /// Exact min/max over the whole raster, skipping no-data and NaN samples.
    fn stats(&self) -> Result<RasterStats, RasterError> {
        let samples = self.read(0, 0, self.width(), self.height())?;
        Ok(RasterStats::compute(
            self.width(),
            self.height(),
            &samples,
            self.no_data_value(),
        ))
    }
}

impl<T: RasterSource + ?Sized> RasterSource for &T {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn height(&self) -> usize {
        (**self).height()
    }

    fn read(
        &self,
        x_off: usize,
        y_off: usize,
        width: usize,
        height: usize,
    ) -> Result<Vec<f64>, RasterError> {
        (**self).read(x_off, y_off, width, height)
    }

    fn no_data_value(&self) -> Option<f64> {
        (**self).no_data_value()
    }
}

/// Copy a sub-window out of a row-major grid that is `grid_width` wide.
///
/// Rejects windows that reach past the grid instead of clamping them.
pub(crate) fn copy_window(
    grid: &[f64],
    grid_width: usize,
    grid_height: usize,
    window: Window,
) -> Result<Vec<f64>, RasterError> {
    if !window.fits_within(grid_width, grid_height) {
        return Err(RasterError::WindowOutOfBounds {
            window,
            width: grid_width,
            height: grid_height,
        });
    }

    let mut out = Vec::with_capacity(window.width() * window.height());
    for row in window.y_lo..window.y_hi {
        let start = row * grid_width + window.x_lo;
        out.extend_from_slice(&grid[start..start + window.width()]);
    }
    Ok(out)
}
