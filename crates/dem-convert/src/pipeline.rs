use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};

use grid_mesh::{build, emission_count, resolve_window, MeshError, MeshMode, SampleBuffer};
use raster_source::{RasterSource, RasterStats, TiffRaster};
use serde::Serialize;
use stl_stream::{StlError, StlWriter};
use terrain_types::{StlEncoding, Window};
use tracing::{debug, info, instrument, warn};

use crate::errors::ConvertError;
use crate::options::ConvertOptions;

/// What a conversion produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertReport {
    pub destination: PathBuf,
    /// Raster window that was sampled.
    pub window: Window,
    pub buffer_width: usize,
    pub buffer_height: usize,
    pub stride: usize,
    pub mode: MeshMode,
    pub encoding: StlEncoding,
    /// Records written, points included.
    pub triangles: u64,
}

impl ConvertReport {
    /// True when the bounds or stride left nothing to sample.
    pub fn is_empty(&self) -> bool {
        self.buffer_width == 0 || self.buffer_height == 0
    }
}

/// Convert `source` into an STL file at `destination`.
///
/// The raster is read before the file is created, so a raster error leaves
/// no output behind. Once the file exists it is always finalized, even when
/// writing a record fails.
#[instrument(skip(source, destination, options), fields(destination = %destination.display()))]
pub fn convert<S: RasterSource + ?Sized>(
    source: &S,
    destination: &Path,
    options: &ConvertOptions,
) -> Result<ConvertReport, ConvertError> {
    let (window, buffer) = sample(source, options)?;

    let output_error = |source: StlError| ConvertError::Output {
        path: destination.to_path_buf(),
        source,
    };
    let mut writer = StlWriter::create(destination, options.encoding).map_err(output_error)?;
    let triangles = stream(&mut writer, &buffer, options).map_err(output_error)?;
    drop(writer);

    let report = ConvertReport {
        destination: destination.to_path_buf(),
        window,
        buffer_width: buffer.width(),
        buffer_height: buffer.height(),
        stride: options.stride,
        mode: options.mesh_mode(),
        encoding: options.encoding,
        triangles,
    };
    info!(
        window = %report.window,
        width = report.buffer_width,
        height = report.buffer_height,
        triangles = report.triangles,
        encoding = ?report.encoding,
        "wrote STL"
    );
    Ok(report)
}

/// Convert `source` into STL bytes held in memory.
pub fn convert_to_vec<S: RasterSource + ?Sized>(
    source: &S,
    options: &ConvertOptions,
) -> Result<Vec<u8>, ConvertError> {
    let (_, buffer) = sample(source, options)?;
    let mut writer = StlWriter::new(Cursor::new(Vec::new()), options.encoding)?;
    stream(&mut writer, &buffer, options)?;
    Ok(writer.finish()?.into_inner())
}

/// Open a TIFF height raster and convert band 1 of it.
///
/// Output goes to `options.destination`, or `Output.stl` beside `path`.
#[instrument(skip(path, options), fields(path = %path.as_ref().display()))]
pub fn convert_file(
    path: impl AsRef<Path>,
    options: &ConvertOptions,
) -> Result<ConvertReport, ConvertError> {
    let path = path.as_ref();
    options.validate()?;

    let raster = TiffRaster::open(path)?;
    let stats = raster.stats()?;
    info!(
        width = stats.x_size,
        height = stats.y_size,
        z_min = ?stats.z_min,
        z_max = ?stats.z_max,
        no_data = ?stats.no_data,
        "opened raster"
    );

    convert(&raster, &options.destination_for(path), options)
}

/// Size and elevation range of band 1 of a TIFF file, without converting it.
pub fn raster_stats(path: impl AsRef<Path>) -> Result<RasterStats, ConvertError> {
    let raster = TiffRaster::open(path)?;
    Ok(raster.stats()?)
}

fn sample<S: RasterSource + ?Sized>(
    source: &S,
    options: &ConvertOptions,
) -> Result<(Window, SampleBuffer), ConvertError> {
    options.validate()?;

    let window = resolve_window(options.x, options.y, source.width(), source.height());
    let buffer = SampleBuffer::read(source, window, options.stride).map_err(|e| match e {
        MeshError::Raster(e) => ConvertError::Raster(e),
        source => ConvertError::Sample { window, source },
    })?;

    if buffer.width() == 0 || buffer.height() == 0 {
        warn!(
            window = %window,
            stride = options.stride,
            "bounds and stride select no samples, output will be empty"
        );
    }
    Ok((window, buffer))
}

/// Emit the mesh for `buffer` and finalize, even if emitting failed.
fn stream<W: Write + Seek>(
    writer: &mut StlWriter<W>,
    buffer: &SampleBuffer,
    options: &ConvertOptions,
) -> Result<u64, StlError> {
    let mode = options.mesh_mode();
    debug!(
        expected = emission_count(buffer.width(), buffer.height(), mode),
        mode = ?mode,
        "streaming mesh"
    );

    let streamed = writer.emit_all(build(buffer, options.scale, mode));
    let finalized = writer.finalize();
    streamed?;
    finalized
}
