//! TiffRaster — band 1 of a (Geo)TIFF file implementing RasterSource.
//!
//! The whole first image is decoded once at open; windows are served from
//! memory. Multi-sample images keep only their first channel.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use terrain_types::Window;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;
use tiff::ColorType;
use tracing::{debug, info, instrument};

use crate::traits::{copy_window, RasterSource};
use crate::types::RasterError;

/// GDAL stores the no-data value as ASCII text under this private tag.
const GDAL_NODATA_TAG: u16 = 42113;

/// Band 1 of a TIFF image, decoded to `f64`.
#[derive(Debug, Clone)]
pub struct TiffRaster {
    path: PathBuf,
    width: usize,
    height: usize,
    samples: Vec<f64>,
    no_data: Option<f64>,
}

impl TiffRaster {
    /// Open and decode the first image of the TIFF at `path`.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RasterError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| RasterError::Open {
            path: path.clone(),
            source,
        })?;

        let decode_err = |e: tiff::TiffError| RasterError::Decode {
            path: path.clone(),
            reason: e.to_string(),
        };

        let mut decoder = Decoder::new(BufReader::new(file))
            .map_err(decode_err)?
            .with_limits(Limits::unlimited());

        let (width, height) = decoder.dimensions().map_err(decode_err)?;
        let color = decoder.colortype().map_err(decode_err)?;
        let channels = channel_count(color).ok_or_else(|| RasterError::UnsupportedLayout {
            path: path.clone(),
            layout: format!("{color:?}"),
        })?;

        let no_data = read_no_data(&mut decoder);
        let image = decoder.read_image().map_err(decode_err)?;
        let samples = first_channel(image, channels).ok_or_else(|| {
            RasterError::UnsupportedLayout {
                path: path.clone(),
                layout: "unsupported sample format".to_string(),
            }
        })?;

        let (width, height) = (width as usize, height as usize);
        if samples.len() != width * height {
            return Err(RasterError::SizeMismatch {
                width,
                height,
                actual: samples.len(),
            });
        }

        info!(width, height, channels, ?no_data, "decoded raster band 1");
        Ok(Self {
            path,
            width,
            height,
            samples,
            no_data,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RasterSource for TiffRaster {
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
        debug!(%window, "reading raster window");
        copy_window(&self.samples, self.width, self.height, window)
    }

    fn no_data_value(&self) -> Option<f64> {
        self.no_data
    }
}

fn channel_count(color: ColorType) -> Option<usize> {
    match color {
        ColorType::Gray(_) => Some(1),
        ColorType::GrayA(_) => Some(2),
        ColorType::RGB(_) => Some(3),
        ColorType::RGBA(_) | ColorType::CMYK(_) => Some(4),
        _ => None,
    }
}

/// Missing or unparsable tags just mean "no no-data value".
fn read_no_data<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Option<f64> {
    let tag = Tag::from_u16_exhaustive(GDAL_NODATA_TAG);
    let text = decoder.find_tag(tag).ok()??.into_string().ok()?;
    text.trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .parse::<f64>()
        .ok()
}

/// Keep every `channels`-th sample, starting with the first.
fn first_channel(image: DecodingResult, channels: usize) -> Option<Vec<f64>> {
    fn pick<T: Into<f64>>(v: Vec<T>, channels: usize) -> Vec<f64> {
        v.into_iter().step_by(channels).map(Into::into).collect()
    }

    let samples = match image {
        DecodingResult::U8(v) => pick(v, channels),
        DecodingResult::U16(v) => pick(v, channels),
        DecodingResult::U32(v) => pick(v, channels),
        DecodingResult::U64(v) => v.into_iter().step_by(channels).map(|s| s as f64).collect(),
        DecodingResult::I8(v) => pick(v, channels),
        DecodingResult::I16(v) => pick(v, channels),
        DecodingResult::I32(v) => pick(v, channels),
        DecodingResult::I64(v) => v.into_iter().step_by(channels).map(|s| s as f64).collect(),
        DecodingResult::F32(v) => pick(v, channels),
        DecodingResult::F64(v) => pick(v, channels),
        #[allow(unreachable_patterns)]
        _ => return None,
    };
    Some(samples)
}
