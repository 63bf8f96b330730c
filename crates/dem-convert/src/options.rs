use std::path::{Path, PathBuf};

use grid_mesh::MeshMode;
use serde::{Deserialize, Serialize};
use terrain_types::{AxisRequest, StlEncoding};

use crate::errors::OptionsError;

/// Scale applied to all three axes unless told otherwise.
pub const DEFAULT_SCALE: f64 = 0.1;

/// File name used when no destination is given.
pub const DEFAULT_OUTPUT_NAME: &str = "Output.stl";

/// Everything a conversion needs besides the raster itself.
///
/// Every field has a default, so a JSON options file only needs the keys it
/// wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Output path; `None` means `Output.stl` next to the source.
    pub destination: Option<PathBuf>,
    /// Triangulate quads instead of writing one point per sample.
    pub render_faces: bool,
    pub encoding: StlEncoding,
    /// Multiplier for x, y and z alike.
    pub scale: f64,
    /// Column bounds.
    pub x: AxisRequest,
    /// Row bounds.
    pub y: AxisRequest,
    /// Keep every Nth row and column.
    pub stride: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            destination: None,
            render_faces: false,
            encoding: StlEncoding::Binary,
            scale: DEFAULT_SCALE,
            x: AxisRequest::default(),
            y: AxisRequest::default(),
            stride: 1,
        }
    }
}

impl ConvertOptions {
    /// Parse options from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        serde_json::from_str(json).map_err(|e| OptionsError::Parse(e.to_string()))
    }

    /// Read options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| OptionsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.stride == 0 {
            return Err(OptionsError::ZeroStride);
        }
        if !self.scale.is_finite() {
            return Err(OptionsError::InvalidScale { scale: self.scale });
        }
        Ok(())
    }

    pub fn mesh_mode(&self) -> MeshMode {
        MeshMode::from_render_faces(self.render_faces)
    }

    /// Where output for `source` goes.
    pub fn destination_for(&self, source: &Path) -> PathBuf {
        self.destination
            .clone()
            .unwrap_or_else(|| default_destination(source))
    }
}

/// `Output.stl` in the directory holding `source`.
pub fn default_destination(source: &Path) -> PathBuf {
    source
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(DEFAULT_OUTPUT_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use terrain_types::AxisBound;

    #[test]
    fn defaults_match_tool_defaults() {
        let o = ConvertOptions::default();
        assert_eq!(o.scale, 0.1);
        assert_eq!(o.stride, 1);
        assert!(!o.render_faces);
        assert_eq!(o.encoding, StlEncoding::Binary);
        assert!(o.x.min.is_absent() && o.x.max.is_absent());
        assert!(o.y.min.is_absent() && o.y.max.is_absent());
        assert!(o.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let o = ConvertOptions::from_json(
            r#"{ "render_faces": true, "encoding": "ascii", "x": { "min": 0.25 }, "stride": 4 }"#,
        )
        .unwrap();
        assert!(o.render_faces);
        assert_eq!(o.encoding, StlEncoding::Ascii);
        assert_eq!(o.x.min, AxisBound::Fraction(0.25));
        assert_eq!(o.x.max, AxisBound::Absent);
        assert_eq!(o.stride, 4);
        assert_eq!(o.scale, DEFAULT_SCALE);
    }

    #[test]
    fn json_round_trip() {
        let o = ConvertOptions {
            destination: Some(PathBuf::from("out/terrain.stl")),
            y: AxisRequest::from_raw(10.0, 0.5),
            ..ConvertOptions::default()
        };
        assert_eq!(ConvertOptions::from_json(&o.to_json()).unwrap(), o);
    }

    #[test]
    fn bad_json_is_parse_error() {
        let err = ConvertOptions::from_json("{ stride: }").unwrap_err();
        assert!(matches!(err, OptionsError::Parse(_)));
    }

    #[test]
    fn validate_rejects_zero_stride_and_nan_scale() {
        let zero = ConvertOptions {
            stride: 0,
            ..ConvertOptions::default()
        };
        assert!(matches!(zero.validate(), Err(OptionsError::ZeroStride)));

        let nan = ConvertOptions {
            scale: f64::NAN,
            ..ConvertOptions::default()
        };
        assert!(matches!(nan.validate(), Err(OptionsError::InvalidScale { .. })));

        let negative = ConvertOptions {
            scale: -1.0,
            ..ConvertOptions::default()
        };
        assert!(negative.validate().is_ok());
    }

    #[test]
    fn destination_defaults_next_to_source() {
        assert_eq!(
            default_destination(Path::new("/data/dem/n47.tif")),
            PathBuf::from("/data/dem/Output.stl")
        );
        assert_eq!(
            default_destination(Path::new("n47.tif")),
            PathBuf::from("Output.stl")
        );

        let explicit = ConvertOptions {
            destination: Some(PathBuf::from("/tmp/x.stl")),
            ..ConvertOptions::default()
        };
        assert_eq!(
            explicit.destination_for(Path::new("/data/n47.tif")),
            PathBuf::from("/tmp/x.stl")
        );
    }
}
