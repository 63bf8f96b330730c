use serde::{Deserialize, Serialize};

/// Size and elevation range of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterStats {
    #[serde(rename = "XSize")]
    pub x_size: usize,
    #[serde(rename = "YSize")]
    pub y_size: usize,
    /// Lowest valid sample, `None` when every sample is missing.
    #[serde(rename = "ZMin")]
    pub z_min: Option<f64>,
    #[serde(rename = "ZMax")]
    pub z_max: Option<f64>,
    #[serde(rename = "NoData", skip_serializing_if = "Option::is_none", default)]
    pub no_data: Option<f64>,
}

impl RasterStats {
    /// Scan `samples`, ignoring NaN and anything equal to `no_data`.
    pub fn compute(
        x_size: usize,
        y_size: usize,
        samples: &[f64],
        no_data: Option<f64>,
    ) -> Self {
        let mut range: Option<(f64, f64)> = None;
        for &z in samples {
            if z.is_nan() || no_data.is_some_and(|nd| z == nd) {
                continue;
            }
            range = Some(match range {
                None => (z, z),
                Some((lo, hi)) => (lo.min(z), hi.max(z)),
            });
        }

        Self {
            x_size,
            y_size,
            z_min: range.map(|r| r.0),
            z_max: range.map(|r| r.1),
            no_data,
        }
    }
}
