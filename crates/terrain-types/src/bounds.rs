use serde::{Deserialize, Serialize};

/// A requested minimum or maximum along one raster axis.
///
/// Raw values follow a three-way rule: anything `>= 1.0` is an absolute
/// index, anything in `[0.0, 1.0)` is a fraction of the axis size, and
/// anything else (negative, NaN) means "not set". Serialized as the raw
/// number, or `null` when absent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum AxisBound {
    /// Fall back to the full extent on this side.
    #[default]
    Absent,
    /// Fraction of the axis size in `[0, 1)`.
    Fraction(f64),
    /// Absolute raster index (`>= 1`), truncated when resolved.
    Absolute(f64),
}

impl AxisBound {
    /// Classify a raw command-line style value.
    pub fn from_raw(value: f64) -> Self {
        if value >= 1.0 {
            AxisBound::Absolute(value)
        } else if value >= 0.0 {
            AxisBound::Fraction(value)
        } else {
            AxisBound::Absent
        }
    }

    /// The raw value this bound was built from, `None` when absent.
    pub fn to_raw(self) -> Option<f64> {
        match self {
            AxisBound::Absent => None,
            AxisBound::Fraction(v) | AxisBound::Absolute(v) => Some(v),
        }
    }

    /// Concrete index on an axis of `size` cells, `None` when absent.
    ///
    /// Truncates toward zero; no clamping against `size` is performed.
    pub fn index(self, size: usize) -> Option<usize> {
        match self {
            AxisBound::Absent => None,
            AxisBound::Fraction(f) => Some((f * size as f64) as usize),
            AxisBound::Absolute(a) => Some(a as usize),
        }
    }

    pub fn is_absent(self) -> bool {
        matches!(self, AxisBound::Absent)
    }
}

impl From<Option<f64>> for AxisBound {
    fn from(raw: Option<f64>) -> Self {
        raw.map_or(AxisBound::Absent, AxisBound::from_raw)
    }
}

impl From<AxisBound> for Option<f64> {
    fn from(bound: AxisBound) -> Self {
        bound.to_raw()
    }
}

/// Requested bounds for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisRequest {
    #[serde(default)]
    pub min: AxisBound,
    #[serde(default)]
    pub max: AxisBound,
}

impl AxisRequest {
    pub fn new(min: AxisBound, max: AxisBound) -> Self {
        Self { min, max }
    }

    /// Build from raw values, `-1.0` being the conventional "unset".
    pub fn from_raw(min: f64, max: f64) -> Self {
        Self {
            min: AxisBound::from_raw(min),
            max: AxisBound::from_raw(max),
        }
    }
}
