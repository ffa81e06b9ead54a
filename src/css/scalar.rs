//! CSS scalar values for generated custom properties: a number plus a unit.

use std::fmt;

/// Unit suffix of a generated custom property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Pixels, `px`.
    Px,
    /// Seconds, `s`.
    Seconds,
    /// No suffix (opacity and similar).
    None,
}

impl Unit {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Seconds => "s",
            Self::None => "",
        }
    }
}

/// A number with a unit, e.g. `56px`, `0.2s`, `0.45`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scalar {
    pub value: f64,
    pub unit: Unit,
}

impl Scalar {
    /// Create a scalar in pixels.
    pub fn px(value: f64) -> Self {
        Self {
            value,
            unit: Unit::Px,
        }
    }

    /// Create a scalar in seconds.
    pub fn seconds(value: f64) -> Self {
        Self {
            value,
            unit: Unit::Seconds,
        }
    }

    /// Create a unitless scalar.
    pub fn plain(value: f64) -> Self {
        Self {
            value,
            unit: Unit::None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", format_number(self.value), self.unit.suffix())
    }
}

/// Format a number the way a browser prints it in CSS text: integral values
/// without a fractional part.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
