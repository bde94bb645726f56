//! Capacity units and conversion.
//!
//! # Design
//! - GB is the base unit; every conversion normalises through it.
//! - Scale factors are decimal (1 TB = 1000 GB), matching the backend export.
//! - Display units are a presentation choice and never change stored values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Capacity unit used for on-screen magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DisplayUnit {
    /// Gigabytes (base unit).
    #[serde(rename = "GB")]
    Gb,
    /// Terabytes.
    #[default]
    #[serde(rename = "TB")]
    Tb,
    /// Petabytes.
    #[serde(rename = "PB")]
    Pb,
}

impl DisplayUnit {
    /// All units in toggle order.
    pub const ALL: [Self; 3] = [Self::Gb, Self::Tb, Self::Pb];

    /// Number of GB in one unit.
    #[must_use]
    pub const fn factor(self) -> f64 {
        match self {
            Self::Gb => 1.0,
            Self::Tb => 1_000.0,
            Self::Pb => 1_000_000.0,
        }
    }

    /// Short label (`GB`, `TB`, `PB`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gb => "GB",
            Self::Tb => "TB",
            Self::Pb => "PB",
        }
    }

    /// Parse a unit label, treating anything unrecognised as GB.
    ///
    /// Conversions through an unknown unit therefore pass the magnitude
    /// through unchanged relative to GB.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or(Self::Gb)
    }
}

impl fmt::Display for DisplayUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raised when a unit label is not one of `GB`, `TB`, `PB`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown capacity unit '{value}' (expected GB, TB or PB)")]
pub struct UnitParseError {
    /// Rejected input.
    pub value: String,
}

impl FromStr for DisplayUnit {
    type Err = UnitParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "GB" => Ok(Self::Gb),
            "TB" => Ok(Self::Tb),
            "PB" => Ok(Self::Pb),
            _ => Err(UnitParseError {
                value: value.to_string(),
            }),
        }
    }
}

/// Convert `value` expressed in `from` into `to`.
#[must_use]
pub fn convert(value: f64, from: DisplayUnit, to: DisplayUnit) -> f64 {
    if from == to {
        return value;
    }
    value * from.factor() / to.factor()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(left: f64, right: f64) -> bool {
        let scale = left.abs().max(right.abs()).max(1.0);
        (left - right).abs() <= scale * 1e-12
    }

    #[test]
    fn conversions_use_decimal_factors() {
        assert!(approx_eq(convert(1.0, DisplayUnit::Tb, DisplayUnit::Gb), 1_000.0));
        assert!(approx_eq(convert(2.5, DisplayUnit::Pb, DisplayUnit::Tb), 2_500.0));
        assert!(approx_eq(convert(500.0, DisplayUnit::Gb, DisplayUnit::Tb), 0.5));
        assert!(approx_eq(convert(1.0, DisplayUnit::Gb, DisplayUnit::Pb), 0.000_001));
    }

    #[test]
    fn identity_conversion_is_exact() {
        for unit in DisplayUnit::ALL {
            for value in [0.0, 1.0, 123.456, 9_999_999.99] {
                assert_eq!(convert(value, unit, unit).to_bits(), value.to_bits());
            }
        }
    }

    #[test]
    fn round_trip_returns_original_within_rounding() {
        let samples = [0.0, 0.001, 1.0, 42.42, 150.0, 1_234_567.891];
        for from in DisplayUnit::ALL {
            for to in DisplayUnit::ALL {
                for value in samples {
                    let back = convert(convert(value, from, to), to, from);
                    assert!(approx_eq(back, value), "{value} via {from}->{to} gave {back}");
                }
            }
        }
    }

    #[test]
    fn parsing_is_case_insensitive_and_lenient_falls_back_to_gb() {
        assert_eq!("tb".parse::<DisplayUnit>(), Ok(DisplayUnit::Tb));
        assert_eq!(" PB ".parse::<DisplayUnit>(), Ok(DisplayUnit::Pb));
        assert!("EB".parse::<DisplayUnit>().is_err());
        assert_eq!(DisplayUnit::parse_lenient("EB"), DisplayUnit::Gb);
        assert_eq!(DisplayUnit::parse_lenient("pb"), DisplayUnit::Pb);
    }

    #[test]
    fn default_display_unit_is_terabytes() {
        assert_eq!(DisplayUnit::default(), DisplayUnit::Tb);
        assert_eq!(DisplayUnit::Tb.to_string(), "TB");
    }
}
