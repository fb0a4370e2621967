//! Configuration constants and settings for the calculation engine.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::units::UnitError;

/// Floating-point comparison epsilon.
pub const EPS: f64 = 0.0001;

/// Default billing grid: dimensions are charged in 50mm steps.
pub const DEFAULT_BILLING_GRID_MM: f64 = 50.0;

/// Synthetic value given to every variable when probing formulas at authoring time.
pub const DEFAULT_PROBE_VALUE_MM: f64 = 1000.0;

/// Square millimeters in one square meter.
pub const MM2_PER_M2: f64 = 1_000_000.0;

/// Conversion factor: centimeter to mm.
pub const CONV_CM_MM: f64 = 10.0;

/// Conversion factor: meter to mm.
pub const CONV_M_MM: f64 = 1000.0;

/// Unit of measurement for variable input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "mm")]
    Millimeter,
    #[serde(rename = "cm")]
    Centimeter,
    #[serde(rename = "m")]
    Meter,
}

impl Unit {
    /// All supported units, smallest first.
    pub const ALL: [Unit; 3] = [Unit::Millimeter, Unit::Centimeter, Unit::Meter];

    /// Get the conversion factor to convert from this unit to millimeters.
    pub fn to_mm_factor(&self) -> f64 {
        match self {
            Unit::Millimeter => 1.0,
            Unit::Centimeter => CONV_CM_MM,
            Unit::Meter => CONV_M_MM,
        }
    }

    /// Short symbol used in documents and display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Millimeter => "mm",
            Unit::Centimeter => "cm",
            Unit::Meter => "m",
        }
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mm" | "millimeter" | "milimetro" | "milímetro" => Ok(Unit::Millimeter),
            "cm" | "centimeter" | "centimetro" | "centímetro" => Ok(Unit::Centimeter),
            "m" | "meter" | "metro" => Ok(Unit::Meter),
            _ => Err(UnitError::Unknown {
                unit: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Calculation policy passed to the piece calculator and the formula validator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalcConfig {
    /// Billing grid step in mm; dimensions are rounded up to a multiple of it.
    pub billing_grid_mm: f64,
    /// Value given to every variable when probing formulas.
    pub probe_value_mm: f64,
}

impl Default for CalcConfig {
    fn default() -> Self {
        Self {
            billing_grid_mm: DEFAULT_BILLING_GRID_MM,
            probe_value_mm: DEFAULT_PROBE_VALUE_MM,
        }
    }
}

impl CalcConfig {
    /// Create a configuration with a custom billing grid.
    ///
    /// A grid that is not a finite positive number falls back to the default.
    pub fn with_grid(billing_grid_mm: f64) -> Self {
        let grid = if billing_grid_mm.is_finite() && billing_grid_mm > 0.0 {
            billing_grid_mm
        } else {
            tracing::warn!(
                "Billing grid {} is not usable, falling back to {}mm",
                billing_grid_mm,
                DEFAULT_BILLING_GRID_MM
            );
            DEFAULT_BILLING_GRID_MM
        };
        Self {
            billing_grid_mm: grid,
            ..Default::default()
        }
    }
}

/// Utility functions for floating-point comparisons.
pub mod float_cmp {
    use super::EPS;

    /// Check if two floats are approximately equal.
    #[inline]
    pub fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    /// Check if `value` is a whole multiple of `step` (within epsilon).
    #[inline]
    pub fn is_multiple_of(value: f64, step: f64) -> bool {
        let ratio = value / step;
        approx_eq(ratio, ratio.round())
    }
}
