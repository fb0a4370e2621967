//! Length conversion between millimeters, centimeters and meters.
//!
//! Every length inside the engine is carried in millimeters. Conversion
//! failures are returned as [`UnitError`] values so callers on the
//! per-keystroke path can branch on them without unwinding.

use thiserror::Error;

use crate::config::Unit;

/// Placeholder rendered for values that cannot be displayed.
pub const INVALID_DISPLAY: &str = "-";

/// Unit conversion failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    #[error("Unidade \"{unit}\" não reconhecida")]
    Unknown { unit: String },

    #[error("Valor {value} não é um número finito")]
    NonFinite { value: f64 },

    #[error("Valor {value} é negativo")]
    Negative { value: f64 },
}

fn check_length(value: f64) -> Result<f64, UnitError> {
    if !value.is_finite() {
        return Err(UnitError::NonFinite { value });
    }
    if value < 0.0 {
        return Err(UnitError::Negative { value });
    }
    Ok(value)
}

/// Convert a length expressed in `unit` to millimeters.
pub fn to_mm(value: f64, unit: Unit) -> Result<f64, UnitError> {
    Ok(check_length(value)? * unit.to_mm_factor())
}

/// Convert a millimeter length to `unit`.
pub fn from_mm(value_mm: f64, unit: Unit) -> Result<f64, UnitError> {
    Ok(check_length(value_mm)? / unit.to_mm_factor())
}

/// Convert a length whose unit is still raw user text.
pub fn to_mm_raw(value: f64, unit: &str) -> Result<f64, UnitError> {
    to_mm(value, unit.parse()?)
}

/// Render a millimeter value in `unit` for display.
///
/// mm are shown as integers, cm with one decimal and m with three.
pub fn format_mm(value_mm: f64, unit: Unit) -> String {
    if !value_mm.is_finite() {
        return INVALID_DISPLAY.to_string();
    }
    let value = value_mm / unit.to_mm_factor();
    match unit {
        Unit::Millimeter => format!("{:.0} mm", value),
        Unit::Centimeter => format!("{:.1} cm", value),
        Unit::Meter => format!("{:.3} m", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::float_cmp::approx_eq;

    // ==================== to_mm tests ====================

    #[test]
    fn test_to_mm_factors() {
        assert_eq!(to_mm(885.0, Unit::Millimeter).unwrap(), 885.0);
        assert_eq!(to_mm(180.0, Unit::Centimeter).unwrap(), 1800.0);
        assert_eq!(to_mm(2.2, Unit::Meter).unwrap(), 2200.0);
        assert_eq!(to_mm(0.0, Unit::Meter).unwrap(), 0.0);
    }

    #[test]
    fn test_to_mm_rejects_negative() {
        assert_eq!(
            to_mm(-1.0, Unit::Centimeter),
            Err(UnitError::Negative { value: -1.0 })
        );
    }

    #[test]
    fn test_to_mm_rejects_non_finite() {
        assert!(matches!(
            to_mm(f64::NAN, Unit::Millimeter),
            Err(UnitError::NonFinite { .. })
        ));
        assert!(matches!(
            to_mm(f64::INFINITY, Unit::Meter),
            Err(UnitError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_to_mm_raw_unknown_unit() {
        assert_eq!(to_mm_raw(10.0, "cm").unwrap(), 100.0);
        assert_eq!(
            to_mm_raw(10.0, "in"),
            Err(UnitError::Unknown {
                unit: "in".to_string()
            })
        );
    }

    // ==================== from_mm tests ====================

    #[test]
    fn test_from_mm() {
        assert_eq!(from_mm(1800.0, Unit::Centimeter).unwrap(), 180.0);
        assert_eq!(from_mm(2200.0, Unit::Meter).unwrap(), 2.2);
        assert!(from_mm(-5.0, Unit::Millimeter).is_err());
    }

    #[test]
    fn test_round_trip() {
        let values = [0.0, 0.1, 1.0, 12.5, 180.0, 999.999, 123456.789];
        for unit in Unit::ALL {
            for v in values {
                let back = from_mm(to_mm(v, unit).unwrap(), unit).unwrap();
                assert!(approx_eq(back, v), "{} {} -> {}", v, unit, back);
            }
        }
    }

    // ==================== format_mm tests ====================

    #[test]
    fn test_format_mm() {
        assert_eq!(format_mm(885.0, Unit::Millimeter), "885 mm");
        assert_eq!(format_mm(885.0, Unit::Centimeter), "88.5 cm");
        assert_eq!(format_mm(885.0, Unit::Meter), "0.885 m");
        assert_eq!(format_mm(f64::NAN, Unit::Meter), INVALID_DISPLAY);
    }
}
