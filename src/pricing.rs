//! Quote pricing: billed area times price per square meter.

use crate::error::{QuoteError, Result};
use crate::model::{CalculationResult, Material};

/// Price of `area_billing_m2` at `price_per_m2`.
///
/// Returns NaN when either input is not finite.
pub fn price(area_billing_m2: f64, price_per_m2: f64) -> f64 {
    if !area_billing_m2.is_finite() || !price_per_m2.is_finite() {
        return f64::NAN;
    }
    area_billing_m2 * price_per_m2
}

/// Price the billed total of `result` in `material`.
pub fn price_for_material(result: &CalculationResult, material: &Material) -> Result<f64> {
    checked_price(result.area_total_billing_m2, material.price_per_m2)
}

/// Like [`price`], but reports an unusable price as an error.
pub fn checked_price(area_billing_m2: f64, price_per_m2: f64) -> Result<f64> {
    let total = price(area_billing_m2, price_per_m2);
    if total.is_nan() || price_per_m2 < 0.0 {
        return Err(QuoteError::InvalidPrice {
            area_m2: area_billing_m2,
            price_per_m2,
        });
    }
    Ok(total)
}
