//! Billing grid rounding and area computation.

use crate::config::{float_cmp::approx_eq, MM2_PER_M2};

/// Round a dimension up to the next multiple of `grid_mm`.
///
/// Exact multiples are kept as they are; a value is never rounded down.
/// Values within `EPS` of a multiple snap to it.
#[inline]
pub fn round_up_to_grid(value_mm: f64, grid_mm: f64) -> f64 {
    let nearest = (value_mm / grid_mm).round() * grid_mm;
    if approx_eq(value_mm, nearest) {
        return nearest;
    }
    (value_mm / grid_mm).ceil() * grid_mm
}

/// Area in m² of a `width_mm` × `height_mm` rectangle.
#[inline]
pub fn area_m2(width_mm: f64, height_mm: f64) -> f64 {
    width_mm * height_mm / MM2_PER_M2
}
