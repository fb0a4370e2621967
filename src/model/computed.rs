//! Calculation output: computed pieces and aggregated totals.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::CalcError;

/// A piece with its dimensions resolved for one set of inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputedPiece {
    pub name: String,
    pub width_real_mm: f64,
    pub height_real_mm: f64,
    /// Width rounded up to the billing grid.
    pub width_billing_mm: f64,
    /// Height rounded up to the billing grid.
    pub height_billing_mm: f64,
    pub area_real_m2: f64,
    pub area_billing_m2: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Set by the confirmation workflow.
    #[serde(default)]
    pub confirmed: bool,
    /// Slot index → selected item id.
    #[serde(default)]
    pub selections: BTreeMap<usize, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_error: Option<String>,
}

impl ComputedPiece {
    /// Check if either formula failed for this piece.
    pub fn has_errors(&self) -> bool {
        self.width_error.is_some() || self.height_error.is_some()
    }
}

/// Result of one calculation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub pieces: Vec<ComputedPiece>,
    pub area_total_real_m2: f64,
    pub area_total_billing_m2: f64,
    pub errors: Vec<CalcError>,
}

impl CalculationResult {
    /// Create an empty result carrying a single error.
    pub fn failed(error: CalcError) -> Self {
        Self::failed_with(vec![error])
    }

    /// Create an empty result carrying `errors`.
    pub fn failed_with(errors: Vec<CalcError>) -> Self {
        Self {
            errors,
            ..Default::default()
        }
    }

    /// Check if the calculation produced no errors at all.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Check if an error aborted the calculation.
    pub fn has_fatal_error(&self) -> bool {
        self.errors.iter().any(|e| e.is_fatal())
    }

    /// Error messages, in the order they were raised.
    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }
}
