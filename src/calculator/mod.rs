//! Piece calculation: turns a typology plus user inputs into priced-ready pieces.

mod billing;

pub use billing::{area_m2, round_up_to_grid};

use tracing::{debug, warn};

use crate::config::{CalcConfig, Unit};
use crate::error::CalcError;
use crate::expr::{evaluate, VariableMap};
use crate::model::{CalculationResult, ComputedPiece, Piece, Typology, VariableInput};
use crate::units::to_mm;

/// Calculate every piece of `typology` for the given inputs.
///
/// Structural and variable errors abort the run and return no pieces. Formula
/// errors are local to their piece: the failing dimension is reported as 0 and
/// the other pieces are still computed.
pub fn calculate(
    typology: &Typology,
    inputs: &[VariableInput],
    config: &CalcConfig,
) -> CalculationResult {
    if typology.pieces.is_empty() {
        warn!("Typology '{}' has no pieces", typology.name);
        return CalculationResult::failed(CalcError::no_pieces());
    }

    if inputs.is_empty() && !typology.variables.is_empty() {
        warn!(
            "Typology '{}' declares {} variable(s) but no input was given",
            typology.name,
            typology.variables.len()
        );
        return CalculationResult::failed(CalcError::missing_inputs());
    }

    let variables_mm = match convert_inputs(typology, inputs) {
        Ok(map) => map,
        Err(errors) => {
            warn!(
                "Calculation of '{}' aborted: {} invalid variable(s)",
                typology.name,
                errors.len()
            );
            return CalculationResult::failed_with(errors);
        }
    };

    let mut result = CalculationResult::default();
    for (index, piece) in typology.ordered_pieces().into_iter().enumerate() {
        let computed = compute_piece(index, piece, &variables_mm, config, &mut result.errors);
        result.area_total_real_m2 += computed.area_real_m2;
        result.area_total_billing_m2 += computed.area_billing_m2;
        result.pieces.push(computed);
    }

    debug!(
        "Typology '{}': {} piece(s), {:.4} m² real, {:.4} m² billed",
        typology.name,
        result.pieces.len(),
        result.area_total_real_m2,
        result.area_total_billing_m2
    );

    result
}

/// Convert every input to millimeters.
///
/// Blank unit text falls back to the variable's default unit. An empty value
/// is only accepted for variables the typology marks as optional. Required
/// variables without any input are reported as missing.
pub fn convert_inputs(
    typology: &Typology,
    inputs: &[VariableInput],
) -> Result<VariableMap, Vec<CalcError>> {
    let mut variables_mm = VariableMap::new();
    let mut errors = Vec::new();

    for input in inputs {
        let variable = typology.find_variable(&input.name);

        let Some(value) = input.value else {
            if variable.is_some_and(|v| !v.required) {
                continue;
            }
            errors.push(CalcError::invalid_variable(&input.name));
            continue;
        };

        let unit = if input.unit.trim().is_empty() {
            variable.map(|v| Ok(v.default_unit))
        } else {
            Some(input.unit.parse::<Unit>())
        };

        match unit.map(|u| u.and_then(|u| to_mm(value, u))) {
            Some(Ok(mm)) => {
                variables_mm.insert(input.name.clone(), mm);
            }
            Some(Err(e)) => {
                debug!("Variable '{}' rejected: {}", input.name, e);
                errors.push(CalcError::invalid_variable(&input.name));
            }
            None => errors.push(CalcError::invalid_variable(&input.name)),
        }
    }

    for variable in typology.ordered_variables() {
        if variable.required && !inputs.iter().any(|i| i.name == variable.name) {
            errors.push(CalcError::missing_variable(&variable.name));
        }
    }

    if errors.is_empty() {
        Ok(variables_mm)
    } else {
        Err(errors)
    }
}

fn compute_piece(
    index: usize,
    piece: &Piece,
    variables_mm: &VariableMap,
    config: &CalcConfig,
    errors: &mut Vec<CalcError>,
) -> ComputedPiece {
    let (width_real_mm, width_error) = match evaluate(&piece.width_formula, variables_mm) {
        Ok(v) => (v, None),
        Err(e) => {
            errors.push(CalcError::width_formula(index, &piece.name, &e));
            (0.0, Some(e.to_string()))
        }
    };
    let (height_real_mm, height_error) = match evaluate(&piece.height_formula, variables_mm) {
        Ok(v) => (v, None),
        Err(e) => {
            errors.push(CalcError::height_formula(index, &piece.name, &e));
            (0.0, Some(e.to_string()))
        }
    };

    let width_billing_mm = round_up_to_grid(width_real_mm, config.billing_grid_mm);
    let height_billing_mm = round_up_to_grid(height_real_mm, config.billing_grid_mm);

    debug!(
        "Piece {} '{}': {}x{} mm real, {}x{} mm billed",
        index + 1,
        piece.name,
        width_real_mm,
        height_real_mm,
        width_billing_mm,
        height_billing_mm
    );

    ComputedPiece {
        name: piece.name.clone(),
        width_real_mm,
        height_real_mm,
        width_billing_mm,
        height_billing_mm,
        area_real_m2: area_m2(width_real_mm, height_real_mm),
        area_billing_m2: area_m2(width_billing_mm, height_billing_mm),
        image_url: piece.image_url.clone(),
        width_error,
        height_error,
        ..Default::default()
    }
}
