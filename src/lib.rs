//! glass-quote - Parametric piece calculation engine for custom-cut glass quotes.
//!
//! A typology describes a glass product through measurement variables and
//! pieces whose width and height are formulas over those variables. This
//! library evaluates the formulas safely, normalizes units to millimeters,
//! rounds dimensions up to the billing grid, aggregates areas and prices, and
//! walks the user through confirming each piece before a quote is recorded.
//!
//! # Example
//!
//! ```
//! use glass_quote::{calculate, CalcConfig, Piece, Typology, Unit, Variable, VariableInput};
//!
//! let typology = Typology::new("Porta de correr")
//!     .with_variable(Variable::new("Lv", "Largura do vão").with_unit(Unit::Centimeter))
//!     .with_variable(Variable::new("Av", "Altura do vão").with_unit(Unit::Centimeter))
//!     .with_piece(Piece::new("Folha", "Lv/2 - 15", "Av - 20"));
//!
//! let inputs = vec![
//!     VariableInput::new("Lv", Some(180.0), Unit::Centimeter),
//!     VariableInput::new("Av", Some(220.0), Unit::Centimeter),
//! ];
//!
//! let result = calculate(&typology, &inputs, &CalcConfig::default());
//! assert_eq!(result.pieces[0].width_billing_mm, 900.0);
//! assert_eq!(result.pieces[0].height_billing_mm, 2200.0);
//! ```

pub mod calculator;
pub mod config;
pub mod error;
pub mod expr;
pub mod loader;
pub mod model;
pub mod pricing;
pub mod quote;
pub mod report;
pub mod units;
pub mod validation;
pub mod workflow;

use std::path::Path;

// Re-exports for convenience
pub use calculator::calculate;
pub use config::{CalcConfig, Unit};
pub use error::{CalcError, CalcErrorKind, QuoteError, Result};
pub use expr::{evaluate, EvalError};
pub use loader::{load_inputs, load_typology};
pub use model::{
    CalculationResult, ComputedPiece, Material, Piece, TechnicalConfigSlot, Typology, Variable,
    VariableInput,
};
pub use pricing::price;
pub use quote::QuoteRecord;
pub use report::Report;
pub use units::{format_mm, from_mm, to_mm};
pub use validation::{validate_typology, ValidationResult};
pub use workflow::{ConfirmOutcome, ConfirmationFlow, SelectOutcome};

/// A typology, the inputs it was calculated with, and the outcome.
#[derive(Debug, Clone)]
pub struct Calculation {
    pub typology: Typology,
    pub inputs: Vec<VariableInput>,
    pub result: CalculationResult,
}

/// Load a typology and its inputs from disk and run the calculation.
///
/// The typology is validated first; validation warnings are logged, errors
/// abort with [`QuoteError::Validation`].
pub fn calculate_files(
    typology_path: &Path,
    inputs_path: &Path,
    config: &CalcConfig,
) -> Result<Calculation> {
    let typology = load_typology(typology_path)?;
    validation::quick_validate(&typology, config)?;

    let inputs = load_inputs(inputs_path)?;
    let result = calculate(&typology, &inputs, config);

    Ok(Calculation {
        typology,
        inputs,
        result,
    })
}
