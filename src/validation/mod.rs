//! Typology validation module.

mod validate;

pub use validate::{quick_validate, validate_typology, validate_variables, ValidationResult};
