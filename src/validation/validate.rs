//! Authoring-time validation of typology formulas.

use std::collections::HashSet;
use tracing::warn;

use crate::config::CalcConfig;
use crate::error::{QuoteError, Result};
use crate::expr::{evaluate, extract_identifiers, is_identifier, VariableMap};
use crate::model::{Piece, Typology};

/// Validation result with warnings.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Whether validation passed.
    pub passed: bool,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Error messages.
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Create a passing result.
    pub fn ok() -> Self {
        Self {
            passed: true,
            ..Default::default()
        }
    }

    /// Create a failing result with an error.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            errors: vec![message.into()],
            ..Default::default()
        }
    }

    /// Add a warning.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Add an error.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.passed = false;
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
        if !other.passed {
            self.passed = false;
        }
    }
}

/// Which formula of a piece is being checked.
#[derive(Debug, Clone, Copy)]
enum Dimension {
    Width,
    Height,
}

impl Dimension {
    fn label(self) -> &'static str {
        match self {
            Dimension::Width => "largura",
            Dimension::Height => "altura",
        }
    }

    fn formula(self, piece: &Piece) -> &str {
        match self {
            Dimension::Width => &piece.width_formula,
            Dimension::Height => &piece.height_formula,
        }
    }
}

/// Validate a typology before its formulas are saved.
pub fn validate_typology(typology: &Typology, config: &CalcConfig) -> ValidationResult {
    let mut result = validate_variables(typology);

    if typology.pieces.is_empty() {
        result.add_error("Tipologia sem peças cadastradas");
    }

    let names: HashSet<&str> = typology.variables.iter().map(|v| v.name.as_str()).collect();
    let probe: VariableMap = names
        .iter()
        .map(|name| (name.to_string(), config.probe_value_mm))
        .collect();

    for piece in typology.ordered_pieces() {
        for dimension in [Dimension::Width, Dimension::Height] {
            result.merge(validate_formula(piece, dimension, &names, &probe));
        }

        for (slot_idx, slot) in piece.technical_configurations.iter().enumerate() {
            if slot.category.trim().is_empty() {
                result.add_error(format!(
                    "Peça \"{}\": configuração técnica {} sem categoria",
                    piece.name,
                    slot_idx + 1
                ));
            }
        }
    }

    for variable in typology.ordered_variables() {
        let used = typology.pieces.iter().any(|p| {
            extract_identifiers(&p.width_formula).contains(&variable.name)
                || extract_identifiers(&p.height_formula).contains(&variable.name)
        });
        if !used {
            result.add_warning(format!(
                "Variável \"{}\" não é usada em nenhuma fórmula",
                variable.name
            ));
        }
    }

    for warning in &result.warnings {
        warn!("{}", warning);
    }

    result
}

/// Validate variable names: bare identifiers, unique within the typology.
pub fn validate_variables(typology: &Typology) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let mut seen = HashSet::new();

    for variable in &typology.variables {
        if !is_identifier(&variable.name) {
            result.add_error(format!(
                "Nome de variável inválido: \"{}\"",
                variable.name
            ));
        }
        if !seen.insert(variable.name.as_str()) {
            result.add_error(format!("Variável \"{}\" duplicada", variable.name));
        }
    }

    result
}

fn validate_formula(
    piece: &Piece,
    dimension: Dimension,
    names: &HashSet<&str>,
    probe: &VariableMap,
) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let formula = dimension.formula(piece);

    if formula.trim().is_empty() {
        result.add_error(format!(
            "Peça \"{}\": fórmula de {} vazia",
            piece.name,
            dimension.label()
        ));
        return result;
    }

    let mut undefined = false;
    for identifier in extract_identifiers(formula) {
        if !names.contains(identifier.as_str()) {
            undefined = true;
            result.add_error(format!(
                "Peça \"{}\": variável \"{}\" usada na fórmula de {} não está definida",
                piece.name,
                identifier,
                dimension.label()
            ));
        }
    }

    if !undefined {
        if let Err(e) = evaluate(formula, probe) {
            result.add_warning(format!(
                "Peça \"{}\": fórmula de {} falha com valores de teste: {}",
                piece.name,
                dimension.label(),
                e
            ));
        }
    }

    result
}

/// Validate and turn a failed result into an error.
pub fn quick_validate(typology: &Typology, config: &CalcConfig) -> Result<()> {
    let result = validate_typology(typology, config);

    if !result.passed {
        return Err(QuoteError::Validation {
            errors: result.errors,
        });
    }

    Ok(())
}
