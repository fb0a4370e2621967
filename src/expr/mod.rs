//! Formula evaluation over millimeter variables.
//!
//! Pipeline: substitute variables → strip whitespace → reject leftovers and
//! foreign characters → lex → parse → evaluate → range check.

mod ast;
mod lexer;
mod parser;
mod substitute;

pub use ast::{BinaryOp, Expr};
pub use lexer::{tokenize, Token};
pub use parser::{parse_formula, MAX_DEPTH};
pub use substitute::{extract_identifiers, is_identifier, substitute_variables};

use std::collections::HashMap;
use thiserror::Error;

/// Variable name → value in millimeters.
pub type VariableMap = HashMap<String, f64>;

/// Formula evaluation failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("Fórmula vazia")]
    Empty,

    #[error("Variável \"{name}\" não definida")]
    UnresolvedIdentifier { name: String },

    #[error("Caractere inválido na fórmula: '{ch}'")]
    InvalidCharacter { ch: char },

    #[error("Fórmula malformada: {message}")]
    Parse { message: String },

    #[error("Resultado da fórmula não é um número finito")]
    NonFinite,

    #[error("Resultado da fórmula é negativo ({value})")]
    Negative { value: f64 },
}

/// Characters allowed once variables have been substituted.
fn is_arithmetic_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-' | '*' | '/' | '(' | ')')
}

/// Evaluate `formula` with every variable resolved from `variables_mm`.
///
/// The result is a length component, so it must be finite and non-negative.
pub fn evaluate(formula: &str, variables_mm: &VariableMap) -> Result<f64, EvalError> {
    if formula.trim().is_empty() {
        return Err(EvalError::Empty);
    }

    let substituted = substitute_variables(formula, variables_mm);
    let compact: String = substituted.chars().filter(|c| !c.is_whitespace()).collect();

    if let Some(name) = extract_identifiers(&compact).into_iter().next() {
        return Err(EvalError::UnresolvedIdentifier { name });
    }
    if let Some(ch) = compact.chars().find(|c| !is_arithmetic_char(*c)) {
        return Err(EvalError::InvalidCharacter { ch });
    }

    let value = parse_formula(&compact)?.eval();

    if !value.is_finite() {
        return Err(EvalError::NonFinite);
    }
    if value < 0.0 {
        return Err(EvalError::Negative { value });
    }
    // -0.0 displays as "-0"
    Ok(value + 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, f64)]) -> VariableMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    // ==================== evaluate success tests ====================

    #[test]
    fn test_evaluate_longest_name_first() {
        let v = vars(&[("L", 100.0), ("Lv", 200.0)]);
        assert_eq!(evaluate("Lv - 15", &v), Ok(185.0));
        assert_eq!(evaluate("L + Lv", &v), Ok(300.0));
    }

    #[test]
    fn test_evaluate_half_width() {
        let v = vars(&[("Lv", 1800.0), ("Av", 2200.0)]);
        assert_eq!(evaluate("Lv/2 - 15", &v), Ok(885.0));
        assert_eq!(evaluate("Av - 20", &v), Ok(2180.0));
    }

    #[test]
    fn test_evaluate_constant_and_scientific() {
        let v = VariableMap::new();
        assert_eq!(evaluate("1.5e3", &v), Ok(1500.0));
        assert_eq!(evaluate(" 2 * ( 3 + 4 ) ", &v), Ok(14.0));
    }

    #[test]
    fn test_evaluate_zero_is_valid() {
        let v = vars(&[("Lv", 100.0)]);
        assert_eq!(evaluate("Lv - 100", &v), Ok(0.0));
        assert!(evaluate("-0", &v).unwrap().is_sign_positive());
    }

    // ==================== evaluate failure tests ====================

    #[test]
    fn test_evaluate_empty() {
        assert_eq!(evaluate("  ", &VariableMap::new()), Err(EvalError::Empty));
    }

    #[test]
    fn test_evaluate_negative_rejected() {
        let v = vars(&[("Lv", 1000.0)]);
        assert_eq!(
            evaluate("Lv - 10000", &v),
            Err(EvalError::Negative { value: -9000.0 })
        );
    }

    #[test]
    fn test_evaluate_unresolved_identifier() {
        let v = vars(&[("Lv", 1000.0)]);
        assert_eq!(
            evaluate("Lv + Hx", &v),
            Err(EvalError::UnresolvedIdentifier {
                name: "Hx".to_string()
            })
        );
    }

    #[test]
    fn test_evaluate_rejects_code() {
        let v = vars(&[("Lv", 1000.0)]);
        assert!(matches!(
            evaluate("Lv; process.exit()", &v),
            Err(EvalError::UnresolvedIdentifier { .. })
        ));
        assert_eq!(
            evaluate("Lv % 3", &v),
            Err(EvalError::InvalidCharacter { ch: '%' })
        );
        assert_eq!(
            evaluate("Lv ** 2", &v).map_err(|e| matches!(e, EvalError::Parse { .. })),
            Err(true)
        );
    }

    #[test]
    fn test_evaluate_division_by_zero() {
        let v = vars(&[("Lv", 0.0)]);
        assert_eq!(evaluate("100 / Lv", &v), Err(EvalError::NonFinite));
        assert_eq!(evaluate("Lv / Lv", &v), Err(EvalError::NonFinite));
    }

    #[test]
    fn test_evaluate_malformed() {
        let v = vars(&[("Lv", 1000.0)]);
        assert!(matches!(evaluate("(Lv", &v), Err(EvalError::Parse { .. })));
        assert!(matches!(evaluate("Lv Lv", &v), Err(EvalError::Parse { .. })));
    }

    #[test]
    fn test_error_messages_are_distinct() {
        let messages = [
            EvalError::Empty.to_string(),
            EvalError::UnresolvedIdentifier {
                name: "X".to_string(),
            }
            .to_string(),
            EvalError::InvalidCharacter { ch: '$' }.to_string(),
            EvalError::Parse {
                message: "x".to_string(),
            }
            .to_string(),
            EvalError::NonFinite.to_string(),
            EvalError::Negative { value: -1.0 }.to_string(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
