//! Error types for piece calculation and quoting.
//!
//! Two layers live here. [`CalcError`] is calculation output: it is returned
//! inside a `CalculationResult` and shown to the user verbatim. [`QuoteError`]
//! is the crate-level failure for loading documents and building quotes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Class of a calculation error, keyed by the offending variable or piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tipo")]
pub enum CalcErrorKind {
    /// The typology itself is unusable (e.g. no pieces).
    #[serde(rename = "tipologia")]
    Typology,
    /// The input list is malformed or missing entries.
    #[serde(rename = "variaveis")]
    VariableList,
    /// A single variable failed conversion to millimeters.
    #[serde(rename = "variavel")]
    Variable {
        #[serde(rename = "nome")]
        name: String,
    },
    /// A piece's width formula failed.
    #[serde(rename = "formula_largura")]
    WidthFormula {
        #[serde(rename = "peca")]
        piece: usize,
    },
    /// A piece's height formula failed.
    #[serde(rename = "formula_altura")]
    HeightFormula {
        #[serde(rename = "peca")]
        piece: usize,
    },
}

impl CalcErrorKind {
    /// Whether this error aborts the whole calculation.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            CalcErrorKind::WidthFormula { .. } | CalcErrorKind::HeightFormula { .. }
        )
    }
}

/// A calculation error with its display message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct CalcError {
    #[serde(flatten)]
    pub kind: CalcErrorKind,
    #[serde(rename = "mensagem")]
    pub message: String,
}

impl CalcError {
    pub fn new(kind: CalcErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Typology has no pieces.
    pub fn no_pieces() -> Self {
        Self::new(CalcErrorKind::Typology, "Tipologia sem peças cadastradas")
    }

    /// Input list is empty although the typology declares variables.
    pub fn missing_inputs() -> Self {
        Self::new(
            CalcErrorKind::VariableList,
            "Lista de variáveis ausente ou incompleta",
        )
    }

    /// Variable value or unit could not be converted.
    pub fn invalid_variable(name: &str) -> Self {
        Self::new(
            CalcErrorKind::Variable {
                name: name.to_string(),
            },
            format!("Variável \"{}\" é inválida ou unidade incorreta", name),
        )
    }

    /// Required variable has no input.
    pub fn missing_variable(name: &str) -> Self {
        Self::new(
            CalcErrorKind::Variable {
                name: name.to_string(),
            },
            format!("Variável \"{}\" não informada", name),
        )
    }

    /// Width formula of piece `piece` failed.
    pub fn width_formula(piece: usize, piece_name: &str, reason: impl std::fmt::Display) -> Self {
        Self::new(
            CalcErrorKind::WidthFormula { piece },
            format!(
                "Fórmula de largura da peça \"{}\" inválida: {}",
                piece_name, reason
            ),
        )
    }

    /// Height formula of piece `piece` failed.
    pub fn height_formula(piece: usize, piece_name: &str, reason: impl std::fmt::Display) -> Self {
        Self::new(
            CalcErrorKind::HeightFormula { piece },
            format!(
                "Fórmula de altura da peça \"{}\" inválida: {}",
                piece_name, reason
            ),
        )
    }

    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }
}

fn join_messages(errors: &[CalcError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Error codes for quote processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// File not found (-1)
    FileNotFound = -1,
    /// Empty file (-2)
    EmptyFile = -2,
    /// Document could not be parsed (-3)
    ParseError = -3,
    /// Typology failed authoring validation (E100)
    ValidationFailed = 100,
    /// Calculation produced errors (E200)
    CalculationFailed = 200,
    /// Not every piece is confirmed (E201)
    PiecesNotConfirmed = 201,
    /// Material not offered by the typology (E202)
    MaterialNotFound = 202,
    /// Price could not be computed (E203)
    InvalidPrice = 203,
}

/// Main error type for loading documents and building quotes.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Empty file: {path}")]
    EmptyFile { path: PathBuf },

    #[error("Invalid document {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Typology validation failed: {}", .errors.join("; "))]
    Validation { errors: Vec<String> },

    #[error("Calculation failed: {}", join_messages(.errors))]
    CalculationFailed { errors: Vec<CalcError> },

    #[error("{pending} piece(s) still awaiting confirmation")]
    PiecesNotConfirmed { pending: usize },

    #[error("Material not found: {id}")]
    MaterialNotFound { id: String },

    #[error("Invalid price: area {area_m2} m² at {price_per_m2} per m²")]
    InvalidPrice { area_m2: f64, price_per_m2: f64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuoteError {
    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            QuoteError::FileNotFound { .. } => ErrorCode::FileNotFound,
            QuoteError::EmptyFile { .. } => ErrorCode::EmptyFile,
            QuoteError::Json { .. } => ErrorCode::ParseError,
            QuoteError::Validation { .. } => ErrorCode::ValidationFailed,
            QuoteError::CalculationFailed { .. } => ErrorCode::CalculationFailed,
            QuoteError::PiecesNotConfirmed { .. } => ErrorCode::PiecesNotConfirmed,
            QuoteError::MaterialNotFound { .. } => ErrorCode::MaterialNotFound,
            QuoteError::InvalidPrice { .. } => ErrorCode::InvalidPrice,
            QuoteError::Io(_) => ErrorCode::FileNotFound,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }
}

/// Result type alias for quote operations.
pub type Result<T> = std::result::Result<T, QuoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_error_message() {
        let err = CalcError::invalid_variable("Lv");
        assert_eq!(err.to_string(), "Variável \"Lv\" é inválida ou unidade incorreta");
        assert!(err.is_fatal());
    }

    #[test]
    fn test_formula_errors_are_not_fatal() {
        assert!(!CalcError::width_formula(0, "Folha", "x").is_fatal());
        assert!(!CalcError::height_formula(1, "Folha", "x").is_fatal());
        assert!(CalcError::no_pieces().is_fatal());
        assert!(CalcError::missing_inputs().is_fatal());
    }

    #[test]
    fn test_calc_error_serialization() {
        let err = CalcError::width_formula(1, "Folha", "Fórmula vazia");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["tipo"], "formula_largura");
        assert_eq!(json["peca"], 1);
        assert_eq!(
            json["mensagem"],
            "Fórmula de largura da peça \"Folha\" inválida: Fórmula vazia"
        );

        let err = CalcError::invalid_variable("Av");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["tipo"], "variavel");
        assert_eq!(json["nome"], "Av");

        let back: CalcError = serde_json::from_value(json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn test_error_codes() {
        let err = QuoteError::PiecesNotConfirmed { pending: 2 };
        assert_eq!(err.code(), ErrorCode::PiecesNotConfirmed);
        assert_eq!(err.code_value(), 201);
        assert_eq!(err.to_string(), "2 piece(s) still awaiting confirmation");

        let err = QuoteError::FileNotFound {
            path: PathBuf::from("x.json"),
        };
        assert_eq!(err.code_value(), -1);
    }
}
