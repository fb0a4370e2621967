//! Measurement variables and their runtime input values.

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::Unit;

fn default_true() -> bool {
    true
}

/// A named, unit-bearing measurement a typology's formulas depend on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Identifier used in formulas (e.g. `Lv`).
    pub name: String,
    /// Display label (e.g. "Largura do vão").
    #[serde(default)]
    pub label: String,
    /// Unit offered by default when the user types a value.
    #[serde(default)]
    pub default_unit: Unit,
    /// Whether the user may switch to another unit.
    #[serde(default)]
    pub allow_unit_override: bool,
    /// Whether the calculation refuses to run without a value.
    #[serde(default = "default_true")]
    pub required: bool,
    /// Display and processing order.
    #[serde(default)]
    pub order: i32,
}

impl Variable {
    /// Create a required variable in millimeters.
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            default_unit: Unit::Millimeter,
            allow_unit_override: false,
            required: true,
            order: 0,
        }
    }

    /// Set the default unit.
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.default_unit = unit;
        self
    }
}

/// The value a user typed for one variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableInput {
    pub name: String,
    /// Empty until the user types a usable number.
    #[serde(default, deserialize_with = "lenient_number")]
    pub value: Option<f64>,
    /// Raw unit text; validated when converting to millimeters.
    #[serde(default)]
    pub unit: String,
}

impl VariableInput {
    pub fn new(name: impl Into<String>, value: Option<f64>, unit: Unit) -> Self {
        Self {
            name: name.into(),
            value,
            unit: unit.symbol().to_string(),
        }
    }

    /// Empty input for `variable`, preset to its default unit.
    pub fn for_variable(variable: &Variable) -> Self {
        Self::new(variable.name.clone(), None, variable.default_unit)
    }

    /// Parse typed text into the value; blank or unparsable text empties it.
    pub fn set_text(&mut self, text: &str) {
        self.value = parse_decimal(text);
    }
}

/// Parse a decimal typed by a user, accepting `,` as decimal separator.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.replace(',', ".").parse().ok()
}

/// Accept a number, a numeric string, an empty string or null.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => parse_decimal(&s),
        _ => None,
    })
}
