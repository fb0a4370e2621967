//! Typology - a parameterized glass product template.

use super::{Piece, Variable, VariableInput};
use crate::error::{QuoteError, Result};
use serde::{Deserialize, Serialize};

/// A material a typology may be quoted in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub name: String,
    /// Price per billed square meter.
    pub price_per_m2: f64,
}

impl Material {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price_per_m2: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price_per_m2,
        }
    }
}

/// Product template: measurement variables, pieces and eligible materials.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Typology {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub pieces: Vec<Piece>,
    #[serde(default)]
    pub materials: Vec<Material>,
}

impl Typology {
    /// Create an empty typology.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a variable.
    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    /// Add a piece.
    pub fn with_piece(mut self, piece: Piece) -> Self {
        self.pieces.push(piece);
        self
    }

    /// Add a material.
    pub fn with_material(mut self, material: Material) -> Self {
        self.materials.push(material);
        self
    }

    /// Pieces sorted by `order` (stable for equal orders).
    pub fn ordered_pieces(&self) -> Vec<&Piece> {
        let mut pieces: Vec<&Piece> = self.pieces.iter().collect();
        pieces.sort_by_key(|p| p.order);
        pieces
    }

    /// Variables sorted by `order` (stable for equal orders).
    pub fn ordered_variables(&self) -> Vec<&Variable> {
        let mut variables: Vec<&Variable> = self.variables.iter().collect();
        variables.sort_by_key(|v| v.order);
        variables
    }

    /// Find a variable by name.
    pub fn find_variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Find a material by id.
    pub fn find_material(&self, id: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == id)
    }

    /// Material `id`, or [`QuoteError::MaterialNotFound`].
    pub fn material(&self, id: &str) -> Result<&Material> {
        self.find_material(id)
            .ok_or_else(|| QuoteError::MaterialNotFound { id: id.to_string() })
    }

    /// One empty input per variable, in display order.
    pub fn empty_inputs(&self) -> Vec<VariableInput> {
        self.ordered_variables()
            .into_iter()
            .map(VariableInput::for_variable)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Unit;

    #[test]
    fn test_ordered_pieces_is_stable() {
        let mut a = Piece::new("A", "1", "1");
        a.order = 2;
        let b = Piece::new("B", "1", "1");
        let c = Piece::new("C", "1", "1");
        let typology = Typology::new("T").with_piece(a).with_piece(b).with_piece(c);

        let names: Vec<&str> = typology
            .ordered_pieces()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_empty_inputs() {
        let mut av = Variable::new("Av", "Altura").with_unit(Unit::Centimeter);
        av.order = 1;
        let lv = Variable::new("Lv", "Largura").with_unit(Unit::Meter);
        let typology = Typology::new("T").with_variable(av).with_variable(lv);

        let inputs = typology.empty_inputs();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].name, "Lv");
        assert_eq!(inputs[0].unit, "m");
        assert_eq!(inputs[1].name, "Av");
        assert!(inputs.iter().all(|i| i.value.is_none()));
    }

    #[test]
    fn test_find_material() {
        let typology = Typology::new("T").with_material(Material::new("incolor8", "Incolor 8mm", 350.0));
        assert_eq!(typology.find_material("incolor8").unwrap().price_per_m2, 350.0);
        assert!(typology.find_material("fume").is_none());
        assert!(matches!(
            typology.material("fume"),
            Err(QuoteError::MaterialNotFound { id }) if id == "fume"
        ));
    }
}
