//! Piece definition: one physically cut component of a typology.

use serde::{Deserialize, Serialize};

/// A per-piece choice point, e.g. the handle model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalConfigSlot {
    /// Configuration category id.
    pub category: String,
    /// Allowed item ids; empty means every item in the category.
    #[serde(default)]
    pub allowed_item_ids: Vec<String>,
    /// Whether confirmation requires a selection.
    #[serde(default)]
    pub required: bool,
}

impl TechnicalConfigSlot {
    /// Create a slot open to every item of `category`.
    pub fn new(category: impl Into<String>, required: bool) -> Self {
        Self {
            category: category.into(),
            allowed_item_ids: Vec::new(),
            required,
        }
    }

    /// Check if `item_id` may be selected for this slot.
    pub fn allows(&self, item_id: &str) -> bool {
        self.allowed_item_ids.is_empty() || self.allowed_item_ids.iter().any(|id| id == item_id)
    }
}

/// A glass piece whose dimensions are formulas over the typology's variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub name: String,
    /// Width formula, evaluated in millimeters.
    pub width_formula: String,
    /// Height formula, evaluated in millimeters.
    pub height_formula: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub technical_configurations: Vec<TechnicalConfigSlot>,
    /// Legacy flag: piece carries a handle and needs one implicit selection.
    #[serde(default)]
    pub legacy_handle: bool,
    #[serde(default)]
    pub order: i32,
}

impl Piece {
    /// Create a new piece.
    pub fn new(
        name: impl Into<String>,
        width_formula: impl Into<String>,
        height_formula: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            width_formula: width_formula.into(),
            height_formula: height_formula.into(),
            ..Default::default()
        }
    }

    /// Add a technical configuration slot.
    pub fn with_slot(mut self, slot: TechnicalConfigSlot) -> Self {
        self.technical_configurations.push(slot);
        self
    }

    /// Check if this piece only has the legacy implicit handle slot.
    pub fn uses_legacy_handle(&self) -> bool {
        self.technical_configurations.is_empty() && self.legacy_handle
    }
}
