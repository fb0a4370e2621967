//! Data model types for typologies and calculation output.

mod computed;
mod piece;
mod typology;
mod variable;

pub use computed::{CalculationResult, ComputedPiece};
pub use piece::{Piece, TechnicalConfigSlot};
pub use typology::{Material, Typology};
pub use variable::{parse_decimal, Variable, VariableInput};
