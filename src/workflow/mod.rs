//! Piece confirmation workflow.

mod confirmation;

pub use confirmation::{
    ConfirmOutcome, ConfirmationFlow, PieceState, SelectOutcome, LEGACY_HANDLE_SLOT,
};
