//! Per-piece confirmation, one piece at a time, before pricing.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{CalculationResult, ComputedPiece, Piece, TechnicalConfigSlot, Typology};

/// Slot index used for the implicit selection of legacy handle pieces.
pub const LEGACY_HANDLE_SLOT: usize = 0;

/// Confirmation state of a computed piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PieceState {
    Pending,
    Confirmed,
}

/// Outcome of selecting an item for the current piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    Accepted,
    /// The current piece has no such slot.
    UnknownSlot,
    /// The item is not in the slot's allowed set.
    ItemNotAllowed,
    /// Every piece is already confirmed.
    Finished,
}

/// Outcome of confirming the current piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The piece was confirmed and the cursor moved to `next`.
    Advanced { next: usize },
    /// The last piece was confirmed.
    AllConfirmed,
    /// Required slots without a selection; nothing changed.
    MissingSelections { slots: Vec<usize> },
    /// Every piece is already confirmed.
    Finished,
}

/// Selection rules for one piece.
#[derive(Debug, Clone, Default)]
struct PieceRequirements {
    slots: Vec<TechnicalConfigSlot>,
    legacy_handle: bool,
}

impl PieceRequirements {
    fn from_piece(piece: &Piece) -> Self {
        Self {
            slots: piece.technical_configurations.clone(),
            legacy_handle: piece.uses_legacy_handle(),
        }
    }

    fn missing(&self, piece: &ComputedPiece) -> Vec<usize> {
        let selected = |slot: usize| piece.selections.get(&slot).is_some_and(|id| !id.is_empty());

        if self.legacy_handle {
            return if selected(LEGACY_HANDLE_SLOT) {
                Vec::new()
            } else {
                vec![LEGACY_HANDLE_SLOT]
            };
        }

        self.slots
            .iter()
            .enumerate()
            .filter(|(i, slot)| slot.required && !selected(*i))
            .map(|(i, _)| i)
            .collect()
    }

    fn check(&self, slot: usize, item_id: &str) -> Option<SelectOutcome> {
        if item_id.trim().is_empty() {
            return Some(SelectOutcome::ItemNotAllowed);
        }
        if self.legacy_handle {
            return (slot != LEGACY_HANDLE_SLOT).then_some(SelectOutcome::UnknownSlot);
        }
        match self.slots.get(slot) {
            None => Some(SelectOutcome::UnknownSlot),
            Some(s) if !s.allows(item_id) => Some(SelectOutcome::ItemNotAllowed),
            Some(_) => None,
        }
    }
}

/// Confirmation cursor over the pieces of one calculation.
///
/// The flow owns the calculation result. When inputs change, drop the flow and
/// build a new one from a fresh calculation.
#[derive(Debug, Clone)]
pub struct ConfirmationFlow {
    result: CalculationResult,
    requirements: Vec<PieceRequirements>,
    cursor: usize,
}

impl ConfirmationFlow {
    /// Start confirming the pieces of `result`, computed from `typology`.
    pub fn new(typology: &Typology, result: CalculationResult) -> Self {
        let requirements = typology
            .ordered_pieces()
            .into_iter()
            .map(PieceRequirements::from_piece)
            .collect();
        Self {
            result,
            requirements,
            cursor: 0,
        }
    }

    fn requirements(&self, index: usize) -> PieceRequirements {
        self.requirements.get(index).cloned().unwrap_or_default()
    }

    /// Index of the piece being confirmed; equals the piece count once done.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Piece being confirmed, if any remains.
    pub fn current(&self) -> Option<&ComputedPiece> {
        self.result.pieces.get(self.cursor)
    }

    pub fn pieces(&self) -> &[ComputedPiece] {
        &self.result.pieces
    }

    pub fn result(&self) -> &CalculationResult {
        &self.result
    }

    /// State of piece `index`.
    pub fn state(&self, index: usize) -> Option<PieceState> {
        self.result.pieces.get(index).map(|p| {
            if p.confirmed {
                PieceState::Confirmed
            } else {
                PieceState::Pending
            }
        })
    }

    /// Number of pieces still pending.
    pub fn pending_count(&self) -> usize {
        self.result.pieces.iter().filter(|p| !p.confirmed).count()
    }

    /// Check if every piece is confirmed.
    pub fn is_complete(&self) -> bool {
        self.pending_count() == 0
    }

    /// Select `item_id` for `slot` on the current piece.
    pub fn select(&mut self, slot: usize, item_id: &str) -> SelectOutcome {
        let requirements = self.requirements(self.cursor);
        let Some(piece) = self.result.pieces.get_mut(self.cursor) else {
            return SelectOutcome::Finished;
        };
        if let Some(rejected) = requirements.check(slot, item_id) {
            debug!("Selection of '{}' for slot {} rejected: {:?}", item_id, slot, rejected);
            return rejected;
        }
        piece.selections.insert(slot, item_id.to_string());
        SelectOutcome::Accepted
    }

    /// Remove the selection of `slot` on the current piece.
    pub fn clear_selection(&mut self, slot: usize) {
        if let Some(piece) = self.result.pieces.get_mut(self.cursor) {
            piece.selections.remove(&slot);
        }
    }

    /// Required slots of the current piece that still lack a selection.
    pub fn missing_selections(&self) -> Vec<usize> {
        match self.current() {
            Some(piece) => self.requirements(self.cursor).missing(piece),
            None => Vec::new(),
        }
    }

    /// Check if the current piece may be confirmed.
    pub fn can_confirm(&self) -> bool {
        self.current().is_some() && self.missing_selections().is_empty()
    }

    /// Confirm the current piece and advance the cursor.
    pub fn confirm(&mut self) -> ConfirmOutcome {
        if self.current().is_none() {
            return ConfirmOutcome::Finished;
        }

        let missing = self.missing_selections();
        if !missing.is_empty() {
            return ConfirmOutcome::MissingSelections { slots: missing };
        }

        let piece = &mut self.result.pieces[self.cursor];
        piece.confirmed = true;
        debug!("Piece {} '{}' confirmed", self.cursor + 1, piece.name);

        self.cursor += 1;
        if self.cursor < self.result.pieces.len() {
            ConfirmOutcome::Advanced { next: self.cursor }
        } else {
            ConfirmOutcome::AllConfirmed
        }
    }
}
