use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::core::CellId;

/// Upper bound on the moves of a single piece.
///
/// A flying king in the middle of an empty board reaches 13 cells.
pub const MAX_PIECE_MOVES: usize = 16;

/// Moves available to one piece. Either all of them are captures or none are.
pub type PieceMoves = ArrayVec<ValidMove, MAX_PIECE_MOVES>;

/// A destination reachable from some origin cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValidMove {
    pub destination: CellId,
    /// Cell of the opponent piece jumped over, if this is a capture.
    pub capture: Option<CellId>,
}

impl ValidMove {
    #[must_use]
    pub const fn quiet(destination: CellId) -> Self {
        Self {
            destination,
            capture: None,
        }
    }

    #[must_use]
    pub const fn capture(destination: CellId, captured: CellId) -> Self {
        Self {
            destination,
            capture: Some(captured),
        }
    }

    #[must_use]
    pub const fn is_capture(&self) -> bool {
        self.capture.is_some()
    }
}

/// A move that has been played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: CellId,
    pub to: CellId,
    pub captured: Option<CellId>,
}

impl Move {
    #[must_use]
    pub const fn new(from: CellId, valid: ValidMove) -> Self {
        Self {
            from,
            to: valid.destination,
            captured: valid.capture,
        }
    }
}

/// Legal moves of the side to play, keyed by origin cell.
///
/// Origins without moves are never stored.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidMoveSet {
    moves: BTreeMap<CellId, PieceMoves>,
}

impl ValidMoveSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding the moves of a single piece.
    #[must_use]
    pub fn single(origin: CellId, moves: PieceMoves) -> Self {
        let mut set = Self::new();
        set.insert(origin, moves);
        set
    }

    pub fn insert(&mut self, origin: CellId, moves: PieceMoves) {
        if !moves.is_empty() {
            self.moves.insert(origin, moves);
        }
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Number of origins with at least one move.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn contains_origin(&self, origin: CellId) -> bool {
        self.moves.contains_key(&origin)
    }

    #[must_use]
    pub fn moves_from(&self, origin: CellId) -> Option<&[ValidMove]> {
        self.moves.get(&origin).map(|moves| moves.as_slice())
    }

    #[must_use]
    pub fn find(&self, origin: CellId, destination: CellId) -> Option<ValidMove> {
        self.moves_from(origin)?
            .iter()
            .find(|mv| mv.destination == destination)
            .copied()
    }

    #[must_use]
    pub fn has_capture(&self) -> bool {
        self.moves
            .values()
            .any(|moves| moves.iter().any(ValidMove::is_capture))
    }

    /// Whether captures, when present, are the only moves in the set.
    #[must_use]
    pub fn is_capture_consistent(&self) -> bool {
        let has_capture = self.has_capture();
        self.moves
            .values()
            .flatten()
            .all(|mv| mv.is_capture() == has_capture)
    }

    pub fn origins(&self) -> impl Iterator<Item = CellId> + '_ {
        self.moves.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellId, &[ValidMove])> + '_ {
        self.moves
            .iter()
            .map(|(origin, moves)| (*origin, moves.as_slice()))
    }
}
