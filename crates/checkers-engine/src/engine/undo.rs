use crate::{
    core::{Move, Side, ValidMoveSet},
    engine::TimerSnapshot,
};

/// Everything needed to take back one move.
///
/// Recorded when the move is accepted, before anything is animated. The same
/// records drive the game film.
#[derive(Debug, Clone, PartialEq)]
pub struct Undo {
    mv: Move,
    turn: Side,
    valid_moves: ValidMoveSet,
    timer: TimerSnapshot,
    captured_was_king: bool,
    promoted: bool,
}

impl Undo {
    #[must_use]
    pub fn new(
        mv: Move,
        turn: Side,
        valid_moves: ValidMoveSet,
        timer: TimerSnapshot,
        captured_was_king: bool,
    ) -> Self {
        Self {
            mv,
            turn,
            valid_moves,
            timer,
            captured_was_king,
            promoted: false,
        }
    }

    #[must_use]
    pub fn mv(&self) -> &Move {
        &self.mv
    }

    /// Side that played the move.
    #[must_use]
    pub fn turn(&self) -> Side {
        self.turn
    }

    /// Moves that were legal before the move was played.
    #[must_use]
    pub fn valid_moves(&self) -> &ValidMoveSet {
        &self.valid_moves
    }

    #[must_use]
    pub fn timer(&self) -> &TimerSnapshot {
        &self.timer
    }

    #[must_use]
    pub fn captured_was_king(&self) -> bool {
        self.captured_was_king
    }

    /// Whether the moving piece was crowned by this move.
    ///
    /// Only known once the move animation has finished.
    #[must_use]
    pub fn promoted(&self) -> bool {
        self.promoted
    }

    pub(crate) fn mark_promoted(&mut self) {
        self.promoted = true;
    }
}
