//! Move generation on a plain snapshot of the board.
//!
//! The functions here only look at which side owns each cell and how the pieces are
//! ranked, so they can be checked against hand-written layouts without any
//! animation state.

use crate::{
    core::{
        CellId, Diagonal, GamePiece, PieceMoves, Position, Rank, Side, ValidMove, ValidMoveSet,
    },
    engine::KingRule,
};

/// Piece placement, indexed by cell id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    squares: [Option<(Side, Rank)>; CellId::COUNT],
}

impl Default for Layout {
    fn default() -> Self {
        Self::empty()
    }
}

impl Layout {
    /// Rows of pieces each side starts with.
    const STARTING_COLS: u8 = 3;

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            squares: [None; CellId::COUNT],
        }
    }

    /// Twelve pieces per side on the dark cells of their three nearest columns.
    #[must_use]
    pub fn standard() -> Self {
        let mut layout = Self::empty();
        for pos in Position::all().filter(|pos| pos.is_dark()) {
            if pos.col() < Self::STARTING_COLS {
                layout.set(pos, Some((Side::Player1, Rank::Normal)));
            } else if pos.col() >= 8 - Self::STARTING_COLS {
                layout.set(pos, Some((Side::Player0, Rank::Normal)));
            }
        }
        layout
    }

    #[must_use]
    pub fn with(mut self, pos: Position, side: Side, rank: Rank) -> Self {
        self.set(pos, Some((side, rank)));
        self
    }

    pub fn set(&mut self, pos: Position, piece: Option<(Side, Rank)>) {
        self.squares[pos.id().index()] = piece;
    }

    #[must_use]
    pub fn get(&self, pos: Position) -> Option<(Side, Rank)> {
        self.squares[pos.id().index()]
    }

    #[must_use]
    pub fn side_at(&self, pos: Position) -> Option<Side> {
        self.get(pos).map(|(side, _)| side)
    }

    #[must_use]
    pub fn piece_at(&self, pos: Position) -> Option<GamePiece> {
        self.get(pos)
            .map(|(side, rank)| GamePiece::with_rank(side, rank))
    }

    /// Cells holding a piece of `side`, in id order.
    pub fn cells_of(&self, side: Side) -> impl Iterator<Item = CellId> + '_ {
        CellId::all().filter(move |id| self.side_at(id.position()) == Some(side))
    }

    #[must_use]
    pub fn count(&self, side: Side) -> usize {
        self.cells_of(side).count()
    }
}

/// Moves of the piece on `origin` under `king_rule`.
///
/// Empty if the cell is empty.
#[must_use]
pub fn piece_moves(layout: &Layout, origin: Position, king_rule: KingRule) -> PieceMoves {
    match layout.get(origin) {
        None => PieceMoves::new(),
        Some((side, Rank::King)) if king_rule.is_flying() => {
            flying_king_moves(layout, origin, side)
        }
        Some((side, rank)) => step_moves(layout, origin, side, rank),
    }
}

/// One-cell moves and adjacent jumps.
///
/// Men only go forward, kings go along every diagonal. If any capture is available
/// only captures are returned.
#[must_use]
pub fn step_moves(layout: &Layout, origin: Position, side: Side, rank: Rank) -> PieceMoves {
    let forward = Diagonal::forward(side);
    let dirs: &[Diagonal] = match rank {
        Rank::Normal => &forward,
        Rank::King => &Diagonal::ALL,
    };

    let mut quiet = PieceMoves::new();
    let mut captures = PieceMoves::new();
    for &dir in dirs {
        let Some(next) = origin.step(dir) else {
            continue;
        };
        match layout.side_at(next) {
            None => quiet.push(ValidMove::quiet(next.id())),
            Some(owner) if owner != side => {
                if let Some(landing) = next.step(dir)
                    && layout.side_at(landing).is_none()
                {
                    captures.push(ValidMove::capture(landing.id(), next.id()));
                }
            }
            Some(_) => {}
        }
    }

    if captures.is_empty() { quiet } else { captures }
}

/// Moves of a king that slides along its diagonals.
///
/// Each ray collects empty cells until it meets a piece. An own piece ends the ray;
/// an opponent piece followed by at least one empty cell can be captured, landing on
/// any of the empty cells up to the next obstacle. If any capture is available only
/// captures are returned.
#[must_use]
pub fn flying_king_moves(layout: &Layout, origin: Position, side: Side) -> PieceMoves {
    let mut quiet = PieceMoves::new();
    let mut captures = PieceMoves::new();
    for dir in Diagonal::ALL {
        let mut cursor = origin.step(dir);
        while let Some(pos) = cursor
            && layout.side_at(pos).is_none()
        {
            quiet.push(ValidMove::quiet(pos.id()));
            cursor = pos.step(dir);
        }

        let Some(obstacle) = cursor else {
            continue;
        };
        if layout.side_at(obstacle) == Some(side) {
            continue;
        }

        let mut landing = obstacle.step(dir);
        while let Some(pos) = landing
            && layout.side_at(pos).is_none()
        {
            captures.push(ValidMove::capture(pos.id(), obstacle.id()));
            landing = pos.step(dir);
        }
    }

    if captures.is_empty() { quiet } else { captures }
}

/// All moves of `side`.
///
/// If any piece can capture, pieces without a capture are dropped from the set.
#[must_use]
pub fn side_moves(layout: &Layout, side: Side, king_rule: KingRule) -> ValidMoveSet {
    let mut set = ValidMoveSet::new();
    let mut has_capture = false;
    for origin in layout.cells_of(side) {
        let moves = piece_moves(layout, origin.position(), king_rule);
        let Some(first) = moves.first() else {
            continue;
        };
        if first.is_capture() {
            if !has_capture {
                set.clear();
                has_capture = true;
            }
            set.insert(origin, moves);
        } else if !has_capture {
            set.insert(origin, moves);
        }
    }
    set
}
