use serde::{Deserialize, Serialize};

use crate::core::Side;

/// Number of rows and columns on the board.
pub const BOARD_DIM: u8 = 8;

/// Location of a cell on the 8×8 grid.
///
/// Rows run across the board and columns run from player 1's back rank (column 0)
/// to player 0's back rank (column 7).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("({row}, {col})")]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < BOARD_DIM && col < BOARD_DIM {
            Some(Self { row, col })
        } else {
            None
        }
    }

    #[must_use]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[must_use]
    pub const fn col(self) -> u8 {
        self.col
    }

    #[must_use]
    pub const fn id(self) -> CellId {
        CellId((1 + self.col) * BOARD_DIM + 1 + self.row)
    }

    /// Whether pieces may stand on this cell.
    #[must_use]
    pub const fn is_dark(self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    /// The neighbouring cell along `dir`, if it is still on the board.
    #[must_use]
    pub fn step(self, dir: Diagonal) -> Option<Self> {
        let (dr, dc) = dir.delta();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Self::new(row, col)
    }

    /// Signed `(row, col)` offset from `self` to `other`.
    #[must_use]
    pub fn delta_to(self, other: Self) -> (i8, i8) {
        (
            other.row.cast_signed() - self.row.cast_signed(),
            other.col.cast_signed() - self.col.cast_signed(),
        )
    }

    /// Euclidean distance in cells.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        let (dr, dc) = self.delta_to(other);
        f32::from(dr).hypot(f32::from(dc))
    }

    /// All positions in cell-id order.
    pub fn all() -> impl Iterator<Item = Self> {
        (CellId::MIN..=CellId::MAX).map(|raw| CellId(raw).position())
    }
}

/// Numeric id of a cell, `(1 + col) * 8 + (1 + row)`, in `9..=72`.
///
/// This is the value the picking layer reports for a cell.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("#{_0}")]
#[serde(try_from = "u8", into = "u8")]
pub struct CellId(u8);

impl CellId {
    pub const MIN: u8 = 9;
    pub const MAX: u8 = 72;
    pub const COUNT: usize = (BOARD_DIM as usize) * (BOARD_DIM as usize);

    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        let raw = u8::try_from(raw).ok()?;
        (Self::MIN..=Self::MAX).contains(&raw).then_some(Self(raw))
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn position(self) -> Position {
        let offset = self.0 - Self::MIN;
        Position {
            row: offset % BOARD_DIM,
            col: offset / BOARD_DIM,
        }
    }

    /// Dense index in `0..64`, following id order.
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 - Self::MIN) as usize
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }
}

impl From<Position> for CellId {
    fn from(pos: Position) -> Self {
        pos.id()
    }
}

impl From<CellId> for u8 {
    fn from(id: CellId) -> Self {
        id.0
    }
}

impl TryFrom<u8> for CellId {
    type Error = InvalidCellIdError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::from_raw(raw.into()).ok_or(InvalidCellIdError(raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("cell id {_0} is outside 9..=72")]
pub struct InvalidCellIdError(#[error(not(source))] u8);

/// The four diagonals.
///
/// "Down" points towards increasing columns (player 1's forward direction) and
/// "right" towards increasing rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Diagonal {
    UpRight,
    UpLeft,
    DownRight,
    DownLeft,
}

impl Diagonal {
    pub const ALL: [Self; 4] = [Self::UpRight, Self::UpLeft, Self::DownRight, Self::DownLeft];

    /// `(row, col)` step.
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::UpRight => (1, -1),
            Self::UpLeft => (-1, -1),
            Self::DownRight => (1, 1),
            Self::DownLeft => (-1, 1),
        }
    }

    /// Directions an uncrowned piece of `side` may move along.
    #[must_use]
    pub const fn forward(side: Side) -> [Self; 2] {
        match side {
            Side::Player0 => [Self::UpRight, Self::UpLeft],
            Side::Player1 => [Self::DownRight, Self::DownLeft],
        }
    }
}
