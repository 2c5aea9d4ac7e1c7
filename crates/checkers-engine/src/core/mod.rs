//! Board-independent building blocks of a checkers game.
//!
//! - [`Timestamp`] - Millisecond instants supplied by the frame driver
//! - [`Position`] / [`CellId`] - Board coordinates and the numeric cell ids used for picking
//! - [`Diagonal`] - The four diagonal directions a piece can travel along
//! - [`Side`] / [`Rank`] / [`GamePiece`] - Pieces and their owners
//! - [`ValidMove`] / [`ValidMoveSet`] - Legal moves keyed by the cell they start from

pub use self::{moves::*, piece::*, position::*, time::*};

mod moves;
mod piece;
mod position;
mod time;
