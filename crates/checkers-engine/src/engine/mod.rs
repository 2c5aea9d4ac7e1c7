//! Rules, board state and the game controller.
//!
//! - [`Game`] - Turn and session state machine driven by picks and frame ticks
//! - [`Board`] - Cells, ownership sets, legal moves and the move in flight
//! - [`BoardCell`] - One cell, its piece and its per-cell animations
//! - [`Layout`] - Plain piece placement used to compute legal moves
//! - [`CellSets`] - Partition of the cells by owner
//! - [`PieceSupport`] - Stack of captured pieces beside the board
//! - [`Timer`] - Per-player countdown
//! - [`Undo`] - Record of one accepted move
//! - [`ScoreStore`] - Persistent win counters
//! - [`GameOptions`] / [`Settings`] - Game options and the geometry they imply

pub use self::{
    board::*, cell::*, cell_sets::*, game::*, rules::*, score::*, settings::*, support::*,
    timer::*, travel::*, undo::*,
};

mod board;
mod cell;
mod cell_sets;
mod game;
mod rules;
mod score;
mod settings;
mod support;
mod timer;
mod travel;
mod undo;
