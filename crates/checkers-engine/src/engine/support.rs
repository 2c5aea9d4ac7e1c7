use glam::Vec2;

use crate::{
    anim::CaptureTarget,
    core::{GamePiece, Position, Side},
    engine::Settings,
};

/// Thickness of a piece before scaling.
pub const PIECE_THICKNESS: f32 = 0.1015;
/// Diameter of a piece before scaling.
pub const OUTER_DIAMETER: f32 = 0.846;

/// Stand next to the board where a side's captured pieces are stacked.
///
/// A captured piece goes to the support of the side it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceSupport {
    side: Side,
    position: Vec2,
    height: f32,
    scale: f32,
    pieces: Vec<GamePiece>,
}

impl PieceSupport {
    #[must_use]
    pub fn new(side: Side, settings: &Settings) -> Self {
        Self {
            side,
            position: settings.support_position(side),
            height: settings.support_height,
            scale: settings.support_scale,
            pieces: Vec::new(),
        }
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Position on the board plane, relative to the board corner.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[must_use]
    pub fn pieces(&self) -> &[GamePiece] {
        &self.pieces
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn push(&mut self, piece: GamePiece) {
        self.pieces.push(piece);
    }

    pub fn pop(&mut self) -> Option<GamePiece> {
        self.pieces.pop()
    }

    pub fn clear(&mut self) {
        self.pieces.clear();
    }

    /// Height of the stack slot at `index`; slots grow towards -z.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn slot_height(&self, index: usize) -> f32 {
        index as f32 * -PIECE_THICKNESS * self.scale
    }

    /// Distance at which a travelling piece reaches the piece it captures.
    ///
    /// `row_gap` is the number of rows between the mover and the captured piece.
    #[must_use]
    pub fn collision_distance(&self, cell_size: f32, row_gap: u8) -> f32 {
        let row_offset = if row_gap == 1 { 0.0 } else { f32::from(row_gap) };
        let collision_offset = if cell_size > 0.5 { 0.075 } else { 0.005 };
        (2.0 * cell_size * cell_size).sqrt() - OUTER_DIAMETER * self.scale + row_offset
            - collision_offset
    }

    /// Hop target for a piece captured on `cell` that lands on top of the stack.
    #[must_use]
    pub fn capture_target(&self, cell: Position, cell_size: f32) -> CaptureTarget {
        self.target_for_slot(cell, cell_size, self.pieces.len())
    }

    /// Hop target for the piece currently on top of the stack.
    #[must_use]
    pub fn top_target(&self, cell: Position, cell_size: f32) -> CaptureTarget {
        self.target_for_slot(cell, cell_size, self.pieces.len().saturating_sub(1))
    }

    fn target_for_slot(&self, cell: Position, cell_size: f32, slot: usize) -> CaptureTarget {
        let centre = Vec2::new(
            (f32::from(cell.row()) + 0.5) * cell_size,
            (f32::from(cell.col()) + 0.5) * cell_size,
        );
        CaptureTarget {
            offset: (self.position - centre) / cell_size,
            support_height: self.height,
            slot_height: self.slot_height(slot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BoardSize;

    #[test]
    fn test_stack_grows_upwards() {
        let settings = Settings::for_size(BoardSize::Large);
        let mut support = PieceSupport::new(Side::Player0, &settings);
        assert!(support.slot_height(0).abs() < f32::EPSILON);
        assert!((support.slot_height(2) - 2.0 * -PIECE_THICKNESS * 0.75).abs() < 1e-6);

        let cell = Position::new(0, 0).unwrap();
        support.push(GamePiece::new(Side::Player0));
        let target = support.capture_target(cell, settings.cell_size());
        assert!((target.slot_height - support.slot_height(1)).abs() < 1e-6);
        let top = support.top_target(cell, settings.cell_size());
        assert!(top.slot_height.abs() < 1e-6);
    }

    #[test]
    fn test_target_offset_in_cells() {
        let settings = Settings::for_size(BoardSize::Large);
        let support = PieceSupport::new(Side::Player0, &settings);
        let target = support.capture_target(Position::new(1, 2).unwrap(), 0.75);
        // support at (7, 7), cell centre at (1.125, 1.875)
        assert!(target.offset.abs_diff_eq(Vec2::new(7.833_333, 6.833_333), 1e-4));
    }

    #[test]
    fn test_collision_distance() {
        let settings = Settings::for_size(BoardSize::Large);
        let support = PieceSupport::new(Side::Player1, &settings);
        let adjacent = support.collision_distance(0.75, 1);
        let expected = (2.0_f32 * 0.75 * 0.75).sqrt() - OUTER_DIAMETER * 0.75 - 0.075;
        assert!((adjacent - expected).abs() < 1e-6);
        let far = support.collision_distance(0.75, 3);
        assert!((far - (expected + 3.0)).abs() < 1e-6);
    }
}
