use std::{f32::consts::FRAC_PI_2, time::Duration};

use glam::{Mat4, Vec2, Vec3};

use crate::{
    anim::{Animation, CaptureAnimation, FallInAnimation, FallInFrame},
    core::{CellId, GamePiece, Position, Side, Timestamp},
    engine::Travel,
};

/// Spot light that follows the selected piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingLight {
    side: Side,
    origin: Vec3,
    position: Vec3,
    target_origin: Vec3,
    target: Vec3,
    cutoff_degrees: f32,
    enabled: bool,
}

impl TrackingLight {
    const LARGE_HEIGHT: f32 = 0.75;
    const SMALL_HEIGHT: f32 = 0.5;

    /// Light above the centre of `cell`, in board-local coordinates.
    fn new(side: Side, cell: Position, size: f32) -> Self {
        let height = if (size - 0.75).abs() < f32::EPSILON {
            Self::LARGE_HEIGHT
        } else {
            Self::SMALL_HEIGHT
        };
        let centre = Vec3::new(
            f32::from(cell.row()) * size + size / 2.0,
            0.0,
            f32::from(cell.col()) * size + size / 2.0,
        );
        let origin = centre + Vec3::new(0.0, height, 0.0);
        Self {
            side,
            origin,
            position: origin,
            target_origin: centre,
            target: centre,
            cutoff_degrees: (size / 2.0 / height).atan().to_degrees(),
            enabled: size > 0.5,
        }
    }

    /// Moves the light along with a piece displaced by `offset` cells.
    fn follow(&mut self, offset: Vec2, size: f32) {
        let shift = Vec3::new(offset.x * size, 0.0, offset.y * size);
        self.position = self.origin + shift;
        self.target = self.target_origin + shift;
    }

    /// Side whose colour the light takes.
    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    #[must_use]
    pub fn cutoff_degrees(&self) -> f32 {
        self.cutoff_degrees
    }

    /// Only the large board lights its pieces.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// One of the 64 board cells and the piece standing on it.
///
/// While a piece travels it stays owned by its origin cell and is handed to the
/// destination when every animation of the move has finished.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardCell {
    id: CellId,
    position: Position,
    size: f32,
    piece: Option<GamePiece>,
    fall_in: FallInAnimation,
    pub(crate) travel: Option<Travel>,
    pub(crate) capture: Option<CaptureAnimation>,
    tracking_light: Option<TrackingLight>,
}

impl BoardCell {
    pub(crate) fn new(position: Position, size: f32, piece: Option<GamePiece>) -> Self {
        let id = position.id();
        Self {
            id,
            position,
            size,
            piece,
            fall_in: FallInAnimation::new(id),
            travel: None,
            capture: None,
            tracking_light: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> CellId {
        self.id
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn size(&self) -> f32 {
        self.size
    }

    #[must_use]
    pub fn piece(&self) -> Option<&GamePiece> {
        self.piece.as_ref()
    }

    pub(crate) fn piece_mut(&mut self) -> Option<&mut GamePiece> {
        self.piece.as_mut()
    }

    pub(crate) fn set_piece(&mut self, piece: Option<GamePiece>) {
        self.piece = piece;
    }

    pub(crate) fn take_piece(&mut self) -> Option<GamePiece> {
        self.piece.take()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.piece.is_none()
    }

    #[must_use]
    pub fn travel(&self) -> Option<&Travel> {
        self.travel.as_ref()
    }

    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.travel.is_some()
    }

    #[must_use]
    pub fn is_being_captured(&self) -> bool {
        self.capture.is_some()
    }

    #[must_use]
    pub fn tracking_light(&self) -> Option<&TrackingLight> {
        self.tracking_light.as_ref()
    }

    pub(crate) fn turn_on_tracking_light(&mut self) {
        if let Some(piece) = &self.piece {
            self.tracking_light = Some(TrackingLight::new(piece.side(), self.position, self.size));
        }
    }

    pub(crate) fn turn_off_tracking_light(&mut self) {
        self.tracking_light = None;
    }

    pub(crate) fn follow_with_light(&mut self, offset: Vec2) {
        if let Some(light) = &mut self.tracking_light {
            light.follow(offset, self.size);
        }
    }

    /// Time the piece would take to reach `to`, or `None` for an empty cell.
    #[must_use]
    pub fn anim_duration(&self, to: Position, time_unit: Duration) -> Option<Duration> {
        let piece = self.piece.as_ref()?;
        let units = self.position.distance(to) / piece.speed();
        Some(time_unit.mul_f32(units))
    }

    pub(crate) fn update_fall_in(&mut self, now: Timestamp) {
        self.fall_in.update(now);
    }

    pub(crate) fn skip_fall_in(&mut self) {
        self.fall_in = FallInAnimation::settled();
    }

    #[must_use]
    pub fn creation_anim_is_over(&self) -> bool {
        !self.fall_in.is_active()
    }

    #[must_use]
    pub fn fall_in_frame(&self) -> FallInFrame {
        self.fall_in.apply()
    }

    /// Transform of the cell tile in board-local space.
    #[must_use]
    pub fn cell_transform(&self) -> Mat4 {
        let height = self.fall_in.apply().cell_height;
        Mat4::from_translation(Vec3::new(
            f32::from(self.position.row()) * self.size,
            height,
            f32::from(self.position.col()) * self.size,
        )) * Mat4::from_rotation_x(FRAC_PI_2)
    }

    /// Motion of the piece relative to its cell, in cell units.
    ///
    /// A capture hop takes precedence over travel.
    #[must_use]
    pub fn piece_motion(&self) -> Mat4 {
        if let Some(capture) = &self.capture {
            return capture.apply();
        }
        let drop = Mat4::from_translation(Vec3::new(0.0, 0.0, self.fall_in.apply().piece_offset));
        match &self.travel {
            Some(travel) => {
                let offset = travel.offset();
                drop * Mat4::from_translation(Vec3::new(offset.x, offset.y, 0.0))
            }
            None => drop,
        }
    }
}
