use std::time::Duration;

use glam::Vec2;

use crate::{
    anim::{AnimClock, Playback, ratio},
    core::{CellId, Position, Side, Timestamp},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TravelStage {
    /// Sliding towards the destination.
    Moving,
    /// Arrived, waiting for the crown plates to settle.
    Crowning,
    /// Arrived; the move ends once the captured piece is done too.
    Arrived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub(crate) enum LinkState {
    /// The mover has not reached the captured piece yet.
    Waiting,
    Running,
    Done,
}

/// Ties a travelling piece to the piece it captures (or brings back).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CaptureLink {
    pub(crate) cell: CellId,
    pub(crate) support: Side,
    /// Travelled distance, in cells, at which the captured piece starts its hop.
    pub(crate) threshold: f32,
    /// Re-crown the piece once it is back on its cell.
    pub(crate) restore_king: bool,
    pub(crate) state: LinkState,
}

/// A piece sliding from its cell to another one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Travel {
    pub(crate) to: CellId,
    delta: Vec2,
    duration: Duration,
    clock: AnimClock,
    offset: Vec2,
    pub(crate) stage: TravelStage,
    pub(crate) promote: bool,
    pub(crate) playback: Playback,
    pub(crate) capture: Option<CaptureLink>,
}

impl Travel {
    pub(crate) fn new(
        from: Position,
        to: Position,
        duration: Duration,
        promote: bool,
        playback: Playback,
        capture: Option<CaptureLink>,
    ) -> Self {
        let (dr, dc) = from.delta_to(to);
        Self {
            to: to.id(),
            delta: Vec2::new(f32::from(dr), f32::from(dc)),
            duration,
            clock: AnimClock::default(),
            offset: Vec2::ZERO,
            stage: TravelStage::Moving,
            promote,
            playback,
            capture,
        }
    }

    #[must_use]
    pub fn destination(&self) -> CellId {
        self.to
    }

    /// Current displacement from the origin cell, as `(rows, cols)`.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    #[must_use]
    pub fn stage(&self) -> TravelStage {
        self.stage
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Slides the piece to `now`. Returns `true` on the update it arrives.
    pub(crate) fn advance(&mut self, now: Timestamp) -> bool {
        if !self.stage.is_moving() {
            return false;
        }
        let r = ratio(self.clock.elapsed(now), self.duration);
        self.offset = self.delta * r;
        r >= 1.0
    }

    /// Whether the forward hop of the captured piece should start.
    pub(crate) fn reached_capture(&self) -> bool {
        self.capture.is_some_and(|link| {
            link.state.is_waiting()
                && (self.offset.length() >= link.threshold || !self.stage.is_moving())
        })
    }

    pub(crate) fn capture_done(&self) -> bool {
        self.capture.is_none_or(|link| link.state.is_done())
    }
}
