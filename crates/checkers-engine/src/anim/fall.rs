use std::time::Duration;

use crate::{
    anim::{AnimClock, Animation},
    core::{CellId, Timestamp},
};

const DELAY_PER_CELL: Duration = Duration::from_millis(25);
const FALL_HEIGHT: f32 = 6.0;
const FALL_DURATION: Duration = Duration::from_millis(1000);
const PIECE_SETTLE_DURATION: Duration = Duration::from_millis(100);
const PIECE_DROP_OFFSET: f32 = -0.6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallInFrame {
    /// Whether the cell has started falling.
    pub visible: bool,
    /// Height of the cell above the table.
    pub cell_height: f32,
    /// Offset of the piece above its cell along the piece axis (negative is up).
    pub piece_offset: f32,
}

impl FallInFrame {
    const HIDDEN: Self = Self {
        visible: false,
        cell_height: FALL_HEIGHT,
        piece_offset: PIECE_DROP_OFFSET,
    };

    const SETTLED: Self = Self {
        visible: true,
        cell_height: 0.0,
        piece_offset: 0.0,
    };
}

/// Drops a cell onto the table, then settles its piece onto the cell.
///
/// Cells start one after another, [`DELAY_PER_CELL`] apart in id order.
#[derive(Debug, Clone, PartialEq)]
pub struct FallInAnimation {
    delay: Duration,
    clock: AnimClock,
    frame: FallInFrame,
    active: bool,
}

impl FallInAnimation {
    #[must_use]
    pub fn new(id: CellId) -> Self {
        Self {
            delay: DELAY_PER_CELL * u32::from(id.get()),
            clock: AnimClock::default(),
            frame: FallInFrame::HIDDEN,
            active: true,
        }
    }

    /// An animation that has already finished.
    #[must_use]
    pub fn settled() -> Self {
        Self {
            delay: Duration::ZERO,
            clock: AnimClock::default(),
            frame: FallInFrame::SETTLED,
            active: false,
        }
    }
}

impl Animation for FallInAnimation {
    type Frame = FallInFrame;

    #[expect(clippy::cast_precision_loss)]
    fn update(&mut self, now: Timestamp) {
        if !self.active {
            return;
        }
        let elapsed = self.clock.elapsed(now);
        let Some(falling) = elapsed.checked_sub(self.delay) else {
            self.frame = FallInFrame::HIDDEN;
            return;
        };

        if let Some(left) = FALL_DURATION.checked_sub(falling)
            && !left.is_zero()
        {
            let fall_speed = FALL_HEIGHT / FALL_DURATION.as_millis() as f32;
            self.frame = FallInFrame {
                visible: true,
                cell_height: left.as_millis() as f32 * fall_speed,
                piece_offset: PIECE_DROP_OFFSET,
            };
            return;
        }

        let settling = falling - FALL_DURATION;
        match PIECE_SETTLE_DURATION.checked_sub(settling) {
            Some(left) if !left.is_zero() => {
                let r = left.as_millis() as f32 / PIECE_SETTLE_DURATION.as_millis() as f32;
                self.frame = FallInFrame {
                    visible: true,
                    cell_height: 0.0,
                    piece_offset: PIECE_DROP_OFFSET * r,
                };
            }
            _ => {
                self.frame = FallInFrame::SETTLED;
                self.active = false;
            }
        }
    }

    fn apply(&self) -> FallInFrame {
        self.frame
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
