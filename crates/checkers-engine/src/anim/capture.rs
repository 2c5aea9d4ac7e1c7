use std::{f32::consts::FRAC_PI_2, time::Duration};

use glam::{Mat4, Vec2, Vec3};

use crate::{
    anim::{AnimClock, Animation, Playback},
    core::Timestamp,
};

const LIFT_DURATION: Duration = Duration::from_millis(300);
const HOP_DURATION: Duration = Duration::from_secs(1);
const DROP_DURATION: Duration = Duration::from_millis(300);

const LARGE_LIFT_HEIGHT: f32 = 1.5;
const LARGE_HOP_HEIGHT: f32 = 5.0;
const SMALL_LIFT_HEIGHT: f32 = 0.5;
const SMALL_HOP_HEIGHT: f32 = 1.0;

/// Cells bigger than this belong to the large board, which also tilts hopping pieces.
const LARGE_CELL_THRESHOLD: f32 = 0.5;

/// Where a captured piece ends up, relative to the cell it was captured on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureTarget {
    /// Support position relative to the cell centre, in cell units.
    pub offset: Vec2,
    /// Height of the support top.
    pub support_height: f32,
    /// Height of the stack slot the piece comes to rest on.
    pub slot_height: f32,
}

/// Three-stage hop of a captured piece to its side's support.
///
/// The piece is lifted, follows a quadratic Bezier arc over to the support, and is
/// dropped onto the top of the stack. Reverse playback runs the same timeline
/// backwards, from the stack to the cell.
///
/// Frames are piece-space transforms: x follows board rows, y follows board
/// columns and -z points up.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureAnimation {
    playback: Playback,
    tilts: bool,
    lift: Vec3,
    control: Vec3,
    landing: Vec3,
    rest: Vec3,
    clock: AnimClock,
    transform: Mat4,
    active: bool,
}

impl CaptureAnimation {
    #[must_use]
    pub fn new(cell_size: f32, target: CaptureTarget, playback: Playback) -> Self {
        let large = cell_size > LARGE_CELL_THRESHOLD;
        let (lift_height, hop_height) = if large {
            (LARGE_LIFT_HEIGHT, LARGE_HOP_HEIGHT)
        } else {
            (SMALL_LIFT_HEIGHT, SMALL_HOP_HEIGHT)
        };
        let CaptureTarget {
            offset,
            support_height,
            slot_height,
        } = target;

        let mut anim = Self {
            playback,
            tilts: large,
            lift: Vec3::new(0.0, 0.0, -lift_height),
            control: Vec3::new(offset.x / 2.0, offset.y / 2.0, -hop_height),
            landing: Vec3::new(offset.x, offset.y, -support_height),
            rest: Vec3::new(offset.x, offset.y, slot_height),
            clock: AnimClock::default(),
            transform: Mat4::IDENTITY,
            active: true,
        };
        anim.transform = match playback {
            Playback::Forward => anim.frame_at(Duration::ZERO),
            Playback::Reverse => anim.frame_at(Self::total_duration()),
        };
        anim
    }

    #[must_use]
    pub fn total_duration() -> Duration {
        LIFT_DURATION + HOP_DURATION + DROP_DURATION
    }

    #[must_use]
    pub fn playback(&self) -> Playback {
        self.playback
    }

    /// Frame at `t` along the forward timeline.
    fn frame_at(&self, t: Duration) -> Mat4 {
        let lifted_tilt = if self.tilts { FRAC_PI_2 } else { 0.0 };

        let (translation, tilt) = if t < LIFT_DURATION {
            let r = t.as_secs_f32() / LIFT_DURATION.as_secs_f32();
            (Vec3::ZERO.lerp(self.lift, r), lifted_tilt * r)
        } else if t <= LIFT_DURATION + HOP_DURATION {
            let r = (t - LIFT_DURATION).as_secs_f32() / HOP_DURATION.as_secs_f32();
            (
                quadratic_bezier(self.lift, self.control, self.landing, r),
                lifted_tilt * (1.0 - r),
            )
        } else {
            let r = (t - LIFT_DURATION - HOP_DURATION).as_secs_f32() / DROP_DURATION.as_secs_f32();
            (self.landing.lerp(self.rest, r.min(1.0)), 0.0)
        };

        Mat4::from_translation(translation) * Mat4::from_rotation_x(tilt)
    }
}

fn quadratic_bezier(p0: Vec3, p1: Vec3, p2: Vec3, t: f32) -> Vec3 {
    let u = 1.0 - t;
    p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
}

impl Animation for CaptureAnimation {
    type Frame = Mat4;

    fn update(&mut self, now: Timestamp) {
        if !self.active {
            return;
        }
        let total = Self::total_duration();
        let elapsed = self.clock.elapsed(now).min(total);
        let t = match self.playback {
            Playback::Forward => elapsed,
            Playback::Reverse => total - elapsed,
        };
        self.transform = self.frame_at(t);
        if elapsed >= total {
            self.active = false;
        }
    }

    fn apply(&self) -> Mat4 {
        self.transform
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
