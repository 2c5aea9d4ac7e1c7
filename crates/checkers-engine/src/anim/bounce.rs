use std::time::Duration;

use glam::{Mat4, Vec3};

use crate::{
    anim::{AnimClock, Animation, ratio},
    core::Timestamp,
};

const BOUNCE_DURATION: Duration = Duration::from_millis(150);
const JUMP_FACTOR: f32 = 0.25;

/// Short hop of a piece that the player tried to pick but cannot move.
///
/// The height follows a triangular profile peaking at a quarter of the cell size.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidPickAnimation {
    cell_size: f32,
    clock: AnimClock,
    height: f32,
    active: bool,
}

impl InvalidPickAnimation {
    #[must_use]
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            clock: AnimClock::default(),
            height: 0.0,
            active: true,
        }
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.height
    }
}

impl Animation for InvalidPickAnimation {
    type Frame = Mat4;

    fn update(&mut self, now: Timestamp) {
        if !self.active {
            return;
        }
        let r = ratio(self.clock.elapsed(now), BOUNCE_DURATION);
        if r >= 1.0 {
            self.active = false;
        }
        let rising = if r > 0.5 { 1.0 - r } else { r };
        self.height = rising / 0.5 * self.cell_size * JUMP_FACTOR;
    }

    fn apply(&self) -> Mat4 {
        // Piece space points its height axis down, towards -z.
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.height))
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounce_peaks_midway() {
        let mut anim = InvalidPickAnimation::new(0.75);
        anim.update(Timestamp::from_millis(1000));
        assert!(anim.height().abs() < 1e-6);

        anim.update(Timestamp::from_millis(1075));
        assert!((anim.height() - 0.75 * JUMP_FACTOR).abs() < 1e-5);
        assert!(anim.is_active());

        anim.update(Timestamp::from_millis(1150));
        assert!(anim.height().abs() < 1e-5);
        assert!(!anim.is_active());
        assert_eq!(anim.apply(), Mat4::IDENTITY);
    }
}
