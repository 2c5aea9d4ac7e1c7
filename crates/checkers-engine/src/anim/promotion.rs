use std::time::Duration;

use crate::{
    anim::{AnimClock, Animation, Playback, ratio},
    core::Timestamp,
};

const TRANSFORM_DURATION: Duration = Duration::from_secs(1);

/// Raises (crowning) or lowers (uncrowning) the two crown plates of a piece.
///
/// The frame is the crown stack height in plate units: the lower plate rises
/// during the first half of the transition and the upper plate follows during the
/// second half.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionAnimation {
    playback: Playback,
    clock: AnimClock,
    delta: f32,
    active: bool,
}

impl PromotionAnimation {
    #[must_use]
    pub fn crown() -> Self {
        Self {
            playback: Playback::Forward,
            clock: AnimClock::default(),
            delta: 0.0,
            active: true,
        }
    }

    #[must_use]
    pub fn uncrown() -> Self {
        Self {
            playback: Playback::Reverse,
            clock: AnimClock::default(),
            delta: 1.0,
            active: true,
        }
    }

    #[must_use]
    pub fn playback(&self) -> Playback {
        self.playback
    }
}

impl Animation for PromotionAnimation {
    type Frame = f32;

    fn update(&mut self, now: Timestamp) {
        if !self.active {
            return;
        }
        let r = ratio(self.clock.elapsed(now), TRANSFORM_DURATION);
        self.delta = match self.playback {
            Playback::Forward => r,
            Playback::Reverse => 1.0 - r,
        };
        if r >= 1.0 {
            self.active = false;
        }
    }

    fn apply(&self) -> f32 {
        if self.delta >= 0.5 {
            self.delta * 2.0
        } else {
            self.delta / 0.5
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crown_height_profile() {
        let mut anim = PromotionAnimation::crown();
        anim.update(Timestamp::from_millis(0));
        assert!(anim.apply().abs() < 1e-6);
        anim.update(Timestamp::from_millis(250));
        assert!((anim.apply() - 0.5).abs() < 1e-6);
        anim.update(Timestamp::from_millis(750));
        assert!((anim.apply() - 1.5).abs() < 1e-6);
        assert!(anim.is_active());
        anim.update(Timestamp::from_millis(1000));
        assert!((anim.apply() - 2.0).abs() < 1e-6);
        assert!(!anim.is_active());
    }

    #[test]
    fn test_uncrown_runs_backwards() {
        let mut anim = PromotionAnimation::uncrown();
        anim.update(Timestamp::from_millis(10));
        assert!((anim.apply() - 2.0).abs() < 1e-6);
        anim.update(Timestamp::from_millis(1010));
        assert!(anim.apply().abs() < 1e-6);
        assert!(!anim.is_active());
    }
}
