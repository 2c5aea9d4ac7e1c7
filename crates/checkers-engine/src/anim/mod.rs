//! Time-driven animations.
//!
//! Every animation implements [`Animation`]: it is advanced with the current
//! [`Timestamp`] and exposes the frame computed by the last update. An animation
//! binds its start time on the first update after it is created, so frames only
//! depend on the timestamps passed in and repeated updates with the same
//! timestamp yield the same frame.
//!
//! - [`PromotionAnimation`] - Crown plates rising or falling
//! - [`FallInAnimation`] - Cells dropping onto the table when a board is created
//! - [`InvalidPickAnimation`] - Bounce of a piece that cannot be picked
//! - [`CaptureAnimation`] - Captured piece hopping to (or back from) its support
//! - [`CameraTransition`] - Interpolation between two camera poses

use std::time::Duration;

use crate::core::Timestamp;

pub use self::{bounce::*, camera::*, capture::*, fall::*, promotion::*};

mod bounce;
mod camera;
mod capture;
mod fall;
mod promotion;

pub trait Animation {
    type Frame;

    /// Advances the animation to `now`.
    fn update(&mut self, now: Timestamp);

    /// The frame computed by the last update.
    fn apply(&self) -> Self::Frame;

    /// Whether the animation has frames left to play.
    fn is_active(&self) -> bool;
}

/// Direction in which a reversible animation is played.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Playback {
    #[default]
    Forward,
    Reverse,
}

/// Start time bound on first use.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AnimClock {
    start: Option<Timestamp>,
}

impl AnimClock {
    pub(crate) fn elapsed(&mut self, now: Timestamp) -> Duration {
        let start = *self.start.get_or_insert(now);
        now.saturating_duration_since(start)
    }
}

/// `elapsed / total`, clamped to `[0, 1]`.
pub(crate) fn ratio(elapsed: Duration, total: Duration) -> f32 {
    if total.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_binds_on_first_use() {
        let mut clock = AnimClock::default();
        assert_eq!(clock.elapsed(Timestamp::from_millis(500)), Duration::ZERO);
        assert_eq!(
            clock.elapsed(Timestamp::from_millis(800)),
            Duration::from_millis(300)
        );
        assert_eq!(clock.elapsed(Timestamp::from_millis(100)), Duration::ZERO);
    }

    #[test]
    fn test_ratio_is_clamped() {
        let total = Duration::from_millis(200);
        assert!((ratio(Duration::from_millis(50), total) - 0.25).abs() < 1e-6);
        assert!((ratio(Duration::from_millis(400), total) - 1.0).abs() < 1e-6);
        assert!((ratio(Duration::ZERO, Duration::ZERO) - 1.0).abs() < 1e-6);
    }
}
