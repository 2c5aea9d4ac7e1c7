use std::time::Duration;

use glam::Vec3;

use crate::{
    anim::{AnimClock, Animation, ratio},
    core::{Side, Timestamp},
    engine::BoardSize,
};

/// The camera a game can ask the scene to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, derive_more::IsVariant)]
pub enum CameraView {
    /// Behind the given player's pieces.
    #[display("{_0}")]
    Player(Side),
    /// Overview used while the game film plays.
    #[display("movie")]
    Movie,
    #[display("menu")]
    Menu,
}

impl CameraView {
    /// Id of the scene camera for this view.
    #[must_use]
    pub fn camera_id(self, size: BoardSize) -> String {
        match self {
            Self::Player(Side::Player0) => format!("checkers-{size}-p0-1"),
            Self::Player(Side::Player1) => format!("checkers-{size}-p1-1"),
            Self::Movie => format!("checkers-{size}-movie"),
            Self::Menu => "menu".to_owned(),
        }
    }
}

/// A camera placement, as the scene describes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
    pub fov: f32,
}

impl CameraPose {
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            target: self.target.lerp(other.target, t),
            fov: self.fov + (other.fov - self.fov) * t,
        }
    }
}

/// Request to move the scene camera from one view to another.
///
/// The game only tracks the progress; the scene owns the poses and blends them
/// with [`CameraTransition::pose`].
#[derive(Debug, Clone, PartialEq)]
pub struct CameraTransition {
    from: CameraView,
    to: CameraView,
    duration: Duration,
    clock: AnimClock,
    progress: f32,
    active: bool,
}

impl CameraTransition {
    #[must_use]
    pub fn new(from: CameraView, to: CameraView, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            clock: AnimClock::default(),
            progress: 0.0,
            active: true,
        }
    }

    #[must_use]
    pub fn from(&self) -> CameraView {
        self.from
    }

    #[must_use]
    pub fn to(&self) -> CameraView {
        self.to
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub fn pose(&self, from: &CameraPose, to: &CameraPose) -> CameraPose {
        from.lerp(to, self.progress)
    }
}

impl Animation for CameraTransition {
    type Frame = f32;

    fn update(&mut self, now: Timestamp) {
        if !self.active {
            return;
        }
        self.progress = ratio(self.clock.elapsed(now), self.duration);
        if self.progress >= 1.0 {
            self.active = false;
        }
    }

    fn apply(&self) -> f32 {
        self.progress
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
