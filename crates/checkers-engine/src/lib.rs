pub use self::{anim::*, core::*, engine::*};

pub mod anim;
pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum UndoError {
    #[display("no move left to undo")]
    NothingToUndo,
    #[display("undo is not allowed while the game is in {state} state")]
    NotAllowed { state: GameState },
    #[display("a piece animation is still in flight")]
    AnimationInFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum FilmError {
    #[display("the film can only be shown once the game is over")]
    NotGameOver,
    #[display("no move has been played in this game")]
    EmptyHistory,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid {kind}: {value:?}")]
pub struct ParseOptionError {
    kind: &'static str,
    value: String,
}

impl ParseOptionError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}
