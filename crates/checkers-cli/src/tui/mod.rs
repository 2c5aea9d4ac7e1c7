//! Terminal event loop shared by the screens of the game.
//!
//! Ticks carry the time elapsed since the loop started, which the screens hand
//! to the engine as its frame clock.

pub use self::{
    app::App,
    event_loop::RenderMode,
    runtime::Runtime,
    screen::{Screen, ScreenStack, ScreenTransition},
};

mod app;
mod event;
mod event_loop;
mod runtime;
mod screen;
