use std::time::Duration;

use crossterm::event::Event as CrosstermEvent;

#[derive(Debug, Clone)]
pub(super) enum TuiEvent {
    /// Time to advance the application, with the time since the loop started.
    Tick(Duration),
    Render,
    Crossterm(CrosstermEvent),
}

impl From<CrosstermEvent> for TuiEvent {
    fn from(event: CrosstermEvent) -> Self {
        Self::Crossterm(event)
    }
}
