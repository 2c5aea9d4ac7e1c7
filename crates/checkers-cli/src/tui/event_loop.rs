use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// When the screen is redrawn.
#[derive(Debug, Clone, Copy, Default)]
pub enum RenderMode {
    /// Render after every tick or terminal event.
    #[default]
    OnDirty,
    /// Render after state changes, at most once per interval.
    Throttled(Duration),
}

impl RenderMode {
    #[must_use]
    pub fn throttled_from_rate(rate: f64) -> Self {
        Self::Throttled(Duration::from_secs_f64(1.0 / rate))
    }
}

/// Produces ticks, render requests and terminal events in order.
///
/// Ticks are stamped with the time elapsed since the loop was created, so the
/// stamps are monotonic even if ticks are delayed by slow frames.
#[derive(Debug)]
pub(super) struct EventLoop {
    started: Instant,
    tick_interval: Option<Duration>,
    render_mode: RenderMode,
    last_tick: Option<Instant>,
    last_render: Option<Instant>,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl EventLoop {
    pub(super) fn new(started: Instant) -> Self {
        Self {
            started,
            tick_interval: None,
            render_mode: RenderMode::default(),
            last_tick: None,
            last_render: None,
            dirty: true,
        }
    }

    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    pub(super) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
    }

    /// Blocks until the next tick, render or terminal event.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(event) = self.due_event(now) {
                return Ok(event);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    /// Tick or render event due at `now`, ticks first.
    fn due_event(&mut self, now: Instant) -> Option<TuiEvent> {
        let since = |last: Option<Instant>| last.map(|last| now.saturating_duration_since(last));

        if let Some(interval) = self.tick_interval
            && since(self.last_tick).is_none_or(|elapsed| elapsed >= interval)
        {
            self.last_tick = Some(now);
            self.dirty = true;
            return Some(TuiEvent::Tick(now.saturating_duration_since(self.started)));
        }

        let render = match self.render_mode {
            RenderMode::OnDirty => self.dirty,
            RenderMode::Throttled(interval) => {
                self.dirty && since(self.last_render).is_none_or(|elapsed| elapsed >= interval)
            }
        };
        if render {
            self.last_render = Some(now);
            self.dirty = false;
            return Some(TuiEvent::Render);
        }
        None
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self
            .tick_interval
            .map(|interval| self.last_tick.map_or(now, |last| last + interval));
        let next_render_at = match self.render_mode {
            RenderMode::OnDirty => self.dirty.then_some(now),
            RenderMode::Throttled(interval) => self
                .dirty
                .then(|| self.last_render.map_or(now, |last| last + interval)),
        };
        let next_at = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(next_at.saturating_duration_since(now))
    }
}
