use std::{fmt, time::Duration};

use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::{App, Runtime};

/// One screen of the application, such as the menu or a game in progress.
///
/// [`on_active`] runs whenever the screen comes to the foreground, either when
/// it is first shown or when the screen above it is popped. Configure the tick
/// rate and render mode there. [`on_close`] runs once, when the screen leaves
/// the stack for good.
///
/// [`on_active`]: Self::on_active
/// [`on_close`]: Self::on_close
pub trait Screen: fmt::Debug {
    fn on_active(&mut self, runtime: &mut Runtime);

    fn on_close(&mut self, runtime: &mut Runtime);

    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event) -> ScreenTransition;

    /// Advances the screen; `elapsed` is the time since the loop started.
    fn update(&mut self, runtime: &mut Runtime, elapsed: Duration);

    fn draw(&self, frame: &mut Frame);
}

/// What happens to the stack after a screen handled an event.
#[derive(Debug)]
pub enum ScreenTransition {
    Stay,
    /// Shows a new screen on top, keeping the current one below it.
    Push(Box<dyn Screen>),
    /// Closes the current screen and reactivates the one below.
    Pop,
    /// Closes the current screen and shows a new one in its place.
    Replace(Box<dyn Screen>),
    /// Closes every screen.
    Exit,
}

/// Stack of screens; only the top one receives events and is drawn.
#[derive(Debug)]
pub struct ScreenStack {
    screens: Vec<Box<dyn Screen>>,
    should_exit: bool,
}

impl ScreenStack {
    #[must_use]
    pub fn new(initial: Box<dyn Screen>) -> Self {
        Self {
            screens: vec![initial],
            should_exit: false,
        }
    }

    fn close_top(&mut self, runtime: &mut Runtime) {
        if let Some(mut screen) = self.screens.pop() {
            screen.on_close(runtime);
        }
    }

    fn apply(&mut self, runtime: &mut Runtime, transition: ScreenTransition) {
        match transition {
            ScreenTransition::Stay => {}
            ScreenTransition::Push(mut screen) => {
                screen.on_active(runtime);
                self.screens.push(screen);
            }
            ScreenTransition::Pop => {
                self.close_top(runtime);
                if let Some(screen) = self.screens.last_mut() {
                    screen.on_active(runtime);
                }
            }
            ScreenTransition::Replace(mut screen) => {
                self.close_top(runtime);
                screen.on_active(runtime);
                self.screens.push(screen);
            }
            ScreenTransition::Exit => {
                while !self.screens.is_empty() {
                    self.close_top(runtime);
                }
                self.should_exit = true;
            }
        }
    }
}

impl App for ScreenStack {
    fn init(&mut self, runtime: &mut Runtime) {
        if let Some(screen) = self.screens.last_mut() {
            screen.on_active(runtime);
        }
    }

    fn should_exit(&self) -> bool {
        self.should_exit || self.screens.is_empty()
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: Event) {
        if let Some(screen) = self.screens.last_mut() {
            let transition = screen.handle_event(runtime, &event);
            self.apply(runtime, transition);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        if let Some(screen) = self.screens.last() {
            screen.draw(frame);
        }
    }

    fn update(&mut self, runtime: &mut Runtime, elapsed: Duration) {
        if let Some(screen) = self.screens.last_mut() {
            screen.update(runtime, elapsed);
        }
    }
}
