use std::time::Duration;

use checkers_engine::{Game, GameState, Side};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block as BlockWidget, BlockExt, Paragraph, Widget},
};

use crate::view::widgets::style;

/// A running clock turns red below this.
const LOW_TIME: Duration = Duration::from_secs(30);

/// Both clocks, the win counters and what the game is waiting for.
#[derive(Debug)]
pub struct ClockDisplay<'a> {
    game: &'a Game,
    block: Option<BlockWidget<'a>>,
}

impl<'a> ClockDisplay<'a> {
    pub fn new(game: &'a Game) -> Self {
        Self { game, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        26 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        4 + super::block_vertical_margin(self.block.as_ref())
    }

    fn clock_line(&self, side: Side) -> Line<'static> {
        let timer = self.game.timer();
        let running = timer.is_active() && timer.turn() == side;
        let clock_style = if running && timer.time_left(side) < LOW_TIME {
            style::EXPIRING_CLOCK
        } else if running {
            style::ACTIVE_CLOCK
        } else {
            style::DEFAULT
        };
        Line::from(vec![
            Span::styled(format!("{:<8}", side.to_string()), style::LABEL),
            Span::styled(format!(" {} ", timer.display_time(side)), clock_style),
            Span::raw(format!("  wins {:>3}", self.game.wins(side))),
        ])
    }

    fn status_line(&self) -> Line<'static> {
        let text = match (self.game.state(), self.game.winner()) {
            (GameState::GameOver, Some(winner)) => format!("{winner} wins"),
            (GameState::GameOver, None) => "game over".to_owned(),
            (GameState::CreateGame, _) => "setting up".to_owned(),
            (GameState::ShowFilm, _) => "replaying".to_owned(),
            (GameState::Undo, _) => "undoing".to_owned(),
            (_, _) => format!("{} to play", self.game.turn()),
        };
        Line::from(text).centered()
    }
}

impl Widget for ClockDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &ClockDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let lines = vec![
            self.clock_line(Side::Player0),
            self.clock_line(Side::Player1),
            Line::default(),
            self.status_line(),
        ];
        Paragraph::new(lines).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use checkers_engine::{GameOptions, MemoryScoreStore};

    use super::*;

    fn rendered_lines(display: &ClockDisplay) -> Vec<String> {
        let area = Rect::new(0, 0, display.width(), display.height());
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
        (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol()).collect())
            .collect()
    }

    #[test]
    fn test_shows_full_clocks_before_start() {
        let game = Game::new(GameOptions::default(), Box::new(MemoryScoreStore::new()));
        let lines = rendered_lines(&ClockDisplay::new(&game));
        assert!(lines[0].starts_with("player0"));
        assert!(lines[0].contains("10:00"));
        assert!(lines[1].contains("10:00"));
        assert!(lines[3].contains("setting up"));
    }

    #[test]
    fn test_status_names_side_to_play() {
        let mut game = Game::new(GameOptions::default(), Box::new(MemoryScoreStore::new()));
        game.skip_creation();
        game.update(checkers_engine::Timestamp::ZERO);
        let lines = rendered_lines(&ClockDisplay::new(&game));
        assert!(lines[3].contains("player0 to play"));
    }
}
