use std::time::Duration;

use checkers_engine::{BOARD_DIM, Game, GameEvent, GameState, PickResult, Position, Side, Timestamp};
use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding},
};

use crate::{
    command::play::Setup,
    store::SharedScoreStore,
    tui::{RenderMode, Runtime, Screen, ScreenTransition},
    view::widgets::{
        BoardDisplay, ClockDisplay, KeyBinding, KeyBindingDisplay, SupportDisplay, color, style,
    },
};

const PICK_BINDINGS: &[KeyBinding] = &[
    (&["←", "↓", "↑", "→"], "Cursor"),
    (&["Enter"], "Pick"),
    (&["u"], "Undo"),
    (&["n"], "New"),
    (&["m"], "Menu"),
    (&["q"], "Quit"),
];
const GAME_OVER_BINDINGS: &[KeyBinding] = &[
    (&["f"], "Film"),
    (&["n"], "New"),
    (&["m"], "Menu"),
    (&["q"], "Quit"),
];
const BUSY_BINDINGS: &[KeyBinding] = &[(&["n"], "New"), (&["m"], "Menu"), (&["q"], "Quit")];

/// A game in progress, driven by the keyboard.
///
/// The cursor stands in for the pointer: picking sends the id of the cell
/// under it to the game.
#[derive(Debug)]
pub(crate) struct GameScreen {
    setup: Setup,
    scores: SharedScoreStore,
    fps: f64,
    game: Game,
    /// `(row, col)` under the cursor.
    cursor: (u8, u8),
    notice: Option<String>,
}

impl GameScreen {
    pub(crate) fn new(setup: Setup, scores: SharedScoreStore, fps: f64) -> Self {
        let game = new_game(&setup, &scores);
        Self {
            setup,
            scores,
            fps,
            game,
            cursor: (3, 4),
            notice: None,
        }
    }

    fn cursor(&self) -> Option<Position> {
        Position::new(self.cursor.0, self.cursor.1)
    }

    fn move_cursor(&mut self, drow: i8, dcol: i8) {
        let clamp = |value: u8, delta: i8| value.saturating_add_signed(delta).min(BOARD_DIM - 1);
        self.cursor = (clamp(self.cursor.0, drow), clamp(self.cursor.1, dcol));
    }

    fn pick(&mut self) {
        let Some(pos) = self.cursor() else {
            return;
        };
        let result = self.game.pick_handler(u32::from(pos.id().get()));
        tracing::debug!(cell = %pos, ?result, "pick");
        self.notice = match result {
            PickResult::Failure => Some("Not a legal pick".to_owned()),
            PickResult::InvalidPiece => Some("That piece cannot move".to_owned()),
            _ => None,
        };
    }

    fn undo(&mut self) {
        self.notice = self.game.undo().err().map(|err| capitalize(&err.to_string()));
    }

    fn show_film(&mut self) {
        self.notice = self
            .game
            .show_game_film()
            .err()
            .map(|err| capitalize(&err.to_string()));
    }

    fn restart(&mut self) {
        self.game = new_game(&self.setup, &self.scores);
        self.notice = None;
    }

    fn bindings(&self) -> &'static [KeyBinding<'static>] {
        match self.game.state() {
            GameState::PickPiece | GameState::PickedPiece => PICK_BINDINGS,
            GameState::GameOver => GAME_OVER_BINDINGS,
            _ => BUSY_BINDINGS,
        }
    }
}

fn new_game(setup: &Setup, scores: &SharedScoreStore) -> Game {
    let options = setup.options(&mut rand::rng());
    tracing::info!(?options, "new game");
    Game::new(options, Box::new(scores.clone()))
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

fn timestamp(elapsed: Duration) -> Timestamp {
    Timestamp::from_millis(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}

impl Screen for GameScreen {
    fn on_active(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(Some(self.fps));
        runtime.set_render_mode(RenderMode::throttled_from_rate(self.fps));
    }

    fn on_close(&mut self, _runtime: &mut Runtime) {
        tracing::debug!(state = %self.game.state(), "leaving game");
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) -> ScreenTransition {
        let Some(event) = event.as_key_event() else {
            return ScreenTransition::Stay;
        };
        match event.code {
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(-1, 0),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(1, 0),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(0, -1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(0, 1),
            KeyCode::Enter | KeyCode::Char(' ') => self.pick(),
            KeyCode::Char('u') => self.undo(),
            KeyCode::Char('f') => self.show_film(),
            KeyCode::Char('n') => self.restart(),
            KeyCode::Char('m') | KeyCode::Esc => return ScreenTransition::Pop,
            KeyCode::Char('q') => return ScreenTransition::Exit,
            _ => {}
        }
        ScreenTransition::Stay
    }

    fn update(&mut self, _runtime: &mut Runtime, elapsed: Duration) {
        let Some(event) = self.game.update(timestamp(elapsed)) else {
            return;
        };
        tracing::debug!(?event, "game event");
        match event {
            GameEvent::MoveSettled(PickResult::PlayAgain) => {
                self.notice = Some("Capture again with the same piece".to_owned());
            }
            GameEvent::FilmEnded => self.notice = Some("End of the film".to_owned()),
            _ => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let picking = self.game.state().is_pick_piece() || self.game.state().is_picked_piece();
        let board_block = Block::bordered()
            .title(Line::from(format!("CHECKERS  camera: {}", self.game.view())).centered())
            .padding(Padding::symmetric(1, 0))
            .style(style::DEFAULT);
        let board = match self.cursor() {
            Some(cursor) if picking => BoardDisplay::new(self.game.board()).cursor(cursor),
            _ => BoardDisplay::new(self.game.board()),
        }
        .block(board_block);
        let clock = ClockDisplay::new(&self.game).block(
            Block::bordered()
                .title(Line::from("CLOCK").centered())
                .padding(Padding::symmetric(1, 0))
                .style(style::DEFAULT),
        );
        let supports = Side::ALL.map(|side| {
            SupportDisplay::new(self.game.board().support(side)).block(
                Block::bordered()
                    .title(Line::from(format!("LOST BY {side}")).centered())
                    .padding(Padding::symmetric(1, 0))
                    .style(style::DEFAULT),
            )
        });
        let notice = Text::from(self.notice.as_deref().unwrap_or_default())
            .style(Style::new().fg(color::YELLOW))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        let [board_column, side_column] = Layout::horizontal([
            Constraint::Length(board.width()),
            Constraint::Length(clock.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(main_area);
        let [board_area] =
            Layout::vertical([Constraint::Length(board.height())]).areas(board_column);
        let [clock_area, p0_area, p1_area, notice_area] = Layout::vertical([
            Constraint::Length(clock.height()),
            Constraint::Length(supports[0].height()),
            Constraint::Length(supports[1].height()),
            Constraint::Length(2),
        ])
        .areas(side_column);

        frame.render_widget(&board, board_area);
        frame.render_widget(clock, clock_area);
        let [p0_support, p1_support] = supports;
        frame.render_widget(p0_support, p0_area);
        frame.render_widget(p1_support, p1_area);
        frame.render_widget(notice, notice_area);
        frame.render_widget(KeyBindingDisplay::new(self.bindings()), help_area);

        if self.game.state().is_game_over() {
            let text = match self.game.winner() {
                Some(winner) => format!("{} WINS", winner.to_string().to_uppercase()),
                None => "GAME OVER".to_owned(),
            };
            let style = Style::new().fg(color::BLACK).bg(color::YELLOW);
            let popup_area = board_area.centered(Constraint::Length(20), Constraint::Length(3));
            let text_area = popup_area.centered_vertically(Constraint::Length(1));
            frame.render_widget(Clear, popup_area);
            frame.render_widget(Block::new().style(style), popup_area);
            frame.render_widget(Text::styled(text, style).centered(), text_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use checkers_engine::MemoryScoreStore;
    use crossterm::event::KeyEvent;

    use super::*;

    fn screen() -> GameScreen {
        let scores = SharedScoreStore::new(MemoryScoreStore::new());
        let mut screen = GameScreen::new(Setup::default(), scores, 60.0);
        screen.game.skip_creation();
        screen.update(&mut Runtime::new(), Duration::ZERO);
        screen
    }

    fn press(screen: &mut GameScreen, code: KeyCode) -> ScreenTransition {
        screen.handle_event(&mut Runtime::new(), &Event::Key(KeyEvent::from(code)))
    }

    fn move_cursor_to(screen: &mut GameScreen, row: u8, col: u8) {
        screen.cursor = (row, col);
    }

    #[test]
    fn test_cursor_stays_on_board() {
        let mut screen = screen();
        for _ in 0..10 {
            press(&mut screen, KeyCode::Left);
            press(&mut screen, KeyCode::Down);
        }
        assert_eq!(screen.cursor, (0, BOARD_DIM - 1));
    }

    #[test]
    fn test_pick_then_move() {
        let mut screen = screen();
        assert_eq!(screen.game.state(), GameState::PickPiece);

        move_cursor_to(&mut screen, 0, 5);
        press(&mut screen, KeyCode::Enter);
        assert_eq!(screen.game.state(), GameState::PickedPiece);

        press(&mut screen, KeyCode::Right);
        press(&mut screen, KeyCode::Up);
        press(&mut screen, KeyCode::Enter);
        assert_eq!(screen.game.state(), GameState::MovingPiece);
        assert!(screen.notice.is_none());
    }

    #[test]
    fn test_rejected_pick_and_undo_leave_notice() {
        let mut screen = screen();
        move_cursor_to(&mut screen, 1, 2);
        press(&mut screen, KeyCode::Enter);
        assert_eq!(screen.notice.as_deref(), Some("Not a legal pick"));

        press(&mut screen, KeyCode::Char('u'));
        assert_eq!(screen.notice.as_deref(), Some("No move left to undo"));

        press(&mut screen, KeyCode::Char('f'));
        assert_eq!(
            screen.notice.as_deref(),
            Some("The film can only be shown once the game is over")
        );
    }

    #[test]
    fn test_exit_keys() {
        let mut screen = screen();
        assert!(matches!(press(&mut screen, KeyCode::Char('m')), ScreenTransition::Pop));
        assert!(matches!(press(&mut screen, KeyCode::Char('q')), ScreenTransition::Exit));
        assert!(matches!(press(&mut screen, KeyCode::Char('x')), ScreenTransition::Stay));
    }

    #[test]
    fn test_restart_starts_over() {
        let mut screen = screen();
        screen.restart();
        assert_eq!(screen.game.state(), GameState::CreateGame);
        assert!(screen.game.history().is_empty());
    }
}
