use std::fmt;

use crate::{
    FilmError, UndoError,
    anim::{Animation, CameraTransition, CameraView},
    core::{CellId, Side, Timestamp},
    engine::{
        Board, BoardStatus, GameOptions, Layout, PickResponse, ScoreStore, Settings, Timer, Undo,
        score,
    },
};

/// Pick id of the undo button.
pub const UNDO_BUTTON: u32 = 20001;
/// Pick id of the game film button.
pub const FILM_BUTTON: u32 = 20002;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, derive_more::IsVariant)]
pub enum GameState {
    /// The board is still falling into place.
    #[display("create-game")]
    CreateGame,
    #[display("pick-piece")]
    PickPiece,
    #[display("picked-piece")]
    PickedPiece,
    #[display("moving-piece")]
    MovingPiece,
    #[display("game-over")]
    GameOver,
    #[display("show-film")]
    ShowFilm,
    #[display("undo")]
    Undo,
}

/// Answer to a pick, or to the end of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum PickResult {
    Success,
    /// The pick does not correspond to anything legal right now.
    Failure,
    /// The picked piece has no legal move.
    InvalidPiece,
    /// The piece that just captured must capture again.
    PlayAgain,
    Won(Side),
}

/// Something that happened during [`Game::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameEvent {
    /// The board finished its creation animation and the clock started.
    BoardReady,
    /// A move finished animating.
    MoveSettled(PickResult),
    UndoSettled,
    /// The game ended with this side as the winner.
    GameOver(Side),
    /// The game film replayed its last move.
    FilmEnded,
}

/// A checkers game: whose turn it is, the state machine and everything it drives.
///
/// Input arrives through [`Game::pick_handler`]; time only advances through
/// [`Game::update`]. Moves and undos complete on a later update, once the board
/// has finished animating them.
pub struct Game {
    options: GameOptions,
    settings: Settings,
    board: Board,
    timer: Timer,
    turn: Side,
    state: GameState,
    undos: Vec<Undo>,
    pending_undo: Option<Undo>,
    film_cursor: usize,
    camera: Option<CameraTransition>,
    view: CameraView,
    winner: Option<Side>,
    now: Timestamp,
    scores: Box<dyn ScoreStore>,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("options", &self.options)
            .field("turn", &self.turn)
            .field("state", &self.state)
            .field("undos", &self.undos.len())
            .field("winner", &self.winner)
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

impl Game {
    #[must_use]
    pub fn new(options: GameOptions, scores: Box<dyn ScoreStore>) -> Self {
        Self::with_layout(options, Layout::standard(), scores)
    }

    /// A game starting from an arbitrary position.
    #[must_use]
    pub fn with_layout(options: GameOptions, layout: Layout, scores: Box<dyn ScoreStore>) -> Self {
        let settings = Settings::for_size(options.board_size);
        let turn = options.first_turn;
        Self {
            options,
            settings,
            board: Board::new(settings, layout, options.king_rule, turn),
            timer: Timer::new(options.time_limit.as_duration(), turn),
            turn,
            state: GameState::CreateGame,
            undos: Vec::new(),
            pending_undo: None,
            film_cursor: 0,
            camera: None,
            view: CameraView::Player(turn),
            winner: None,
            now: Timestamp::ZERO,
            scores,
        }
    }

    #[must_use]
    pub fn options(&self) -> &GameOptions {
        &self.options
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    #[must_use]
    pub fn turn(&self) -> Side {
        self.turn
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// Moves played so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Undo] {
        &self.undos
    }

    /// Camera transition requested by the last view change, until it completes.
    #[must_use]
    pub fn camera_transition(&self) -> Option<&CameraTransition> {
        self.camera.as_ref()
    }

    #[must_use]
    pub fn view(&self) -> CameraView {
        self.view
    }

    #[must_use]
    pub fn wins(&self, side: Side) -> u32 {
        score::wins(self.scores.as_ref(), side)
    }

    #[must_use]
    pub fn into_score_store(self) -> Box<dyn ScoreStore> {
        self.scores
    }

    /// Skips the board creation animation.
    pub fn skip_creation(&mut self) {
        self.board.skip_creation();
    }

    /// Handles a pick of a cell or a button.
    pub fn pick_handler(&mut self, id: u32) -> PickResult {
        match id {
            UNDO_BUTTON => {
                return match self.undo() {
                    Ok(()) => PickResult::Success,
                    Err(err) => {
                        tracing::warn!(%err, "undo rejected");
                        PickResult::Failure
                    }
                };
            }
            FILM_BUTTON => {
                return match self.show_game_film() {
                    Ok(()) => PickResult::Success,
                    Err(err) => {
                        tracing::debug!(%err, "film refused");
                        PickResult::Failure
                    }
                };
            }
            _ => {}
        }

        let Some(cell) = CellId::from_raw(id) else {
            return PickResult::Failure;
        };
        if !matches!(self.state, GameState::PickPiece | GameState::PickedPiece) {
            return PickResult::Failure;
        }

        match self
            .board
            .pick_handler(cell, self.state, self.turn, self.timer.snapshot())
        {
            PickResponse::Resolved(PickResult::Success) => {
                self.state = GameState::PickedPiece;
                PickResult::Success
            }
            PickResponse::Resolved(result) => result,
            PickResponse::MoveAccepted(undo) => {
                self.undos.push(undo);
                self.state = GameState::MovingPiece;
                self.timer.pause();
                PickResult::Success
            }
        }
    }

    /// Advances the game to `now`.
    pub fn update(&mut self, now: Timestamp) -> Option<GameEvent> {
        self.now = now;
        if let Some(camera) = &mut self.camera {
            camera.update(now);
            if !camera.is_active() {
                self.camera = None;
            }
        }

        let expired = self.timer.update(now);
        let status = self.board.update(now);

        match self.state {
            GameState::CreateGame if self.board.is_created() => Some(self.begin(now)),
            GameState::PickPiece | GameState::PickedPiece if expired => {
                Some(self.end_game(self.turn.opponent()))
            }
            GameState::MovingPiece => match status {
                BoardStatus::MoveFinished { result, promoted } => {
                    Some(self.settle_move(result, promoted))
                }
                _ => None,
            },
            GameState::Undo => match status {
                BoardStatus::UndoFinished { .. } => Some(self.settle_undo()),
                _ => None,
            },
            GameState::ShowFilm => self.step_film(),
            _ => None,
        }
    }

    fn begin(&mut self, now: Timestamp) -> GameEvent {
        self.timer.start(now);
        self.state = GameState::PickPiece;
        tracing::info!(turn = %self.turn, "game started");
        if self.board.valid_moves().is_empty() {
            return self.end_game(self.turn.opponent());
        }
        GameEvent::BoardReady
    }

    fn settle_move(&mut self, result: PickResult, promoted: bool) -> GameEvent {
        if promoted && let Some(undo) = self.undos.last_mut() {
            undo.mark_promoted();
        }
        match result {
            PickResult::PlayAgain => {
                self.state = GameState::PickedPiece;
                self.timer.resume();
            }
            PickResult::Won(side) => return self.end_game(side),
            _ => {
                self.turn = self.turn.opponent();
                self.timer.set_turn(self.turn);
                self.request_camera(CameraView::Player(self.turn));
                self.state = GameState::PickPiece;
                self.timer.resume();
            }
        }
        GameEvent::MoveSettled(result)
    }

    /// Takes back the last move.
    ///
    /// Only allowed while a side is picking. A rejected record stays on the stack.
    pub fn undo(&mut self) -> Result<(), UndoError> {
        if !matches!(self.state, GameState::PickPiece | GameState::PickedPiece) {
            return Err(UndoError::NotAllowed { state: self.state });
        }
        let undo = self.undos.pop().ok_or(UndoError::NothingToUndo)?;
        if let Err(err) = self.board.undo(&undo) {
            self.undos.push(undo);
            return Err(err);
        }
        tracing::info!(mv = ?undo.mv(), "undoing move");
        self.pending_undo = Some(undo);
        self.state = GameState::Undo;
        self.timer.pause();
        Ok(())
    }

    fn settle_undo(&mut self) -> GameEvent {
        if let Some(undo) = self.pending_undo.take() {
            let previous = self.turn;
            self.turn = undo.turn();
            self.board.restore_valid_moves(undo.valid_moves().clone());
            self.timer.undo(undo.timer());
            if previous != self.turn {
                self.request_camera(CameraView::Player(self.turn));
            }
        }
        self.state = GameState::PickPiece;
        GameEvent::UndoSettled
    }

    /// Replays the finished game from the initial position.
    pub fn show_game_film(&mut self) -> Result<(), FilmError> {
        if !self.state.is_game_over() {
            return Err(FilmError::NotGameOver);
        }
        if self.undos.is_empty() {
            return Err(FilmError::EmptyHistory);
        }
        self.board.reset();
        self.timer.stop();
        self.timer.reset(0, self.now);
        self.film_cursor = 0;
        self.request_camera(CameraView::Movie);
        self.state = GameState::ShowFilm;
        tracing::info!(moves = self.undos.len(), "showing game film");
        Ok(())
    }

    fn step_film(&mut self) -> Option<GameEvent> {
        if !self.board.is_created() || self.board.is_busy() {
            return None;
        }
        if let Some(undo) = self.undos.get(self.film_cursor) {
            self.board.execute_move(undo);
            self.film_cursor += 1;
            return None;
        }
        self.state = GameState::GameOver;
        self.request_camera(CameraView::Menu);
        tracing::info!("game film ended");
        Some(GameEvent::FilmEnded)
    }

    fn end_game(&mut self, winner: Side) -> GameEvent {
        self.state = GameState::GameOver;
        self.winner = Some(winner);
        self.board.clear_selection();
        self.timer.stop();
        let total = score::record_win(self.scores.as_mut(), winner);
        tracing::info!(%winner, wins = total, "game over");
        self.request_camera(CameraView::Menu);
        GameEvent::GameOver(winner)
    }

    fn request_camera(&mut self, to: CameraView) {
        if self.view == to {
            return;
        }
        self.camera = Some(CameraTransition::new(
            self.view,
            to,
            self.settings.camera_duration,
        ));
        self.view = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{Position, Rank},
        engine::MemoryScoreStore,
    };

    fn id(row: u8, col: u8) -> u32 {
        u32::from(Position::new(row, col).unwrap().id().get())
    }

    fn ready_game(layout: Layout, first_turn: Side) -> Game {
        let options = GameOptions {
            first_turn,
            ..GameOptions::default()
        };
        let mut game = Game::with_layout(options, layout, Box::new(MemoryScoreStore::new()));
        game.skip_creation();
        assert_eq!(game.update(Timestamp::ZERO), Some(GameEvent::BoardReady));
        game
    }

    #[test]
    fn test_waits_for_board_creation() {
        let mut game = Game::new(GameOptions::default(), Box::new(MemoryScoreStore::new()));
        assert!(game.state().is_create_game());
        assert_eq!(game.update(Timestamp::from_millis(0)), None);
        assert_eq!(game.pick_handler(id(5, 0)), PickResult::Failure);
        assert_eq!(game.update(Timestamp::from_millis(1000)), None);
        assert_eq!(
            game.update(Timestamp::from_millis(5000)),
            Some(GameEvent::BoardReady)
        );
        assert!(game.state().is_pick_piece());
        assert!(game.timer().is_active());
    }

    #[test]
    fn test_pick_transitions() {
        let layout = Layout::empty()
            .with(Position::new(5, 2).unwrap(), Side::Player0, Rank::Normal)
            .with(Position::new(0, 1).unwrap(), Side::Player1, Rank::Normal);
        let mut game = ready_game(layout, Side::Player0);

        assert_eq!(game.pick_handler(id(0, 1)), PickResult::Failure);
        assert_eq!(game.pick_handler(id(3, 3)), PickResult::Failure);
        assert_eq!(game.pick_handler(1), PickResult::Failure);
        assert!(game.state().is_pick_piece());

        assert_eq!(game.pick_handler(id(5, 2)), PickResult::Success);
        assert!(game.state().is_picked_piece());
        assert_eq!(game.pick_handler(id(6, 2)), PickResult::Failure);
        assert!(game.state().is_picked_piece());

        assert_eq!(game.pick_handler(id(4, 1)), PickResult::Success);
        assert!(game.state().is_moving_piece());
        assert_eq!(game.pick_handler(id(5, 2)), PickResult::Failure);
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn test_undo_rejections() {
        let mut game = ready_game(Layout::standard(), Side::Player0);
        assert_eq!(game.undo(), Err(UndoError::NothingToUndo));

        assert_eq!(game.pick_handler(id(0, 5)), PickResult::Success);
        assert_eq!(game.pick_handler(id(1, 4)), PickResult::Success);
        assert_eq!(
            game.undo(),
            Err(UndoError::NotAllowed {
                state: GameState::MovingPiece
            })
        );
        assert_eq!(game.history().len(), 1);
        assert_eq!(game.pick_handler(UNDO_BUTTON), PickResult::Failure);
    }

    #[test]
    fn test_film_requires_game_over() {
        let mut game = ready_game(Layout::standard(), Side::Player0);
        assert_eq!(game.show_game_film(), Err(FilmError::NotGameOver));
        assert_eq!(game.pick_handler(FILM_BUTTON), PickResult::Failure);
    }

    #[test]
    fn test_no_moves_at_start_loses() {
        // player 1's pieces are blocked by the board edge and by each other
        let layout = Layout::empty()
            .with(Position::new(7, 6).unwrap(), Side::Player1, Rank::Normal)
            .with(Position::new(6, 7).unwrap(), Side::Player1, Rank::Normal)
            .with(Position::new(0, 1).unwrap(), Side::Player0, Rank::Normal);
        let options = GameOptions {
            first_turn: Side::Player1,
            ..GameOptions::default()
        };
        let mut game = Game::with_layout(options, layout, Box::new(MemoryScoreStore::new()));
        game.skip_creation();
        assert_eq!(
            game.update(Timestamp::ZERO),
            Some(GameEvent::GameOver(Side::Player0))
        );
        assert!(game.state().is_game_over());
        assert_eq!(game.wins(Side::Player0), 1);
        assert_eq!(game.view(), CameraView::Menu);
    }
}
