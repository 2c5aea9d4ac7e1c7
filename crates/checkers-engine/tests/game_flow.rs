use checkers_engine::{
    CellId, FILM_BUTTON, Game, GameEvent, GameOptions, GamePiece, GameState, Layout,
    MemoryScoreStore, PickResult, Position, Rank, Side, Timestamp, UNDO_BUTTON, UndoError,
};

const FRAME_MS: u64 = 16;
const MAX_FRAMES: usize = 5_000;

fn pos(row: u8, col: u8) -> Position {
    Position::new(row, col).unwrap()
}

fn pick_id(row: u8, col: u8) -> u32 {
    u32::from(pos(row, col).id().get())
}

/// Drives a game with a deterministic frame clock.
struct Driver {
    game: Game,
    now: u64,
}

impl Driver {
    fn new(layout: Layout, options: GameOptions) -> Self {
        let mut game = Game::with_layout(options, layout, Box::new(MemoryScoreStore::new()));
        game.skip_creation();
        let mut driver = Self { game, now: 0 };
        let event = driver.tick();
        assert!(
            matches!(event, Some(GameEvent::BoardReady | GameEvent::GameOver(_))),
            "unexpected event {event:?}"
        );
        driver
    }

    fn with_turn(layout: Layout, first_turn: Side) -> Self {
        Self::new(
            layout,
            GameOptions {
                first_turn,
                ..GameOptions::default()
            },
        )
    }

    fn tick(&mut self) -> Option<GameEvent> {
        self.now += FRAME_MS;
        self.game.update(Timestamp::from_millis(self.now))
    }

    /// Runs frames until the game reports an event.
    fn run_until_event(&mut self) -> GameEvent {
        for _ in 0..MAX_FRAMES {
            if let Some(event) = self.tick() {
                return event;
            }
        }
        panic!("no event after {MAX_FRAMES} frames in state {}", self.game.state());
    }

    fn play(&mut self, from: (u8, u8), to: (u8, u8)) -> GameEvent {
        assert_eq!(self.game.pick_handler(pick_id(from.0, from.1)), PickResult::Success);
        assert_eq!(self.game.pick_handler(pick_id(to.0, to.1)), PickResult::Success);
        assert!(self.game.state().is_moving_piece());
        self.run_until_event()
    }
}

fn assert_partition(game: &Game) {
    assert!(game.board().sets().is_partition());
}

#[test]
fn test_quiet_move_swaps_turn() {
    let mut driver = Driver::with_turn(Layout::standard(), Side::Player0);
    let event = driver.play((0, 5), (1, 4));
    assert_eq!(event, GameEvent::MoveSettled(PickResult::Success));
    assert_eq!(driver.game.turn(), Side::Player1);
    assert!(driver.game.state().is_pick_piece());
    assert_eq!(
        driver.game.board().cell(pos(1, 4).id()).piece().map(GamePiece::side),
        Some(Side::Player0)
    );
    assert!(driver.game.board().cell(pos(0, 5).id()).is_empty());
    assert!(driver.game.camera_transition().is_some());
    assert_partition(&driver.game);
}

#[test]
fn test_partition_holds_every_frame() {
    let layout = Layout::empty()
        .with(pos(2, 6), Side::Player0, Rank::Normal)
        .with(pos(3, 5), Side::Player1, Rank::Normal)
        .with(pos(0, 1), Side::Player1, Rank::Normal);
    let mut driver = Driver::with_turn(layout, Side::Player0);
    driver.game.pick_handler(pick_id(2, 6));
    driver.game.pick_handler(pick_id(4, 4));
    for _ in 0..MAX_FRAMES {
        assert_partition(&driver.game);
        if driver.tick().is_some() {
            break;
        }
    }
    assert_partition(&driver.game);
    assert_eq!(driver.game.board().support(Side::Player1).len(), 1);
}

#[test]
fn test_capture_and_play_again() {
    let layout = Layout::empty()
        .with(pos(2, 6), Side::Player0, Rank::Normal)
        .with(pos(3, 5), Side::Player1, Rank::Normal)
        .with(pos(5, 3), Side::Player1, Rank::Normal)
        .with(pos(0, 1), Side::Player1, Rank::Normal);
    let mut driver = Driver::with_turn(layout, Side::Player0);

    let event = driver.play((2, 6), (4, 4));
    assert_eq!(event, GameEvent::MoveSettled(PickResult::PlayAgain));
    assert_eq!(driver.game.turn(), Side::Player0);
    assert!(driver.game.state().is_picked_piece());
    assert_eq!(driver.game.board().selected(), Some(pos(4, 4).id()));
    assert!(driver.game.board().cell(pos(3, 5).id()).is_empty());

    // only the capturing piece may continue
    let moves = driver.game.board().valid_moves();
    assert_eq!(moves.origins().collect::<Vec<_>>(), vec![pos(4, 4).id()]);

    assert_eq!(driver.game.pick_handler(pick_id(6, 2)), PickResult::Success);
    let event = driver.run_until_event();
    assert_eq!(event, GameEvent::MoveSettled(PickResult::Success));
    assert_eq!(driver.game.turn(), Side::Player1);
    assert_eq!(driver.game.board().support(Side::Player1).len(), 2);
    assert_eq!(driver.game.history().len(), 2);
}

#[test]
fn test_last_capture_wins() {
    let layout = Layout::empty()
        .with(pos(2, 6), Side::Player0, Rank::Normal)
        .with(pos(3, 5), Side::Player1, Rank::Normal);
    let mut driver = Driver::with_turn(layout, Side::Player0);
    let event = driver.play((2, 6), (4, 4));
    assert_eq!(event, GameEvent::GameOver(Side::Player0));
    assert!(driver.game.state().is_game_over());
    assert_eq!(driver.game.winner(), Some(Side::Player0));
    assert_eq!(driver.game.wins(Side::Player0), 1);
    assert_eq!(driver.game.wins(Side::Player1), 0);
    assert!(driver.game.timer().state().is_stopped());
}

#[test]
fn test_promotion_is_recorded() {
    let layout = Layout::empty()
        .with(pos(3, 1), Side::Player0, Rank::Normal)
        .with(pos(7, 6), Side::Player1, Rank::Normal);
    let mut driver = Driver::with_turn(layout, Side::Player0);
    let event = driver.play((3, 1), (4, 0));
    assert_eq!(event, GameEvent::MoveSettled(PickResult::Success));
    let piece = driver.game.board().cell(pos(4, 0).id()).piece().unwrap();
    assert!(piece.is_king());
    assert!(!piece.is_transforming());
    assert!(driver.game.history()[0].promoted());
}

#[test]
fn test_undo_round_trip() {
    let layout = Layout::empty()
        .with(pos(2, 6), Side::Player0, Rank::Normal)
        .with(pos(3, 5), Side::Player1, Rank::King)
        .with(pos(0, 1), Side::Player1, Rank::Normal);
    let mut driver = Driver::with_turn(layout, Side::Player0);
    for _ in 0..10 {
        driver.tick();
    }

    let layout_before = driver.game.board().layout();
    let sets_before = driver.game.board().sets().clone();
    let moves_before = driver.game.board().valid_moves().clone();
    let timer_before = driver.game.timer().snapshot();

    let event = driver.play((2, 6), (4, 4));
    assert_eq!(event, GameEvent::MoveSettled(PickResult::Success));
    assert_eq!(driver.game.turn(), Side::Player1);
    assert!(driver.game.history()[0].captured_was_king());
    let captured = &driver.game.board().support(Side::Player1).pieces()[0];
    assert!(!captured.is_king());

    assert_eq!(driver.game.pick_handler(UNDO_BUTTON), PickResult::Success);
    assert!(driver.game.state().is_undo());
    assert_eq!(driver.run_until_event(), GameEvent::UndoSettled);

    assert!(driver.game.state().is_pick_piece());
    assert_eq!(driver.game.turn(), Side::Player0);
    assert_eq!(driver.game.board().layout(), layout_before);
    assert_eq!(driver.game.board().sets(), &sets_before);
    assert_eq!(driver.game.board().valid_moves(), &moves_before);
    assert_eq!(driver.game.timer().snapshot(), timer_before);
    assert!(driver.game.board().support(Side::Player1).is_empty());
    assert!(driver.game.history().is_empty());

    let restored = driver.game.board().cell(pos(3, 5).id()).piece().unwrap();
    assert!(restored.is_king());
    assert!(!restored.is_transforming());
    assert_partition(&driver.game);
}

#[test]
fn test_undo_promotion() {
    let layout = Layout::empty()
        .with(pos(3, 1), Side::Player0, Rank::Normal)
        .with(pos(7, 6), Side::Player1, Rank::Normal);
    let mut driver = Driver::with_turn(layout, Side::Player0);
    let layout_before = driver.game.board().layout();
    driver.play((3, 1), (4, 0));

    assert_eq!(driver.game.undo(), Ok(()));
    assert_eq!(driver.run_until_event(), GameEvent::UndoSettled);
    assert_eq!(driver.game.board().layout(), layout_before);
    let piece = driver.game.board().cell(pos(3, 1).id()).piece().unwrap();
    assert!(!piece.is_king());
}

#[test]
fn test_undo_rejections() {
    let mut driver = Driver::with_turn(Layout::standard(), Side::Player0);
    assert_eq!(driver.game.undo(), Err(UndoError::NothingToUndo));

    driver.game.pick_handler(pick_id(0, 5));
    driver.game.pick_handler(pick_id(1, 4));
    assert_eq!(
        driver.game.undo(),
        Err(UndoError::NotAllowed {
            state: GameState::MovingPiece
        })
    );
    assert!(driver.game.state().is_moving_piece());
    assert_eq!(driver.game.history().len(), 1);

    driver.run_until_event();
    assert_eq!(driver.game.undo(), Ok(()));
    assert_eq!(
        driver.game.undo(),
        Err(UndoError::NotAllowed {
            state: GameState::Undo
        })
    );
}

#[test]
fn test_update_is_idempotent() {
    let mut driver = Driver::with_turn(Layout::standard(), Side::Player0);
    driver.game.pick_handler(pick_id(0, 5));
    driver.game.pick_handler(pick_id(1, 4));
    driver.tick();
    driver.now += 100;

    let now = Timestamp::from_millis(driver.now);
    let mover = pos(0, 5).id();
    driver.game.update(now);
    let transform = driver.game.board().piece_transform(mover);
    let offset = driver.game.board().cell(mover).travel().unwrap().offset();
    let timer = driver.game.timer().clone();

    driver.game.update(now);
    assert_eq!(driver.game.board().piece_transform(mover), transform);
    assert_eq!(
        driver.game.board().cell(mover).travel().unwrap().offset(),
        offset
    );
    assert_eq!(driver.game.timer(), &timer);
}

#[test]
fn test_time_forfeit() {
    let options = GameOptions {
        time_limit: "5".parse().unwrap(),
        ..GameOptions::default()
    };
    let mut driver = Driver::new(Layout::standard(), options);
    let start = driver.now;
    assert_eq!(
        driver.game.update(Timestamp::from_millis(start + 299_999)),
        None
    );
    assert_eq!(
        driver.game.update(Timestamp::from_millis(start + 300_000)),
        Some(GameEvent::GameOver(Side::Player1))
    );
    for side in Side::ALL {
        assert!(driver.game.timer().time_left(side).is_zero());
    }
    assert_eq!(driver.game.wins(Side::Player1), 1);
}

#[test]
fn test_blocked_side_loses() {
    // player 1 can only move into cells its own pieces occupy or off the board
    let layout = Layout::empty()
        .with(pos(7, 6), Side::Player1, Rank::Normal)
        .with(pos(6, 7), Side::Player1, Rank::Normal)
        .with(pos(3, 5), Side::Player0, Rank::Normal);
    let driver = Driver::with_turn(layout, Side::Player1);
    assert!(driver.game.state().is_game_over());
    assert_eq!(driver.game.winner(), Some(Side::Player0));
    assert_eq!(driver.game.wins(Side::Player0), 1);
}

#[test]
fn test_game_film_replays_history() {
    let layout = Layout::empty()
        .with(pos(2, 6), Side::Player0, Rank::Normal)
        .with(pos(3, 5), Side::Player1, Rank::Normal)
        .with(pos(5, 3), Side::Player1, Rank::Normal);
    let mut driver = Driver::with_turn(layout, Side::Player0);
    driver.play((2, 6), (4, 4));
    assert_eq!(driver.game.pick_handler(pick_id(6, 2)), PickResult::Success);
    assert_eq!(
        driver.run_until_event(),
        GameEvent::GameOver(Side::Player0)
    );
    let final_sets = driver.game.board().sets().clone();

    assert_eq!(driver.game.pick_handler(FILM_BUTTON), PickResult::Success);
    assert!(driver.game.state().is_show_film());
    assert!(!driver.game.board().is_created());
    assert_eq!(
        driver.game.board().cell(pos(2, 6).id()).piece().map(GamePiece::side),
        Some(Side::Player0)
    );
    assert_eq!(driver.game.pick_handler(pick_id(2, 6)), PickResult::Failure);

    assert_eq!(driver.run_until_event(), GameEvent::FilmEnded);
    assert!(driver.game.state().is_game_over());
    assert_eq!(driver.game.board().sets(), &final_sets);
    assert_eq!(driver.game.board().support(Side::Player1).len(), 2);
    // replaying does not count as another win
    assert_eq!(driver.game.wins(Side::Player0), 1);
}

#[test]
fn test_invalid_piece_bounces() {
    let mut driver = Driver::with_turn(Layout::standard(), Side::Player0);
    // back row pieces are blocked by their own side
    let blocked = pick_id(0, 7);
    assert_eq!(driver.game.pick_handler(blocked), PickResult::InvalidPiece);
    assert!(driver.game.state().is_pick_piece());

    driver.tick();
    driver.tick();
    let id = CellId::from_raw(blocked).unwrap();
    assert_ne!(
        driver.game.board().piece_transform(id),
        driver.game.board().cell(id).piece_motion()
    );
    for _ in 0..20 {
        driver.tick();
    }
    assert_eq!(
        driver.game.board().piece_transform(id),
        driver.game.board().cell(id).piece_motion()
    );
}
