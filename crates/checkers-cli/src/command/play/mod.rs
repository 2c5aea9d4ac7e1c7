use std::path::PathBuf;

use anyhow::Context as _;
use checkers_engine::{BoardSize, GameOptions, KingRule, Side, TimeLimit};
use rand::Rng;

use crate::{
    logging,
    store::{JsonScoreStore, SharedScoreStore},
    tui::{Runtime, Screen, ScreenStack},
};

use self::screens::{GameScreen, MenuScreen};

mod screens;

pub(super) const DEFAULT_SCORES_PATH: &str = "./data/scores.json";
const DEFAULT_FPS: f64 = 60.0;

/// Who moves first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum, derive_more::Display)]
pub(crate) enum FirstTurn {
    #[default]
    #[display("player0")]
    Player0,
    #[display("player1")]
    Player1,
    /// Drawn at the start of every game
    #[display("random")]
    Random,
}

impl FirstTurn {
    fn resolve<R>(self, rng: &mut R) -> Side
    where
        R: Rng,
    {
        match self {
            Self::Player0 => Side::Player0,
            Self::Player1 => Side::Player1,
            Self::Random if rng.random_bool(0.5) => Side::Player1,
            Self::Random => Side::Player0,
        }
    }
}

/// Game settings picked in the menu or on the command line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Setup {
    pub(crate) board_size: BoardSize,
    pub(crate) king_rule: KingRule,
    pub(crate) time_limit: TimeLimit,
    pub(crate) first_turn: FirstTurn,
}

impl Setup {
    /// Options for a new game; a random first turn is drawn here.
    fn options<R>(&self, rng: &mut R) -> GameOptions
    where
        R: Rng,
    {
        GameOptions {
            board_size: self.board_size,
            king_rule: self.king_rule,
            time_limit: self.time_limit,
            first_turn: self.first_turn.resolve(rng),
        }
    }
}

#[derive(Debug, Clone, PartialEq, clap::Args)]
pub(crate) struct PlayArg {
    /// Board size (small or large)
    #[clap(long, default_value_t)]
    board_size: BoardSize,
    /// How far kings move (default or flying)
    #[clap(long, default_value_t)]
    king_rule: KingRule,
    /// Thinking time per player in minutes (5, 10, 15 or 20)
    #[clap(long, default_value_t)]
    time_limit: TimeLimit,
    /// Who moves first
    #[clap(long, value_enum, default_value_t)]
    first_turn: FirstTurn,
    /// File the win counters are kept in
    #[clap(long, default_value = DEFAULT_SCORES_PATH)]
    scores: PathBuf,
    /// Frames per second of the animations
    #[clap(long, default_value_t = DEFAULT_FPS)]
    fps: f64,
    /// Write logs to this file (filtered by RUST_LOG)
    #[clap(long)]
    log_file: Option<PathBuf>,
    /// Start playing right away with the given settings
    #[clap(long)]
    skip_menu: bool,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            board_size: BoardSize::default(),
            king_rule: KingRule::default(),
            time_limit: TimeLimit::default(),
            first_turn: FirstTurn::default(),
            scores: PathBuf::from(DEFAULT_SCORES_PATH),
            fps: DEFAULT_FPS,
            log_file: None,
            skip_menu: false,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        board_size,
        king_rule,
        time_limit,
        first_turn,
        scores,
        fps,
        log_file,
        skip_menu,
    } = arg;

    anyhow::ensure!(*fps > 0.0, "FPS must be positive, got {fps}");
    logging::init(log_file.as_deref())?;

    let setup = Setup {
        board_size: *board_size,
        king_rule: *king_rule,
        time_limit: *time_limit,
        first_turn: *first_turn,
    };
    let scores = SharedScoreStore::new(JsonScoreStore::open(scores)?);
    tracing::info!(?setup, fps, "starting");

    let initial: Box<dyn Screen> = if *skip_menu {
        Box::new(GameScreen::new(setup, scores, *fps))
    } else {
        Box::new(MenuScreen::new(setup, scores, *fps))
    };
    let mut screens = ScreenStack::new(initial);
    Runtime::new()
        .run(&mut screens)
        .context("Terminal session failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_fixed_first_turn() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(FirstTurn::Player0.resolve(&mut rng), Side::Player0);
        assert_eq!(FirstTurn::Player1.resolve(&mut rng), Side::Player1);
    }

    #[test]
    fn test_random_first_turn_draws_both_sides() {
        let mut rng = StdRng::seed_from_u64(7);
        let setup = Setup {
            first_turn: FirstTurn::Random,
            ..Setup::default()
        };
        let sides = (0..64)
            .map(|_| setup.options(&mut rng).first_turn)
            .collect::<Vec<_>>();
        assert!(sides.contains(&Side::Player0));
        assert!(sides.contains(&Side::Player1));
    }
}
