use std::{str::FromStr, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{ParseOptionError, core::Side};

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "lowercase")]
pub enum BoardSize {
    #[display("small")]
    Small,
    #[default]
    #[display("large")]
    Large,
}

impl FromStr for BoardSize {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "large" => Ok(Self::Large),
            _ => Err(ParseOptionError::new("board size", s)),
        }
    }
}

/// How far crowned pieces move.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "lowercase")]
pub enum KingRule {
    /// Kings step one cell in any diagonal direction.
    #[default]
    #[display("default")]
    Default,
    /// Kings slide any distance and may land anywhere past the captured piece.
    #[display("flying")]
    Flying,
}

impl FromStr for KingRule {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "flying" | "custom" => Ok(Self::Flying),
            _ => Err(ParseOptionError::new("king rule", s)),
        }
    }
}

/// Per-player thinking time, in whole minutes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[display("{_0}min")]
#[serde(try_from = "u8", into = "u8")]
pub struct TimeLimit(u8);

impl TimeLimit {
    pub const CHOICES: [Self; 4] = [Self(5), Self(10), Self(15), Self(20)];

    #[must_use]
    pub fn from_minutes(minutes: u8) -> Option<Self> {
        Self::CHOICES.into_iter().find(|limit| limit.0 == minutes)
    }

    #[must_use]
    pub const fn minutes(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_secs(u64::from(self.0) * 60)
    }
}

impl Default for TimeLimit {
    fn default() -> Self {
        Self(10)
    }
}

impl From<TimeLimit> for u8 {
    fn from(limit: TimeLimit) -> Self {
        limit.0
    }
}

impl TryFrom<u8> for TimeLimit {
    type Error = ParseOptionError;

    fn try_from(minutes: u8) -> Result<Self, Self::Error> {
        Self::from_minutes(minutes)
            .ok_or_else(|| ParseOptionError::new("time limit", &minutes.to_string()))
    }
}

impl FromStr for TimeLimit {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim_end_matches("min")
            .parse::<u8>()
            .ok()
            .and_then(Self::from_minutes)
            .ok_or_else(|| ParseOptionError::new("time limit", s))
    }
}

/// Options chosen in the menu before a game starts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOptions {
    pub board_size: BoardSize,
    pub king_rule: KingRule,
    pub time_limit: TimeLimit,
    pub first_turn: Side,
}

/// Height of the board surface above the table.
const BOARD_Y: f32 = 0.01;

/// Scene geometry for one board size.
///
/// Positions are `(x, z)` on the table plane; support positions are relative to
/// the board corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub board_size: BoardSize,
    pub board_position: Vec2,
    pub board_extent: f32,
    pub support_positions: [Vec2; 2],
    pub support_height: f32,
    pub support_scale: f32,
    /// Time a piece of speed 1 takes to travel one cell.
    pub move_time_unit: Duration,
    pub camera_duration: Duration,
}

impl Settings {
    #[must_use]
    pub fn for_size(board_size: BoardSize) -> Self {
        let (board_position, board_extent, supports, support_height, support_scale) =
            match board_size {
                BoardSize::Small => (
                    Vec2::new(7.25, 5.75),
                    1.5,
                    [Vec2::new(9.0, 7.25), Vec2::new(9.0, 5.75)],
                    0.5,
                    0.2,
                ),
                BoardSize::Large => (
                    Vec2::new(12.0, 2.0),
                    6.0,
                    [Vec2::new(19.0, 9.0), Vec2::new(19.0, 1.0)],
                    1.5,
                    0.75,
                ),
            };
        Self {
            board_size,
            board_position,
            board_extent,
            support_positions: supports.map(|pos| pos - board_position),
            support_height: support_height - BOARD_Y,
            support_scale,
            move_time_unit: Duration::from_millis(100),
            camera_duration: Duration::from_secs(1),
        }
    }

    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.board_extent / 8.0
    }

    #[must_use]
    pub fn support_position(&self, side: Side) -> Vec2 {
        self.support_positions[side.index()]
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::for_size(BoardSize::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_defaults() {
        let options = GameOptions::default();
        assert_eq!(options.board_size, BoardSize::Large);
        assert_eq!(options.king_rule, KingRule::Default);
        assert_eq!(options.time_limit.minutes(), 10);
        assert_eq!(options.first_turn, Side::Player0);
    }

    #[test]
    fn test_parse_options() {
        assert_eq!("Small".parse::<BoardSize>().unwrap(), BoardSize::Small);
        assert_eq!("custom".parse::<KingRule>().unwrap(), KingRule::Flying);
        assert_eq!("15".parse::<TimeLimit>().unwrap().minutes(), 15);
        assert_eq!("20min".parse::<TimeLimit>().unwrap().minutes(), 20);
        assert!("7".parse::<TimeLimit>().is_err());
        assert!("huge".parse::<BoardSize>().is_err());
    }

    #[test]
    fn test_time_limit_serde() {
        let json = serde_json::to_string(&TimeLimit::default()).unwrap();
        assert_eq!(json, "10");
        assert!(serde_json::from_str::<TimeLimit>("11").is_err());
        let options: GameOptions = serde_json::from_str(
            r#"{"board_size":"small","king_rule":"flying","time_limit":5,"first_turn":"player1"}"#,
        )
        .unwrap();
        assert_eq!(options.board_size, BoardSize::Small);
        assert_eq!(options.first_turn, Side::Player1);
    }

    #[test]
    fn test_large_geometry() {
        let settings = Settings::for_size(BoardSize::Large);
        assert!((settings.cell_size() - 0.75).abs() < f32::EPSILON);
        assert_eq!(settings.support_position(Side::Player0), Vec2::new(7.0, 7.0));
        assert_eq!(settings.support_position(Side::Player1), Vec2::new(7.0, -1.0));
        assert!((settings.support_height - 1.49).abs() < 1e-6);
    }

    #[test]
    fn test_small_geometry() {
        let settings = Settings::for_size(BoardSize::Small);
        assert!((settings.cell_size() - 0.1875).abs() < f32::EPSILON);
        assert!(
            settings
                .support_position(Side::Player1)
                .abs_diff_eq(Vec2::new(1.75, 0.0), 1e-6)
        );
    }
}
