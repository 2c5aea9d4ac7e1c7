use serde::{Deserialize, Serialize};

use crate::{
    anim::{Animation, PromotionAnimation},
    core::{BOARD_DIM, Timestamp},
};

/// One of the two players.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
    derive_more::IsVariant,
)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    #[display("player0")]
    Player0,
    #[display("player1")]
    Player1,
}

impl Side {
    pub const ALL: [Self; 2] = [Self::Player0, Self::Player1];

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player0 => Self::Player1,
            Self::Player1 => Self::Player0,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Player0 => 0,
            Self::Player1 => 1,
        }
    }

    /// Key under which the side's wins are persisted.
    #[must_use]
    pub const fn score_key(self) -> &'static str {
        match self {
            Self::Player0 => "player0",
            Self::Player1 => "player1",
        }
    }

    /// Column on which an uncrowned piece of this side is crowned.
    #[must_use]
    pub const fn crowning_col(self) -> u8 {
        match self {
            Self::Player0 => 0,
            Self::Player1 => BOARD_DIM - 1,
        }
    }
}

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
pub enum Rank {
    #[default]
    #[display("normal")]
    Normal,
    #[display("king")]
    King,
}

const NORMAL_SPEED: f32 = 1.0;
const KING_SPEED: f32 = 1.5;

/// A checkers piece.
///
/// Crowning and uncrowning change the rank at once; the stacked crown plates are
/// then raised or lowered by a [`PromotionAnimation`].
#[derive(Debug, Clone, PartialEq)]
pub struct GamePiece {
    side: Side,
    rank: Rank,
    transition: Option<PromotionAnimation>,
}

impl GamePiece {
    #[must_use]
    pub const fn new(side: Side) -> Self {
        Self::with_rank(side, Rank::Normal)
    }

    #[must_use]
    pub const fn king(side: Side) -> Self {
        Self::with_rank(side, Rank::King)
    }

    #[must_use]
    pub const fn with_rank(side: Side, rank: Rank) -> Self {
        Self {
            side,
            rank,
            transition: None,
        }
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub fn rank(&self) -> Rank {
        self.rank
    }

    #[must_use]
    pub fn is_king(&self) -> bool {
        self.rank.is_king()
    }

    /// Movement speed in cells per time unit.
    #[must_use]
    pub fn speed(&self) -> f32 {
        match self.rank {
            Rank::Normal => NORMAL_SPEED,
            Rank::King => KING_SPEED,
        }
    }

    pub fn crown(&mut self) {
        self.rank = Rank::King;
        self.transition = Some(PromotionAnimation::crown());
    }

    pub fn uncrown(&mut self) {
        self.rank = Rank::Normal;
        self.transition = Some(PromotionAnimation::uncrown());
    }

    /// Whether the crown plates are still moving.
    #[must_use]
    pub fn is_transforming(&self) -> bool {
        self.transition.as_ref().is_some_and(Animation::is_active)
    }

    pub fn update(&mut self, now: Timestamp) {
        if let Some(transition) = &mut self.transition {
            transition.update(now);
            if !transition.is_active() {
                self.transition = None;
            }
        }
    }

    /// Drops any running transition, leaving the plates where the rank puts them.
    pub fn settle(&mut self) {
        self.transition = None;
    }

    /// Height of the crown stack in plate units, `0.0` for a man and `2.0` for a king.
    ///
    /// The lower plate sits at `min(h, 1.0)` and the upper plate at `h`.
    #[must_use]
    pub fn crown_height(&self) -> f32 {
        match &self.transition {
            Some(transition) => transition.apply(),
            None if self.is_king() => 2.0,
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(Side::Player0.opponent(), Side::Player1);
        assert_eq!(Side::Player1.opponent(), Side::Player0);
    }

    #[test]
    fn test_side_from_str() {
        assert_eq!("Player1".parse::<Side>().unwrap(), Side::Player1);
        assert!("player2".parse::<Side>().is_err());
    }

    #[test]
    fn test_speed_depends_on_rank() {
        let mut piece = GamePiece::new(Side::Player0);
        assert!((piece.speed() - 1.0).abs() < f32::EPSILON);
        piece.crown();
        assert!((piece.speed() - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_crown_flips_rank_immediately() {
        let mut piece = GamePiece::new(Side::Player1);
        piece.crown();
        assert!(piece.is_king());
        assert!(piece.is_transforming());
        assert!(piece.crown_height().abs() < f32::EPSILON);

        piece.update(Timestamp::from_millis(1000));
        piece.update(Timestamp::from_millis(1500));
        assert!(piece.is_transforming());
        piece.update(Timestamp::from_millis(2000));
        assert!(!piece.is_transforming());
        assert!((piece.crown_height() - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_uncrown_lowers_plates() {
        let mut piece = GamePiece::king(Side::Player0);
        piece.uncrown();
        assert!(!piece.is_king());
        piece.update(Timestamp::from_millis(0));
        assert!((piece.crown_height() - 2.0).abs() < f32::EPSILON);
        piece.update(Timestamp::from_millis(1000));
        assert!(!piece.is_transforming());
        assert!(piece.crown_height().abs() < f32::EPSILON);
    }

    #[test]
    fn test_settle_drops_transition() {
        let mut piece = GamePiece::new(Side::Player0);
        piece.crown();
        piece.settle();
        assert!(!piece.is_transforming());
        assert!((piece.crown_height() - 2.0).abs() < f32::EPSILON);
    }
}
