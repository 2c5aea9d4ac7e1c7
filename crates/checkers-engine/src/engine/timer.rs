use std::time::Duration;

use crate::core::{Side, Timestamp};

/// Thinking-time bookkeeping of one player, in milliseconds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlayerClock {
    remaining: u64,
    elapsed: u64,
    elapsed_backup: u64,
    last: Timestamp,
}

impl PlayerClock {
    fn reset(&mut self, limit: u64, now: Timestamp) {
        *self = Self {
            remaining: limit,
            elapsed: 0,
            elapsed_backup: 0,
            last: now,
        };
    }

    /// Time left before the elapsed time of the current turn is taken into account.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        Duration::from_millis(self.remaining)
    }

    /// Time spent in the current turn.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed)
    }

    #[must_use]
    pub fn time_left(&self) -> Duration {
        Duration::from_millis(self.remaining.saturating_sub(self.elapsed))
    }
}

/// State of both clocks, recorded with each move so undo can rewind them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSnapshot {
    turn: Side,
    clocks: [PlayerClock; 2],
}

impl TimerSnapshot {
    #[must_use]
    pub fn turn(&self) -> Side {
        self.turn
    }

    #[must_use]
    pub fn clock(&self, side: Side) -> &PlayerClock {
        &self.clocks[side.index()]
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TimerState {
    #[default]
    Stopped,
    Running,
    Paused,
}

/// `mm:ss` digits of a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display("{}{}:{}{}", minutes[0], minutes[1], seconds[0], seconds[1])]
pub struct DisplayTime {
    pub minutes: [u8; 2],
    pub seconds: [u8; 2],
}

impl DisplayTime {
    #[expect(clippy::cast_possible_truncation)]
    fn from_duration(time: Duration) -> Self {
        let total = time.as_secs();
        let minutes = (total / 60).min(99);
        let seconds = total % 60;
        let digits = |value: u64| [(value / 10) as u8, (value % 10) as u8];
        Self {
            minutes: digits(minutes),
            seconds: digits(seconds),
        }
    }
}

/// Chess clock with one countdown per player.
///
/// Only the clock of the side to play runs. Each update first folds the time the
/// other side spent into its remaining budget, then measures the current turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    limit: u64,
    state: TimerState,
    turn: Side,
    clocks: [PlayerClock; 2],
    /// Restart the turn measurement on the next update, keeping the time already spent.
    rebase: bool,
}

impl Timer {
    #[must_use]
    pub fn new(limit: Duration, turn: Side) -> Self {
        let limit = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
        let mut timer = Self {
            limit,
            state: TimerState::Stopped,
            turn,
            clocks: [PlayerClock::default(); 2],
            rebase: false,
        };
        timer.reset(limit, Timestamp::ZERO);
        timer
    }

    #[must_use]
    pub fn state(&self) -> TimerState {
        self.state
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state.is_running()
    }

    #[must_use]
    pub fn turn(&self) -> Side {
        self.turn
    }

    #[must_use]
    pub fn limit(&self) -> Duration {
        Duration::from_millis(self.limit)
    }

    #[must_use]
    pub fn clock(&self, side: Side) -> &PlayerClock {
        &self.clocks[side.index()]
    }

    #[must_use]
    pub fn time_left(&self, side: Side) -> Duration {
        self.clock(side).time_left()
    }

    #[must_use]
    pub fn display_time(&self, side: Side) -> DisplayTime {
        DisplayTime::from_duration(self.time_left(side))
    }

    /// Resets both clocks to the full limit and starts counting for the side to play.
    pub fn start(&mut self, now: Timestamp) {
        self.reset(self.limit, now);
        self.state = TimerState::Running;
    }

    pub fn stop(&mut self) {
        self.state = TimerState::Stopped;
        self.rebase = false;
    }

    /// Freezes the clocks at their last update.
    pub fn pause(&mut self) {
        if self.state.is_running() {
            self.state = TimerState::Paused;
        }
    }

    /// Resumes counting from the next update without losing the time already spent.
    pub fn resume(&mut self) {
        if self.state.is_paused() {
            self.state = TimerState::Running;
            self.rebase = true;
        }
    }

    pub fn set_turn(&mut self, turn: Side) {
        self.turn = turn;
    }

    #[must_use]
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            turn: self.turn,
            clocks: self.clocks,
        }
    }

    /// Restores the clocks recorded in `snapshot`.
    ///
    /// A stopped timer stays stopped; otherwise counting resumes on the next update.
    pub fn undo(&mut self, snapshot: &TimerSnapshot) {
        self.turn = snapshot.turn;
        self.clocks = snapshot.clocks;
        if !self.state.is_stopped() {
            self.state = TimerState::Running;
            self.rebase = true;
        }
    }

    /// Sets both clocks to `limit` milliseconds.
    pub fn reset(&mut self, limit: u64, now: Timestamp) {
        for clock in &mut self.clocks {
            clock.reset(limit, now);
        }
        self.rebase = false;
    }

    /// Advances the clocks to `now`. Returns `true` if the side to play ran out of time.
    pub fn update(&mut self, now: Timestamp) -> bool {
        if !self.state.is_running() {
            return false;
        }

        let other = &mut self.clocks[self.turn.opponent().index()];
        other.last = now;
        other.remaining = other.remaining.saturating_sub(other.elapsed);
        other.elapsed = 0;
        other.elapsed_backup = 0;

        let current = &mut self.clocks[self.turn.index()];
        if self.rebase {
            current.last = now;
            current.elapsed_backup = current.elapsed;
            self.rebase = false;
        }
        current.elapsed = now.as_millis().saturating_sub(current.last.as_millis())
            + current.elapsed_backup;

        if current.elapsed >= current.remaining {
            tracing::info!(side = %self.turn, "time is up");
            self.state = TimerState::Stopped;
            self.reset(0, now);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Timestamp {
        Timestamp::from_millis(millis)
    }

    #[test]
    fn test_counts_only_current_turn() {
        let mut timer = Timer::new(Duration::from_secs(60), Side::Player0);
        timer.start(ms(1000));
        assert!(!timer.update(ms(4000)));
        assert_eq!(timer.time_left(Side::Player0), Duration::from_secs(57));
        assert_eq!(timer.time_left(Side::Player1), Duration::from_secs(60));

        timer.set_turn(Side::Player1);
        assert!(!timer.update(ms(6000)));
        // player 0's three seconds are committed, player 1 counts from its last update
        assert_eq!(timer.clock(Side::Player0).remaining(), Duration::from_secs(57));
        assert_eq!(timer.time_left(Side::Player1), Duration::from_secs(58));
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut timer = Timer::new(Duration::from_secs(60), Side::Player0);
        timer.start(ms(0));
        timer.update(ms(1500));
        let first = timer.clone();
        timer.update(ms(1500));
        assert_eq!(timer, first);
    }

    #[test]
    fn test_pause_and_resume_keep_spent_time() {
        let mut timer = Timer::new(Duration::from_secs(60), Side::Player0);
        timer.start(ms(0));
        timer.update(ms(2000));
        timer.pause();
        assert!(!timer.update(ms(9000)));
        assert_eq!(timer.time_left(Side::Player0), Duration::from_secs(58));

        timer.resume();
        timer.update(ms(10_000));
        assert_eq!(timer.time_left(Side::Player0), Duration::from_secs(58));
        timer.update(ms(11_000));
        assert_eq!(timer.time_left(Side::Player0), Duration::from_secs(57));
    }

    #[test]
    fn test_expiry_stops_and_zeroes() {
        let mut timer = Timer::new(Duration::from_secs(5), Side::Player1);
        timer.start(ms(0));
        assert!(!timer.update(ms(4999)));
        assert!(timer.update(ms(5000)));
        assert!(timer.state().is_stopped());
        assert_eq!(timer.time_left(Side::Player0), Duration::ZERO);
        assert_eq!(timer.time_left(Side::Player1), Duration::ZERO);
        assert!(!timer.update(ms(6000)));
    }

    #[test]
    fn test_zero_budget_expires_on_first_update() {
        let mut timer = Timer::new(Duration::ZERO, Side::Player0);
        timer.start(ms(3000));
        assert!(timer.update(ms(3000)));
        assert!(timer.state().is_stopped());
        assert_eq!(timer.time_left(Side::Player0), Duration::ZERO);
        assert_eq!(timer.time_left(Side::Player1), Duration::ZERO);
    }

    #[test]
    fn test_undo_restores_snapshot() {
        let mut timer = Timer::new(Duration::from_secs(60), Side::Player0);
        timer.start(ms(0));
        timer.update(ms(5000));
        let snapshot = timer.snapshot();
        timer.pause();

        timer.set_turn(Side::Player1);
        timer.resume();
        timer.update(ms(8000));
        timer.update(ms(20_000));
        assert_eq!(timer.turn(), Side::Player1);

        timer.undo(&snapshot);
        assert_eq!(timer.turn(), Side::Player0);
        timer.update(ms(30_000));
        assert_eq!(timer.time_left(Side::Player0), Duration::from_secs(55));
        assert_eq!(timer.time_left(Side::Player1), Duration::from_secs(60));
    }

    #[test]
    fn test_display_time() {
        let mut timer = Timer::new(Duration::from_secs(600), Side::Player0);
        timer.start(ms(0));
        timer.update(ms(61_500));
        let display = timer.display_time(Side::Player0);
        assert_eq!(display.minutes, [0, 8]);
        assert_eq!(display.seconds, [5, 8]);
        assert_eq!(display.to_string(), "08:58");
        assert_eq!(timer.display_time(Side::Player1).to_string(), "10:00");
    }
}
