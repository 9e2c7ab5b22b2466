//! The `Game` trait: the contract every study game implements.
//!
//! A game is a plain state machine. It owns its data, validates player
//! actions, and reports what happened as a list of events. It never
//! sleeps or spawns; time reaches it only through [`Game::tick`], which
//! the runner calls once per clock period. That keeps every rule
//! testable without a runtime.

use std::fmt::Debug;
use std::time::Duration;

use rand::Rng;

use crate::{GameError, GameStatus};

/// A single-player game driven by actions and a clock.
///
/// - `Action`: what the player can do (guess a letter, flip a card).
/// - `Event`: what happened as a result (letter revealed, game won).
/// - `Snapshot`: a read-only view of the full game for rendering.
///
/// Randomness is confined to [`reset`](Game::reset); every other method
/// is deterministic.
pub trait Game: Send + 'static {
    type Action: Send + Debug + 'static;
    type Event: Send + Clone + Debug + 'static;
    type Snapshot: Send + Clone + Debug + 'static;

    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Discards all state, resamples the data, and starts playing.
    fn reset<R: Rng>(&mut self, rng: &mut R);

    fn status(&self) -> GameStatus;

    /// Applies one player action.
    ///
    /// Repeating an action on an element that is already resolved is a
    /// no-op and returns no events.
    ///
    /// # Errors
    /// [`GameError::NotStarted`] before the first reset,
    /// [`GameError::GameOver`] in a terminal state, and
    /// [`GameError::InvalidInput`] for actions the rules refuse.
    fn apply(&mut self, action: Self::Action) -> Result<Vec<Self::Event>, GameError>;

    /// Advances game time by `dt`. Default: no-op.
    fn tick(&mut self, _dt: Duration) -> Vec<Self::Event> {
        Vec::new()
    }

    /// The current score. Zero until the game awards one.
    fn score(&self) -> u32;

    fn snapshot(&self) -> Self::Snapshot;

    /// Whether the runner should keep delivering ticks. Default: only
    /// while playing.
    fn clock_running(&self) -> bool {
        self.status().accepts_input()
    }
}

/// Whole seconds of play, as used by every time penalty.
pub(crate) fn whole_seconds(elapsed: Duration) -> u32 {
    u32::try_from(elapsed.as_secs()).unwrap_or(u32::MAX)
}

/// `base - penalty`, floored at `floor`.
pub(crate) fn floored(base: u32, penalty: u32, floor: u32) -> u32 {
    base.saturating_sub(penalty).max(floor)
}
