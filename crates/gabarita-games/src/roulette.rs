//! Prize roulette: five spins of a ten-segment wheel.
//!
//! The wheel keeps its accumulated rotation across spins. Each spin turns
//! it by a random number of full turns plus a random segment offset, and
//! the landing segment is read back from the final angle, the way a
//! pointer fixed at the top of a drawn wheel would read it.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::fixtures::{ROULETTE_SEGMENTS, Segment, SegmentKind};
use crate::game::whole_seconds;
use crate::{Game, GameError, GameStatus};

/// Spins granted at the start of a game.
pub const INITIAL_SPINS: u32 = 5;

/// Points for landing on a question segment, before the multiplier.
pub const QUESTION_POINTS: u32 = 100;

const MIN_TURNS: f64 = 3.0;
const MAX_TURNS: f64 = 8.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouletteAction {
    Spin,
    /// Stop the game timer.
    Pause,
    /// Restart the game timer.
    Resume,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RouletteEvent {
    Landed {
        segment: usize,
        label: &'static str,
        kind: SegmentKind,
        awarded: u32,
        total: u32,
        multiplier: u32,
        spins_left: u32,
    },
    Paused,
    Resumed,
    Finished {
        score: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouletteSnapshot {
    pub status: GameStatus,
    /// Accumulated wheel rotation in degrees.
    pub rotation: f64,
    pub spins_left: u32,
    pub multiplier: u32,
    pub score: u32,
    pub paused: bool,
    /// Segment indices landed so far, oldest first.
    pub history: Vec<usize>,
    pub elapsed_secs: u32,
}

#[derive(Debug)]
pub struct Roulette {
    segments: Vec<Segment>,
    rng: StdRng,
    rotation: f64,
    spins_left: u32,
    multiplier: u32,
    score: u32,
    paused: bool,
    history: Vec<usize>,
    status: GameStatus,
    elapsed: Duration,
}

impl Default for Roulette {
    fn default() -> Self {
        Self::new()
    }
}

impl Roulette {
    pub fn new() -> Self {
        Self {
            segments: ROULETTE_SEGMENTS.to_vec(),
            rng: StdRng::seed_from_u64(0),
            rotation: 0.0,
            spins_left: INITIAL_SPINS,
            multiplier: 1,
            score: 0,
            paused: false,
            history: Vec::new(),
            status: GameStatus::Setup,
            elapsed: Duration::ZERO,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn spins_left(&self) -> u32 {
        self.spins_left
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    fn segment_angle(&self) -> f64 {
        360.0 / self.segments.len() as f64
    }

    /// The segment under the pointer for a given accumulated rotation.
    fn landing_segment(&self, rotation: f64) -> usize {
        let normalized = (360.0 - rotation % 360.0) % 360.0;
        let index = (normalized / self.segment_angle()).floor() as usize;
        index.min(self.segments.len() - 1)
    }

    fn spin(&mut self) -> Vec<RouletteEvent> {
        let turns = self.rng.random_range(MIN_TURNS..MAX_TURNS);
        let offset = self.rng.random_range(0..self.segments.len());
        self.rotation += turns * 360.0 + offset as f64 * self.segment_angle();
        let landed = self.landing_segment(self.rotation);
        self.land(landed)
    }

    /// Applies the effect of landing on `index` and spends one spin.
    fn land(&mut self, index: usize) -> Vec<RouletteEvent> {
        let segment = self.segments[index].clone();
        let before = self.score;
        self.spins_left = self.spins_left.saturating_sub(1);

        match segment.kind {
            SegmentKind::Points => {
                self.score += segment.points * self.multiplier;
                self.multiplier = 1;
            }
            SegmentKind::Question => {
                self.score += QUESTION_POINTS * self.multiplier;
                self.multiplier = 1;
            }
            SegmentKind::DoubleNext => self.multiplier = 2,
            SegmentKind::SpinAgain => self.spins_left += 1,
            SegmentKind::Jackpot => self.score += segment.points,
            SegmentKind::LoseAll => {
                self.score = 0;
                self.multiplier = 1;
            }
        }
        self.history.push(index);

        let mut events = vec![RouletteEvent::Landed {
            segment: index,
            label: segment.label,
            kind: segment.kind,
            awarded: self.score.saturating_sub(before),
            total: self.score,
            multiplier: self.multiplier,
            spins_left: self.spins_left,
        }];
        if self.spins_left == 0 {
            self.status = GameStatus::Finished;
            tracing::debug!(score = self.score, "roulette finished");
            events.push(RouletteEvent::Finished { score: self.score });
        }
        events
    }
}

impl Game for Roulette {
    type Action = RouletteAction;
    type Event = RouletteEvent;
    type Snapshot = RouletteSnapshot;

    fn name(&self) -> &'static str {
        "roulette"
    }

    /// Reseeds the wheel's own generator from `rng`.
    fn reset<R: Rng>(&mut self, rng: &mut R) {
        self.rng = StdRng::seed_from_u64(rng.random());
        self.rotation = 0.0;
        self.spins_left = INITIAL_SPINS;
        self.multiplier = 1;
        self.score = 0;
        self.paused = false;
        self.history.clear();
        self.elapsed = Duration::ZERO;
        self.status = GameStatus::Playing;
    }

    fn status(&self) -> GameStatus {
        self.status
    }

    fn apply(&mut self, action: RouletteAction) -> Result<Vec<RouletteEvent>, GameError> {
        self.status.ensure_playing()?;
        let events = match action {
            RouletteAction::Spin => self.spin(),
            RouletteAction::Pause if !self.paused => {
                self.paused = true;
                vec![RouletteEvent::Paused]
            }
            RouletteAction::Resume if self.paused => {
                self.paused = false;
                vec![RouletteEvent::Resumed]
            }
            RouletteAction::Pause | RouletteAction::Resume => Vec::new(),
        };
        Ok(events)
    }

    fn tick(&mut self, dt: Duration) -> Vec<RouletteEvent> {
        if self.clock_running() {
            self.elapsed += dt;
        }
        Vec::new()
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn snapshot(&self) -> RouletteSnapshot {
        RouletteSnapshot {
            status: self.status,
            rotation: self.rotation,
            spins_left: self.spins_left,
            multiplier: self.multiplier,
            score: self.score,
            paused: self.paused,
            history: self.history.clone(),
            elapsed_secs: whole_seconds(self.elapsed),
        }
    }

    fn clock_running(&self) -> bool {
        self.status.accepts_input() && !self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P100: usize = 0;
    const QUESTION: usize = 1;
    const BONUS: usize = 3;
    const P200: usize = 4;
    const AGAIN: usize = 5;
    const LOSE: usize = 7;
    const MEGA: usize = 9;

    fn playing() -> Roulette {
        let mut game = Roulette::new();
        game.reset(&mut StdRng::seed_from_u64(42));
        game
    }

    #[test]
    fn test_landing_segment_reads_pointer_from_rotation() {
        let game = Roulette::new();
        assert_eq!(game.landing_segment(0.0), 0);
        assert_eq!(game.landing_segment(360.0 * 4.0), 0);
        // 10° clockwise puts 350° under the pointer: the last segment.
        assert_eq!(game.landing_segment(10.0), 9);
        assert_eq!(game.landing_segment(3.0 * 360.0 + 36.0), 9);
        assert_eq!(game.landing_segment(360.0 - 36.0 * 2.5), 2);
    }

    #[test]
    fn test_points_are_multiplied_once_by_bonus() {
        let mut game = playing();
        game.land(BONUS);
        assert_eq!(game.multiplier(), 2);
        game.land(P200);
        assert_eq!(game.score(), 400);
        assert_eq!(game.multiplier(), 1);
        game.land(P100);
        assert_eq!(game.score(), 500);
    }

    #[test]
    fn test_question_scores_hundred_times_multiplier() {
        let mut game = playing();
        game.land(BONUS);
        game.land(QUESTION);
        assert_eq!(game.score(), 200);
    }

    #[test]
    fn test_jackpot_is_not_multiplied() {
        let mut game = playing();
        game.land(BONUS);
        game.land(MEGA);
        assert_eq!(game.score(), 500);
        assert_eq!(game.multiplier(), 2);
    }

    #[test]
    fn test_lose_all_zeroes_score_and_multiplier() {
        let mut game = playing();
        game.land(P200);
        game.land(BONUS);
        game.land(LOSE);
        assert_eq!(game.score(), 0);
        assert_eq!(game.multiplier(), 1);
    }

    #[test]
    fn test_spin_again_refunds_the_spin() {
        let mut game = playing();
        game.land(AGAIN);
        assert_eq!(game.spins_left(), INITIAL_SPINS);
    }

    #[test]
    fn test_last_spin_finishes() {
        let mut game = playing();
        for _ in 0..4 {
            game.land(P100);
        }
        let events = game.land(P100);
        assert_eq!(events.last(), Some(&RouletteEvent::Finished { score: 500 }));
        assert_eq!(game.status(), GameStatus::Finished);
        assert_eq!(game.apply(RouletteAction::Spin), Err(GameError::GameOver));
    }

    #[test]
    fn test_spin_accumulates_rotation_and_spends_spins() {
        let mut game = playing();
        let mut spins = 0;
        while game.status() == GameStatus::Playing {
            let before = game.snapshot().rotation;
            game.apply(RouletteAction::Spin).unwrap();
            assert!(game.snapshot().rotation >= before + MIN_TURNS * 360.0);
            spins += 1;
            assert!(spins < 100, "game never finished");
        }
        assert_eq!(game.snapshot().history.len(), spins);
    }

    #[test]
    fn test_same_seed_same_landings() {
        let play = |seed| {
            let mut game = Roulette::new();
            game.reset(&mut StdRng::seed_from_u64(seed));
            while game.status() == GameStatus::Playing {
                game.apply(RouletteAction::Spin).unwrap();
            }
            game.snapshot().history
        };
        assert_eq!(play(7), play(7));
    }

    #[test]
    fn test_pause_stops_timer_and_resume_restarts_it() {
        let mut game = playing();
        game.tick(Duration::from_secs(2));
        assert_eq!(game.apply(RouletteAction::Pause).unwrap(), vec![RouletteEvent::Paused]);
        assert!(game.apply(RouletteAction::Pause).unwrap().is_empty());
        assert!(!game.clock_running());
        game.tick(Duration::from_secs(5));
        game.apply(RouletteAction::Resume).unwrap();
        game.tick(Duration::from_secs(1));
        assert_eq!(game.snapshot().elapsed_secs, 3);
    }
}
