//! Memory match: flip cards two at a time and find every pair.

use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::fixtures::MEMORY_SYMBOLS;
use crate::game::{floored, whole_seconds};
use crate::{Game, GameError, GameStatus};

/// How long an unequal pair stays face up before flipping back.
pub const FLIP_BACK_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryAction {
    /// Turn a card face up, by position.
    Flip(usize),
    /// Turn a pending unequal pair back down without waiting.
    ResolvePending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MemoryEvent {
    Flipped { card: usize, symbol: &'static str },
    Matched { first: usize, second: usize, matches: u32 },
    Mismatched { first: usize, second: usize },
    FlippedBack { first: usize, second: usize },
    Won { score: u32, moves: u32 },
}

/// A card as the player sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    /// `None` while face down.
    pub symbol: Option<&'static str>,
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemorySnapshot {
    pub status: GameStatus,
    pub cards: Vec<CardView>,
    pub matches: u32,
    pub pairs: u32,
    pub moves: u32,
    pub elapsed_secs: u32,
    pub score: u32,
}

#[derive(Debug, Clone)]
struct Card {
    symbol: &'static str,
    face_up: bool,
    matched: bool,
}

/// An unequal pair waiting to flip back.
#[derive(Debug, Clone, Copy)]
struct Pending {
    first: usize,
    second: usize,
    remaining: Duration,
}

#[derive(Debug)]
pub struct Memory {
    symbols: Vec<&'static str>,
    cards: Vec<Card>,
    first_up: Option<usize>,
    pending: Option<Pending>,
    matches: u32,
    moves: u32,
    status: GameStatus,
    elapsed: Duration,
    score: u32,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// A game over the built-in eight pairs, waiting in `Setup`.
    pub fn new() -> Self {
        Self {
            symbols: MEMORY_SYMBOLS.to_vec(),
            cards: Vec::new(),
            first_up: None,
            pending: None,
            matches: 0,
            moves: 0,
            status: GameStatus::Setup,
            elapsed: Duration::ZERO,
            score: 0,
        }
    }

    /// A game already `Playing` with cards in exactly this order.
    ///
    /// Later resets shuffle the same symbols.
    ///
    /// # Errors
    /// [`GameError::InvalidInput`] unless every symbol appears exactly
    /// twice.
    pub fn with_layout(layout: Vec<&'static str>) -> Result<Self, GameError> {
        let mut symbols: Vec<&'static str> = Vec::new();
        for symbol in &layout {
            if !symbols.contains(symbol) {
                symbols.push(*symbol);
            }
        }
        if symbols.is_empty()
            || symbols
                .iter()
                .any(|s| layout.iter().filter(|l| *l == s).count() != 2)
        {
            return Err(GameError::invalid("every symbol must appear exactly twice"));
        }

        let mut game = Self {
            symbols,
            ..Self::new()
        };
        game.deal(layout);
        Ok(game)
    }

    pub fn pairs(&self) -> u32 {
        self.symbols.len() as u32
    }

    pub fn matches(&self) -> u32 {
        self.matches
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Whether an unequal pair is still face up.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Flips a pending unequal pair back immediately.
    pub fn resolve_pending(&mut self) -> Vec<MemoryEvent> {
        let Some(Pending { first, second, .. }) = self.pending.take() else {
            return Vec::new();
        };
        self.cards[first].face_up = false;
        self.cards[second].face_up = false;
        self.moves += 1;
        vec![MemoryEvent::FlippedBack { first, second }]
    }

    fn deal(&mut self, layout: Vec<&'static str>) {
        self.cards = layout
            .into_iter()
            .map(|symbol| Card {
                symbol,
                face_up: false,
                matched: false,
            })
            .collect();
        self.first_up = None;
        self.pending = None;
        self.matches = 0;
        self.moves = 0;
        self.elapsed = Duration::ZERO;
        self.score = 0;
        self.status = GameStatus::Playing;
    }

    fn flip(&mut self, card: usize) -> Result<Vec<MemoryEvent>, GameError> {
        let Some(target) = self.cards.get(card) else {
            return Err(GameError::invalid(format!(
                "card {card} out of range (0..{})",
                self.cards.len()
            )));
        };
        if target.face_up || target.matched || self.pending.is_some() {
            return Ok(Vec::new());
        }

        self.cards[card].face_up = true;
        let symbol = self.cards[card].symbol;
        let mut events = vec![MemoryEvent::Flipped { card, symbol }];

        let Some(first) = self.first_up.take() else {
            self.first_up = Some(card);
            return Ok(events);
        };

        if self.cards[first].symbol == symbol {
            self.cards[first].matched = true;
            self.cards[card].matched = true;
            self.matches += 1;
            self.moves += 1;
            events.push(MemoryEvent::Matched {
                first,
                second: card,
                matches: self.matches,
            });
            if self.matches == self.pairs() {
                let penalty = self.moves * 10 + whole_seconds(self.elapsed) / 2;
                self.score = floored(1000, penalty, 100);
                self.status = GameStatus::Won;
                tracing::debug!(score = self.score, moves = self.moves, "memory won");
                events.push(MemoryEvent::Won {
                    score: self.score,
                    moves: self.moves,
                });
            }
        } else {
            self.pending = Some(Pending {
                first,
                second: card,
                remaining: FLIP_BACK_DELAY,
            });
            events.push(MemoryEvent::Mismatched {
                first,
                second: card,
            });
        }
        Ok(events)
    }
}

impl Game for Memory {
    type Action = MemoryAction;
    type Event = MemoryEvent;
    type Snapshot = MemorySnapshot;

    fn name(&self) -> &'static str {
        "memory"
    }

    fn reset<R: Rng>(&mut self, rng: &mut R) {
        let mut layout: Vec<&'static str> = self
            .symbols
            .iter()
            .flat_map(|s| [*s, *s])
            .collect();
        layout.shuffle(rng);
        self.deal(layout);
    }

    fn status(&self) -> GameStatus {
        self.status
    }

    fn apply(&mut self, action: MemoryAction) -> Result<Vec<MemoryEvent>, GameError> {
        self.status.ensure_playing()?;
        match action {
            MemoryAction::Flip(card) => self.flip(card),
            MemoryAction::ResolvePending => Ok(self.resolve_pending()),
        }
    }

    fn tick(&mut self, dt: Duration) -> Vec<MemoryEvent> {
        if !self.status.accepts_input() {
            return Vec::new();
        }
        self.elapsed += dt;
        let due = match self.pending.as_mut() {
            Some(pending) => {
                pending.remaining = pending.remaining.saturating_sub(dt);
                pending.remaining.is_zero()
            }
            None => false,
        };
        if due {
            self.resolve_pending()
        } else {
            Vec::new()
        }
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            status: self.status,
            cards: self
                .cards
                .iter()
                .map(|c| CardView {
                    symbol: (c.face_up || c.matched).then_some(c.symbol),
                    matched: c.matched,
                })
                .collect(),
            matches: self.matches,
            pairs: self.pairs(),
            moves: self.moves,
            elapsed_secs: whole_seconds(self.elapsed),
            score: self.score,
        }
    }
}
