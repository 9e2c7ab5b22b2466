//! Single-player study games for Gabarita.
//!
//! Six games share one lifecycle ([`GameStatus`]) and one trait
//! ([`Game`]). Each is a synchronous state machine; the [`runner`] puts
//! one inside a Tokio task with a one-second clock.
//!
//! # How it fits in the stack
//!
//! ```text
//! ┌──────────────────────────────┐
//! │  UI / demo binary            │  GameHandle::act, GameOutbound stream
//! ├──────────────────────────────┤
//! │  gabarita-games::runner      │  actor: commands + ticks in one select!
//! ├──────────────────────────────┤
//! │  Hangman, Memory, Quiz, ...  │  rules and scoring (pure)
//! ├──────────────────────────────┤
//! │  gabarita-tick               │  fixed-period clock
//! └──────────────────────────────┘
//! ```
//!
//! # Key types
//!
//! - [`Game`]: the trait every game implements
//! - [`GameStatus`]: `Setup → Playing → Won | Lost | Finished`
//! - [`spawn_game`] / [`GameHandle`]: run a game as an actor
//! - [`fixtures`]: the built-in words, questions, grid and wheel

pub mod crossword;
mod error;
pub mod fixtures;
mod game;
pub mod hangman;
pub mod memory;
pub mod mock_exam;
pub mod quiz;
pub mod roulette;
pub mod runner;
mod status;

pub use crossword::{Crossword, CrosswordAction, CrosswordEvent, CrosswordSnapshot};
pub use error::GameError;
pub use game::Game;
pub use hangman::{Hangman, HangmanAction, HangmanEvent, HangmanSnapshot};
pub use memory::{Memory, MemoryAction, MemoryEvent, MemorySnapshot};
pub use mock_exam::{ExamSummary, MockExam, MockExamAction, MockExamEvent, MockExamSnapshot};
pub use quiz::{Quiz, QuizAction, QuizEvent, QuizSnapshot};
pub use roulette::{Roulette, RouletteAction, RouletteEvent, RouletteSnapshot};
pub use runner::{GameHandle, GameOutbound, GameRunnerConfig, GameSender, spawn_game};
pub use status::GameStatus;
