//! Hangman: guess the hidden legal term one letter at a time.

use std::collections::BTreeSet;
use std::time::Duration;

use rand::Rng;
use serde::Serialize;

use crate::fixtures::HANGMAN_WORDS;
use crate::game::{floored, whole_seconds};
use crate::{Game, GameError, GameStatus};

/// Wrong guesses allowed before the game is lost.
pub const MAX_WRONG_GUESSES: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HangmanAction {
    /// Guess a letter. Case-insensitive.
    Guess(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HangmanEvent {
    Revealed { letter: char, positions: Vec<usize> },
    Missed { letter: char, wrong_guesses: u32 },
    Won { score: u32 },
    Lost { word: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HangmanSnapshot {
    pub status: GameStatus,
    /// The word with unguessed letters shown as `_`.
    pub masked: String,
    pub guessed: Vec<char>,
    pub wrong_guesses: u32,
    pub max_wrong_guesses: u32,
    pub elapsed_secs: u32,
    pub score: u32,
    /// Revealed once the game is over.
    pub word: Option<String>,
}

#[derive(Debug)]
pub struct Hangman {
    bank: Vec<String>,
    word: String,
    guessed: BTreeSet<char>,
    wrong_guesses: u32,
    status: GameStatus,
    elapsed: Duration,
    score: u32,
}

impl Default for Hangman {
    fn default() -> Self {
        Self::new()
    }
}

impl Hangman {
    /// A game over the built-in word bank, waiting in `Setup`.
    pub fn new() -> Self {
        Self::from_bank(HANGMAN_WORDS.iter().map(|w| w.to_string()).collect())
    }

    /// A game over a custom word bank.
    ///
    /// # Errors
    /// [`GameError::InvalidInput`] if the bank is empty or a word
    /// contains anything but ASCII letters.
    pub fn with_words<I, S>(words: I) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let bank: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_ascii_uppercase())
            .collect();
        if bank.is_empty() {
            return Err(GameError::invalid("word bank is empty"));
        }
        if let Some(bad) = bank
            .iter()
            .find(|w| w.is_empty() || !w.chars().all(|c| c.is_ascii_uppercase()))
        {
            return Err(GameError::invalid(format!("not a plain word: {bad:?}")));
        }
        Ok(Self::from_bank(bank))
    }

    fn from_bank(bank: Vec<String>) -> Self {
        Self {
            bank,
            word: String::new(),
            guessed: BTreeSet::new(),
            wrong_guesses: 0,
            status: GameStatus::Setup,
            elapsed: Duration::ZERO,
            score: 0,
        }
    }

    pub fn wrong_guesses(&self) -> u32 {
        self.wrong_guesses
    }

    fn is_solved(&self) -> bool {
        self.word.chars().all(|c| self.guessed.contains(&c))
    }

    fn masked(&self) -> String {
        self.word
            .chars()
            .map(|c| if self.guessed.contains(&c) { c } else { '_' })
            .collect()
    }

    fn guess(&mut self, raw: char) -> Result<Vec<HangmanEvent>, GameError> {
        if !raw.is_ascii_alphabetic() {
            return Err(GameError::invalid(format!("{raw:?} is not a letter")));
        }
        let letter = raw.to_ascii_uppercase();
        if !self.guessed.insert(letter) {
            return Ok(Vec::new());
        }

        let positions: Vec<usize> = self
            .word
            .chars()
            .enumerate()
            .filter_map(|(i, c)| (c == letter).then_some(i))
            .collect();

        if positions.is_empty() {
            self.wrong_guesses += 1;
            let mut events = vec![HangmanEvent::Missed {
                letter,
                wrong_guesses: self.wrong_guesses,
            }];
            if self.wrong_guesses >= MAX_WRONG_GUESSES {
                self.status = GameStatus::Lost;
                tracing::debug!(word = %self.word, "hangman lost");
                events.push(HangmanEvent::Lost {
                    word: self.word.clone(),
                });
            }
            return Ok(events);
        }

        let mut events = vec![HangmanEvent::Revealed { letter, positions }];
        if self.is_solved() {
            let penalty = self.wrong_guesses * 10 + whole_seconds(self.elapsed) / 10;
            self.score = floored(100, penalty, 10);
            self.status = GameStatus::Won;
            tracing::debug!(score = self.score, "hangman won");
            events.push(HangmanEvent::Won { score: self.score });
        }
        Ok(events)
    }
}

impl Game for Hangman {
    type Action = HangmanAction;
    type Event = HangmanEvent;
    type Snapshot = HangmanSnapshot;

    fn name(&self) -> &'static str {
        "hangman"
    }

    fn reset<R: Rng>(&mut self, rng: &mut R) {
        let pick = rng.random_range(0..self.bank.len());
        self.word = self.bank[pick].clone();
        self.guessed.clear();
        self.wrong_guesses = 0;
        self.elapsed = Duration::ZERO;
        self.score = 0;
        self.status = GameStatus::Playing;
    }

    fn status(&self) -> GameStatus {
        self.status
    }

    fn apply(&mut self, action: HangmanAction) -> Result<Vec<HangmanEvent>, GameError> {
        self.status.ensure_playing()?;
        match action {
            HangmanAction::Guess(c) => self.guess(c),
        }
    }

    fn tick(&mut self, dt: Duration) -> Vec<HangmanEvent> {
        if self.status.accepts_input() {
            self.elapsed += dt;
        }
        Vec::new()
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn snapshot(&self) -> HangmanSnapshot {
        HangmanSnapshot {
            status: self.status,
            masked: self.masked(),
            guessed: self.guessed.iter().copied().collect(),
            wrong_guesses: self.wrong_guesses,
            max_wrong_guesses: MAX_WRONG_GUESSES,
            elapsed_secs: whole_seconds(self.elapsed),
            score: self.score,
            word: self.status.is_terminal().then(|| self.word.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn playing(word: &str) -> Hangman {
        let mut game = Hangman::with_words([word]).unwrap();
        game.reset(&mut StdRng::seed_from_u64(1));
        game
    }

    fn guess_all(game: &mut Hangman, letters: &str) {
        for c in letters.chars() {
            game.apply(HangmanAction::Guess(c)).unwrap();
        }
    }

    #[test]
    fn test_apply_before_reset_is_not_started() {
        let mut game = Hangman::new();
        assert_eq!(
            game.apply(HangmanAction::Guess('a')),
            Err(GameError::NotStarted)
        );
    }

    #[test]
    fn test_reset_picks_word_from_bank() {
        let mut game = Hangman::new();
        game.reset(&mut StdRng::seed_from_u64(7));
        let snap = game.snapshot();
        assert_eq!(snap.status, GameStatus::Playing);
        assert!(HANGMAN_WORDS.iter().any(|w| w.len() == snap.masked.len()));
        assert!(snap.masked.chars().all(|c| c == '_'));
    }

    #[test]
    fn test_guess_reveals_all_positions_case_insensitive() {
        let mut game = playing("APPEAL");
        let events = game.apply(HangmanAction::Guess('p')).unwrap();
        assert_eq!(
            events,
            vec![HangmanEvent::Revealed {
                letter: 'P',
                positions: vec![1, 2]
            }]
        );
        assert_eq!(game.snapshot().masked, "_PP___");
    }

    #[test]
    fn test_all_letters_guessed_wins_with_score() {
        let mut game = playing("APPEAL");
        guess_all(&mut game, "ZAPE");
        let last = game.apply(HangmanAction::Guess('L')).unwrap();
        assert_eq!(game.status(), GameStatus::Won);
        assert_eq!(last.last(), Some(&HangmanEvent::Won { score: 90 }));
        assert_eq!(game.score(), 90);
    }

    #[test]
    fn test_score_includes_time_penalty_and_floor() {
        let mut game = playing("APPEAL");
        guess_all(&mut game, "BCDFG");
        game.tick(Duration::from_secs(95));
        guess_all(&mut game, "APEL");
        // 100 - 50 - 9 = 41
        assert_eq!(game.score(), 41);

        let mut slow = playing("APPEAL");
        guess_all(&mut slow, "BCDFG");
        slow.tick(Duration::from_secs(1000));
        guess_all(&mut slow, "APEL");
        assert_eq!(slow.score(), 10);
    }

    #[test]
    fn test_six_wrong_guesses_lose_and_reveal_word() {
        let mut game = playing("APPEAL");
        guess_all(&mut game, "BCDFG");
        let events = game.apply(HangmanAction::Guess('H')).unwrap();
        assert_eq!(game.status(), GameStatus::Lost);
        assert_eq!(
            events.last(),
            Some(&HangmanEvent::Lost {
                word: "APPEAL".to_string()
            })
        );
        assert_eq!(game.snapshot().word.as_deref(), Some("APPEAL"));
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_repeated_guess_is_noop_in_every_state() {
        let mut game = playing("APPEAL");
        game.apply(HangmanAction::Guess('Z')).unwrap();
        assert!(game.apply(HangmanAction::Guess('z')).unwrap().is_empty());
        assert_eq!(game.wrong_guesses(), 1);

        game.apply(HangmanAction::Guess('A')).unwrap();
        assert!(game.apply(HangmanAction::Guess('A')).unwrap().is_empty());

        guess_all(&mut game, "PEL");
        assert_eq!(game.status(), GameStatus::Won);
        assert_eq!(
            game.apply(HangmanAction::Guess('A')),
            Err(GameError::GameOver)
        );
    }

    #[test]
    fn test_non_letter_is_invalid_input() {
        let mut game = playing("APPEAL");
        assert!(matches!(
            game.apply(HangmanAction::Guess('3')),
            Err(GameError::InvalidInput(_))
        ));
        assert!(game.snapshot().guessed.is_empty());
    }

    #[test]
    fn test_tick_only_counts_while_playing() {
        let mut game = playing("AB");
        game.tick(Duration::from_secs(3));
        guess_all(&mut game, "AB");
        game.tick(Duration::from_secs(10));
        assert_eq!(game.snapshot().elapsed_secs, 3);
    }

    #[test]
    fn test_with_words_rejects_bad_bank() {
        assert!(Hangman::with_words(Vec::<String>::new()).is_err());
        assert!(Hangman::with_words(["two words"]).is_err());
        assert!(Hangman::with_words(["ok"]).is_ok());
    }
}
