//! Crossword over a fixed grid of legal terms.

use std::time::Duration;

use rand::Rng;
use serde::Serialize;

use crate::fixtures::{CROSSWORD_CLUES, ClueSpec, Direction};
use crate::game::{floored, whole_seconds};
use crate::{Game, GameError, GameStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrosswordAction {
    /// Focus a clue, by index into the clue list.
    SelectClue(usize),
    /// Answer the selected clue. Case and whitespace are ignored.
    Submit(String),
    /// Reveal the first letter of the selected clue.
    Hint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CrosswordEvent {
    ClueSelected { clue: usize },
    Solved { clue: usize },
    Incorrect { clue: usize },
    HintRevealed { clue: usize, letter: char },
    Won { score: u32 },
}

/// One grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "letter", rename_all = "snake_case")]
pub enum Cell {
    /// Not part of any answer.
    Block,
    Empty,
    Filled(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClueView {
    pub number: u8,
    pub direction: Direction,
    pub clue: &'static str,
    pub length: usize,
    pub solved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrosswordSnapshot {
    pub status: GameStatus,
    pub grid: Vec<Vec<Cell>>,
    pub clues: Vec<ClueView>,
    pub selected: Option<usize>,
    /// Text prefilled by a hint for the selected clue.
    pub draft: String,
    pub hints_used: u32,
    pub elapsed_secs: u32,
    pub score: u32,
}

#[derive(Debug)]
pub struct Crossword {
    clues: Vec<ClueSpec>,
    rows: usize,
    cols: usize,
    grid: Vec<Vec<Cell>>,
    solved: Vec<bool>,
    selected: Option<usize>,
    draft: String,
    hints_used: u32,
    status: GameStatus,
    elapsed: Duration,
    score: u32,
}

impl Default for Crossword {
    fn default() -> Self {
        Self::new()
    }
}

impl Crossword {
    pub fn new() -> Self {
        let clues = CROSSWORD_CLUES.to_vec();
        let (rows, cols) = extent(&clues);
        Self {
            clues,
            rows,
            cols,
            grid: Vec::new(),
            solved: Vec::new(),
            selected: None,
            draft: String::new(),
            hints_used: 0,
            status: GameStatus::Setup,
            elapsed: Duration::ZERO,
            score: 0,
        }
    }

    pub fn clues(&self) -> &[ClueSpec] {
        &self.clues
    }

    /// `(rows, cols)` of the grid.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    fn blank_grid(&self) -> Vec<Vec<Cell>> {
        let mut grid = vec![vec![Cell::Block; self.cols]; self.rows];
        for clue in &self.clues {
            for (row, col) in cells(clue) {
                grid[row][col] = Cell::Empty;
            }
        }
        grid
    }

    fn select(&mut self, clue: usize) -> Result<Vec<CrosswordEvent>, GameError> {
        if clue >= self.clues.len() {
            return Err(GameError::invalid(format!("clue {clue} does not exist")));
        }
        if self.solved[clue] || self.selected == Some(clue) {
            return Ok(Vec::new());
        }
        self.selected = Some(clue);
        self.draft.clear();
        Ok(vec![CrosswordEvent::ClueSelected { clue }])
    }

    fn submit(&mut self, text: &str) -> Result<Vec<CrosswordEvent>, GameError> {
        let Some(clue) = self.selected else {
            return Err(GameError::invalid("no clue selected"));
        };
        let guess: String = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_uppercase)
            .collect();
        if guess.is_empty() {
            return Ok(Vec::new());
        }

        let entry = &self.clues[clue];
        if guess != entry.answer {
            self.draft = guess;
            return Ok(vec![CrosswordEvent::Incorrect { clue }]);
        }

        for ((row, col), letter) in cells(entry).zip(entry.answer.chars()) {
            self.grid[row][col] = Cell::Filled(letter);
        }
        self.solved[clue] = true;
        self.selected = None;
        self.draft.clear();

        let mut events = vec![CrosswordEvent::Solved { clue }];
        if self.solved.iter().all(|s| *s) {
            let penalty = self.hints_used * 50 + whole_seconds(self.elapsed) / 10;
            self.score = floored(500, penalty, 50);
            self.status = GameStatus::Won;
            tracing::debug!(score = self.score, hints = self.hints_used, "crossword won");
            events.push(CrosswordEvent::Won { score: self.score });
        }
        Ok(events)
    }

    fn hint(&mut self) -> Result<Vec<CrosswordEvent>, GameError> {
        let clue = self
            .selected
            .filter(|c| !self.solved[*c])
            .ok_or_else(|| GameError::invalid("select an unsolved clue first"))?;
        let Some(letter) = self.clues[clue].answer.chars().next() else {
            return Ok(Vec::new());
        };
        self.hints_used += 1;
        self.draft = letter.to_string();
        Ok(vec![CrosswordEvent::HintRevealed { clue, letter }])
    }
}

impl Game for Crossword {
    type Action = CrosswordAction;
    type Event = CrosswordEvent;
    type Snapshot = CrosswordSnapshot;

    fn name(&self) -> &'static str {
        "crossword"
    }

    /// The grid is fixed; the generator is not consulted.
    fn reset<R: Rng>(&mut self, _rng: &mut R) {
        self.grid = self.blank_grid();
        self.solved = vec![false; self.clues.len()];
        self.selected = None;
        self.draft.clear();
        self.hints_used = 0;
        self.elapsed = Duration::ZERO;
        self.score = 0;
        self.status = GameStatus::Playing;
    }

    fn status(&self) -> GameStatus {
        self.status
    }

    fn apply(&mut self, action: CrosswordAction) -> Result<Vec<CrosswordEvent>, GameError> {
        self.status.ensure_playing()?;
        match action {
            CrosswordAction::SelectClue(clue) => self.select(clue),
            CrosswordAction::Submit(text) => self.submit(&text),
            CrosswordAction::Hint => self.hint(),
        }
    }

    fn tick(&mut self, dt: Duration) -> Vec<CrosswordEvent> {
        if self.status.accepts_input() {
            self.elapsed += dt;
        }
        Vec::new()
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn snapshot(&self) -> CrosswordSnapshot {
        CrosswordSnapshot {
            status: self.status,
            grid: self.grid.clone(),
            clues: self
                .clues
                .iter()
                .enumerate()
                .map(|(i, c)| ClueView {
                    number: c.number,
                    direction: c.direction,
                    clue: c.clue,
                    length: c.answer.len(),
                    solved: self.solved.get(i).copied().unwrap_or(false),
                })
                .collect(),
            selected: self.selected,
            draft: self.draft.clone(),
            hints_used: self.hints_used,
            elapsed_secs: whole_seconds(self.elapsed),
            score: self.score,
        }
    }
}

/// The cells an answer occupies, first letter first.
fn cells(clue: &ClueSpec) -> impl Iterator<Item = (usize, usize)> + '_ {
    (0..clue.answer.len()).map(move |i| match clue.direction {
        Direction::Across => (clue.row, clue.col + i),
        Direction::Down => (clue.row + i, clue.col),
    })
}

/// The smallest grid holding every answer.
fn extent(clues: &[ClueSpec]) -> (usize, usize) {
    clues
        .iter()
        .flat_map(cells)
        .fold((0, 0), |(rows, cols), (r, c)| (rows.max(r + 1), cols.max(c + 1)))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn playing() -> Crossword {
        let mut game = Crossword::new();
        game.reset(&mut StdRng::seed_from_u64(0));
        game
    }

    fn solve(game: &mut Crossword, clue: usize) -> Vec<CrosswordEvent> {
        let answer = game.clues()[clue].answer;
        game.apply(CrosswordAction::SelectClue(clue)).unwrap();
        game.apply(CrosswordAction::Submit(answer.to_string())).unwrap()
    }

    #[test]
    fn test_grid_extent_covers_every_answer() {
        assert_eq!(Crossword::new().dimensions(), (7, 12));
        let game = playing();
        let snap = game.snapshot();
        assert_eq!(snap.grid[0][0], Cell::Empty);
        assert_eq!(snap.grid[1][1], Cell::Block);
    }

    #[test]
    fn test_submit_normalizes_case_and_whitespace() {
        let mut game = playing();
        game.apply(CrosswordAction::SelectClue(1)).unwrap();
        let events = game
            .apply(CrosswordAction::Submit(" co urt ".to_string()))
            .unwrap();
        assert_eq!(events, vec![CrosswordEvent::Solved { clue: 1 }]);
        let snap = game.snapshot();
        assert_eq!(snap.grid[4][0], Cell::Filled('T'));
        assert_eq!(snap.selected, None);
        assert!(snap.clues[1].solved);
    }

    #[test]
    fn test_wrong_answer_leaves_grid_untouched() {
        let mut game = playing();
        game.apply(CrosswordAction::SelectClue(4)).unwrap();
        let events = game
            .apply(CrosswordAction::Submit("judge".to_string()))
            .unwrap();
        assert_eq!(events, vec![CrosswordEvent::Incorrect { clue: 4 }]);
        assert_eq!(game.snapshot().grid[4][2], Cell::Empty);
        assert_eq!(game.snapshot().selected, Some(4));
    }

    #[test]
    fn test_submit_blank_is_noop() {
        let mut game = playing();
        game.apply(CrosswordAction::SelectClue(4)).unwrap();
        game.apply(CrosswordAction::Submit("jud".to_string())).unwrap();

        let events = game.apply(CrosswordAction::Submit(" \t ".to_string())).unwrap();

        assert!(events.is_empty());
        let snap = game.snapshot();
        assert_eq!(snap.selected, Some(4));
        assert_eq!(snap.draft, "JUD");
        assert_eq!(snap.status, GameStatus::Playing);
    }

    #[test]
    fn test_submit_without_selection_is_invalid() {
        let mut game = playing();
        assert!(matches!(
            game.apply(CrosswordAction::Submit("COURT".to_string())),
            Err(GameError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_hint_reveals_first_letter_of_selected_unsolved_clue() {
        let mut game = playing();
        assert!(game.apply(CrosswordAction::Hint).is_err());

        game.apply(CrosswordAction::SelectClue(5)).unwrap();
        let events = game.apply(CrosswordAction::Hint).unwrap();
        assert_eq!(
            events,
            vec![CrosswordEvent::HintRevealed {
                clue: 5,
                letter: 'A'
            }]
        );
        assert_eq!(game.snapshot().draft, "A");
        assert_eq!(game.hints_used(), 1);

        solve(&mut game, 5);
        assert!(game.apply(CrosswordAction::Hint).is_err());
        assert_eq!(game.hints_used(), 1);
    }

    #[test]
    fn test_selecting_solved_clue_is_noop() {
        let mut game = playing();
        solve(&mut game, 0);
        assert!(game.apply(CrosswordAction::SelectClue(0)).unwrap().is_empty());
    }

    #[test]
    fn test_all_solved_wins_with_hint_and_time_penalty() {
        let mut game = playing();
        game.apply(CrosswordAction::SelectClue(0)).unwrap();
        game.apply(CrosswordAction::Hint).unwrap();
        game.apply(CrosswordAction::SelectClue(2)).unwrap();
        game.apply(CrosswordAction::Hint).unwrap();
        game.tick(Duration::from_secs(125));

        let mut last = Vec::new();
        for clue in 0..game.clues().len() {
            last = solve(&mut game, clue);
        }
        assert_eq!(game.status(), GameStatus::Won);
        // 500 - 2*50 - 125/10
        assert_eq!(last.last(), Some(&CrosswordEvent::Won { score: 388 }));
        assert_eq!(game.score(), 388);
    }

    #[test]
    fn test_score_floor() {
        let mut game = playing();
        game.tick(Duration::from_secs(10_000));
        for clue in 0..game.clues().len() {
            solve(&mut game, clue);
        }
        assert_eq!(game.score(), 50);
    }
}
