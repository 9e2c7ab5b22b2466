//! Quiz: five multiple choice questions, twenty points each.

use std::time::Duration;

use rand::Rng;
use serde::Serialize;

use crate::fixtures::{ChoiceQuestion, QUIZ_QUESTIONS};
use crate::game::whole_seconds;
use crate::{Game, GameError, GameStatus};

/// Points for each correct answer.
pub const POINTS_PER_CORRECT: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizAction {
    /// Choose an option for the current question.
    Select(usize),
    /// Lock in the selected option.
    Submit,
    /// Move to the next question, or finish after the last.
    Next,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuizEvent {
    Selected {
        option: usize,
    },
    Answered {
        question: usize,
        correct: bool,
        correct_option: usize,
        explanation: &'static str,
    },
    Advanced {
        question: usize,
    },
    Finished {
        score: u32,
        correct: u32,
        accuracy: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizSnapshot {
    pub status: GameStatus,
    pub current: usize,
    pub total: usize,
    pub prompt: &'static str,
    pub options: [&'static str; 4],
    pub selected: Option<usize>,
    /// Whether the current question has been submitted.
    pub submitted: bool,
    pub score: u32,
    pub correct: u32,
    pub elapsed_secs: u32,
}

#[derive(Debug)]
pub struct Quiz {
    questions: Vec<ChoiceQuestion>,
    current: usize,
    selected: Option<usize>,
    submitted: bool,
    correct: u32,
    score: u32,
    status: GameStatus,
    elapsed: Duration,
}

impl Default for Quiz {
    fn default() -> Self {
        Self::new()
    }
}

impl Quiz {
    pub fn new() -> Self {
        Self {
            questions: QUIZ_QUESTIONS.to_vec(),
            current: 0,
            selected: None,
            submitted: false,
            correct: 0,
            score: 0,
            status: GameStatus::Setup,
            elapsed: Duration::ZERO,
        }
    }

    pub fn questions(&self) -> &[ChoiceQuestion] {
        &self.questions
    }

    pub fn correct_answers(&self) -> u32 {
        self.correct
    }

    /// Share of questions answered correctly, as a rounded percentage.
    pub fn accuracy(&self) -> u32 {
        let total = self.questions.len() as f64;
        (f64::from(self.correct) / total * 100.0).round() as u32
    }

    fn question(&self) -> &ChoiceQuestion {
        &self.questions[self.current]
    }

    fn select(&mut self, option: usize) -> Result<Vec<QuizEvent>, GameError> {
        if self.submitted {
            return Ok(Vec::new());
        }
        if option >= self.question().options.len() {
            return Err(GameError::invalid(format!("option {option} does not exist")));
        }
        self.selected = Some(option);
        Ok(vec![QuizEvent::Selected { option }])
    }

    fn submit(&mut self) -> Result<Vec<QuizEvent>, GameError> {
        if self.submitted {
            return Ok(Vec::new());
        }
        let Some(choice) = self.selected else {
            return Err(GameError::invalid("select an option first"));
        };
        self.submitted = true;

        let question = self.question();
        let correct = choice == question.correct;
        let event = QuizEvent::Answered {
            question: self.current,
            correct,
            correct_option: question.correct,
            explanation: question.explanation,
        };
        if correct {
            self.correct += 1;
            self.score += POINTS_PER_CORRECT;
        }
        Ok(vec![event])
    }

    fn next(&mut self) -> Result<Vec<QuizEvent>, GameError> {
        if !self.submitted {
            return Err(GameError::invalid("submit an answer first"));
        }
        if self.current + 1 >= self.questions.len() {
            self.status = GameStatus::Finished;
            tracing::debug!(score = self.score, "quiz finished");
            return Ok(vec![QuizEvent::Finished {
                score: self.score,
                correct: self.correct,
                accuracy: self.accuracy(),
            }]);
        }
        self.current += 1;
        self.selected = None;
        self.submitted = false;
        Ok(vec![QuizEvent::Advanced {
            question: self.current,
        }])
    }
}

impl Game for Quiz {
    type Action = QuizAction;
    type Event = QuizEvent;
    type Snapshot = QuizSnapshot;

    fn name(&self) -> &'static str {
        "quiz"
    }

    /// The question set is fixed; the generator is not consulted.
    fn reset<R: Rng>(&mut self, _rng: &mut R) {
        self.current = 0;
        self.selected = None;
        self.submitted = false;
        self.correct = 0;
        self.score = 0;
        self.elapsed = Duration::ZERO;
        self.status = GameStatus::Playing;
    }

    fn status(&self) -> GameStatus {
        self.status
    }

    fn apply(&mut self, action: QuizAction) -> Result<Vec<QuizEvent>, GameError> {
        self.status.ensure_playing()?;
        match action {
            QuizAction::Select(option) => self.select(option),
            QuizAction::Submit => self.submit(),
            QuizAction::Next => self.next(),
        }
    }

    fn tick(&mut self, dt: Duration) -> Vec<QuizEvent> {
        if self.status.accepts_input() {
            self.elapsed += dt;
        }
        Vec::new()
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn snapshot(&self) -> QuizSnapshot {
        let question = self.question();
        QuizSnapshot {
            status: self.status,
            current: self.current,
            total: self.questions.len(),
            prompt: question.prompt,
            options: question.options,
            selected: self.selected,
            submitted: self.submitted,
            score: self.score,
            correct: self.correct,
            elapsed_secs: whole_seconds(self.elapsed),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn playing() -> Quiz {
        let mut quiz = Quiz::new();
        quiz.reset(&mut StdRng::seed_from_u64(0));
        quiz
    }

    #[test]
    fn test_correct_submit_scores_twenty() {
        let mut quiz = playing();
        let right = quiz.questions()[0].correct;
        quiz.apply(QuizAction::Select(right)).unwrap();
        let events = quiz.apply(QuizAction::Submit).unwrap();
        assert!(matches!(
            events[0],
            QuizEvent::Answered { correct: true, .. }
        ));
        assert_eq!(quiz.score(), 20);
    }

    #[test]
    fn test_resubmit_is_noop() {
        let mut quiz = playing();
        let right = quiz.questions()[0].correct;
        quiz.apply(QuizAction::Select(right)).unwrap();
        quiz.apply(QuizAction::Submit).unwrap();
        assert!(quiz.apply(QuizAction::Submit).unwrap().is_empty());
        assert_eq!(quiz.score(), 20);
    }

    #[test]
    fn test_select_after_submit_is_ignored() {
        let mut quiz = playing();
        quiz.apply(QuizAction::Select(0)).unwrap();
        quiz.apply(QuizAction::Submit).unwrap();
        assert!(quiz.apply(QuizAction::Select(1)).unwrap().is_empty());
        assert_eq!(quiz.snapshot().selected, Some(0));
    }

    #[test]
    fn test_submit_without_selection_is_invalid() {
        let mut quiz = playing();
        assert!(matches!(
            quiz.apply(QuizAction::Submit),
            Err(GameError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_next_requires_submission() {
        let mut quiz = playing();
        assert!(matches!(
            quiz.apply(QuizAction::Next),
            Err(GameError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_select_out_of_range_is_invalid() {
        let mut quiz = playing();
        assert!(matches!(
            quiz.apply(QuizAction::Select(4)),
            Err(GameError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_next_after_last_finishes() {
        let mut quiz = playing();
        for _ in 0..4 {
            quiz.apply(QuizAction::Select(0)).unwrap();
            quiz.apply(QuizAction::Submit).unwrap();
            quiz.apply(QuizAction::Next).unwrap();
        }
        assert_eq!(quiz.snapshot().current, 4);
        quiz.apply(QuizAction::Select(0)).unwrap();
        quiz.apply(QuizAction::Submit).unwrap();
        let events = quiz.apply(QuizAction::Next).unwrap();
        assert!(matches!(events[0], QuizEvent::Finished { .. }));
        assert_eq!(quiz.status(), GameStatus::Finished);
        assert_eq!(quiz.apply(QuizAction::Next), Err(GameError::GameOver));
    }
}
