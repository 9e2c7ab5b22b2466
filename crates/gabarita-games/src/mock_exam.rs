//! Timed mock exam with free navigation and a review mode.

use std::time::Duration;

use rand::Rng;
use serde::Serialize;

use crate::fixtures::{ChoiceQuestion, EXAM_QUESTIONS};
use crate::game::whole_seconds;
use crate::{Game, GameError, GameStatus};

/// Default time allowed for the exam: three hours.
pub const DEFAULT_EXAM_DURATION: Duration = Duration::from_secs(180 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockExamAction {
    /// Answer the current question. May be changed until the exam ends.
    Answer(usize),
    GoTo(usize),
    Next,
    Previous,
    /// Hand in the exam.
    Finish,
    /// Walk through the graded exam.
    Review,
}

/// Outcome counts for a graded exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExamSummary {
    pub correct: u32,
    pub incorrect: u32,
    pub unanswered: u32,
    pub total: u32,
    /// `round(correct / total * 100)`.
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MockExamEvent {
    Answered { question: usize, option: usize },
    Moved { question: usize },
    TimeUp,
    Finished { summary: ExamSummary },
    ReviewStarted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MockExamSnapshot {
    pub status: GameStatus,
    pub current: usize,
    pub total: usize,
    pub prompt: &'static str,
    pub options: [&'static str; 4],
    pub subject: &'static str,
    pub answers: Vec<Option<usize>>,
    pub answered: usize,
    pub remaining_secs: u32,
    /// Correct option and explanation, shown once the exam is graded.
    pub correct_option: Option<usize>,
    pub explanation: Option<&'static str>,
    pub summary: Option<ExamSummary>,
}

#[derive(Debug)]
pub struct MockExam {
    questions: Vec<ChoiceQuestion>,
    duration: Duration,
    answers: Vec<Option<usize>>,
    current: usize,
    status: GameStatus,
    elapsed: Duration,
    summary: Option<ExamSummary>,
}

impl Default for MockExam {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExam {
    /// The built-in ten-question exam with the default duration.
    pub fn new() -> Self {
        Self::with_duration(DEFAULT_EXAM_DURATION)
    }

    pub fn with_duration(duration: Duration) -> Self {
        Self {
            questions: EXAM_QUESTIONS.to_vec(),
            duration,
            answers: Vec::new(),
            current: 0,
            status: GameStatus::Setup,
            elapsed: Duration::ZERO,
            summary: None,
        }
    }

    pub fn questions(&self) -> &[ChoiceQuestion] {
        &self.questions
    }

    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed)
    }

    /// Counts after grading; `None` while the exam runs.
    pub fn summary(&self) -> Option<ExamSummary> {
        self.summary
    }

    fn grade(&self) -> ExamSummary {
        let total = self.questions.len() as u32;
        let mut correct = 0;
        let mut unanswered = 0;
        for (question, answer) in self.questions.iter().zip(&self.answers) {
            match answer {
                Some(choice) if *choice == question.correct => correct += 1,
                Some(_) => {}
                None => unanswered += 1,
            }
        }
        ExamSummary {
            correct,
            incorrect: total - correct - unanswered,
            unanswered,
            total,
            score: (f64::from(correct) / f64::from(total) * 100.0).round() as u32,
        }
    }

    fn finish(&mut self) -> MockExamEvent {
        let summary = self.grade();
        self.summary = Some(summary);
        self.status = GameStatus::Finished;
        tracing::debug!(
            score = summary.score,
            correct = summary.correct,
            unanswered = summary.unanswered,
            "mock exam finished"
        );
        MockExamEvent::Finished { summary }
    }

    fn answer(&mut self, option: usize) -> Result<Vec<MockExamEvent>, GameError> {
        self.status.ensure_playing()?;
        if option >= self.questions[self.current].options.len() {
            return Err(GameError::invalid(format!("option {option} does not exist")));
        }
        if self.answers[self.current] == Some(option) {
            return Ok(Vec::new());
        }
        self.answers[self.current] = Some(option);
        Ok(vec![MockExamEvent::Answered {
            question: self.current,
            option,
        }])
    }

    fn go_to(&mut self, question: usize) -> Result<Vec<MockExamEvent>, GameError> {
        match self.status {
            GameStatus::Playing | GameStatus::Reviewing => {}
            GameStatus::Setup => return Err(GameError::NotStarted),
            _ => return Err(GameError::GameOver),
        }
        if question >= self.questions.len() {
            return Err(GameError::invalid(format!("question {question} does not exist")));
        }
        if question == self.current {
            return Ok(Vec::new());
        }
        self.current = question;
        Ok(vec![MockExamEvent::Moved { question }])
    }

    fn review(&mut self) -> Result<Vec<MockExamEvent>, GameError> {
        match self.status {
            GameStatus::Finished => {
                self.status = GameStatus::Reviewing;
                self.current = 0;
                Ok(vec![MockExamEvent::ReviewStarted])
            }
            GameStatus::Reviewing => Ok(Vec::new()),
            GameStatus::Setup => Err(GameError::NotStarted),
            _ => Err(GameError::invalid("finish the exam before reviewing it")),
        }
    }
}

impl Game for MockExam {
    type Action = MockExamAction;
    type Event = MockExamEvent;
    type Snapshot = MockExamSnapshot;

    fn name(&self) -> &'static str {
        "mock_exam"
    }

    /// The question set is fixed; the generator is not consulted.
    fn reset<R: Rng>(&mut self, _rng: &mut R) {
        self.answers = vec![None; self.questions.len()];
        self.current = 0;
        self.elapsed = Duration::ZERO;
        self.summary = None;
        self.status = GameStatus::Playing;
    }

    fn status(&self) -> GameStatus {
        self.status
    }

    fn apply(&mut self, action: MockExamAction) -> Result<Vec<MockExamEvent>, GameError> {
        match action {
            MockExamAction::Answer(option) => self.answer(option),
            MockExamAction::GoTo(question) => self.go_to(question),
            MockExamAction::Next => {
                let last = self.questions.len() - 1;
                self.go_to((self.current + 1).min(last))
            }
            MockExamAction::Previous => self.go_to(self.current.saturating_sub(1)),
            MockExamAction::Finish => {
                self.status.ensure_playing()?;
                Ok(vec![self.finish()])
            }
            MockExamAction::Review => self.review(),
        }
    }

    fn tick(&mut self, dt: Duration) -> Vec<MockExamEvent> {
        if !self.status.accepts_input() {
            return Vec::new();
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            tracing::info!("mock exam time is up");
            return vec![MockExamEvent::TimeUp, self.finish()];
        }
        Vec::new()
    }

    fn score(&self) -> u32 {
        self.summary.map_or(0, |s| s.score)
    }

    fn snapshot(&self) -> MockExamSnapshot {
        let question = &self.questions[self.current];
        let graded = self.summary.is_some();
        MockExamSnapshot {
            status: self.status,
            current: self.current,
            total: self.questions.len(),
            prompt: question.prompt,
            options: question.options,
            subject: question.subject,
            answers: self.answers.clone(),
            answered: self.answers.iter().filter(|a| a.is_some()).count(),
            remaining_secs: whole_seconds(self.remaining()),
            correct_option: graded.then_some(question.correct),
            explanation: graded.then_some(question.explanation),
            summary: self.summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn playing(duration: Duration) -> MockExam {
        let mut exam = MockExam::with_duration(duration);
        exam.reset(&mut StdRng::seed_from_u64(0));
        exam
    }

    /// Answers question `i` correctly for every `i` in `which`.
    fn answer_correctly(exam: &mut MockExam, which: impl IntoIterator<Item = usize>) {
        for i in which {
            let right = exam.questions()[i].correct;
            exam.apply(MockExamAction::GoTo(i)).unwrap();
            exam.apply(MockExamAction::Answer(right)).unwrap();
        }
    }

    #[test]
    fn test_default_duration_is_three_hours() {
        let exam = MockExam::new();
        assert_eq!(exam.remaining(), Duration::from_secs(10_800));
        assert_eq!(exam.status(), GameStatus::Setup);
    }

    #[test]
    fn test_answer_can_be_changed_until_finish() {
        let mut exam = playing(DEFAULT_EXAM_DURATION);
        exam.apply(MockExamAction::Answer(0)).unwrap();
        let events = exam.apply(MockExamAction::Answer(2)).unwrap();
        assert_eq!(
            events,
            vec![MockExamEvent::Answered {
                question: 0,
                option: 2
            }]
        );
        assert!(exam.apply(MockExamAction::Answer(2)).unwrap().is_empty());
        exam.apply(MockExamAction::Finish).unwrap();
        assert_eq!(exam.apply(MockExamAction::Answer(1)), Err(GameError::GameOver));
    }

    #[test]
    fn test_navigation_clamps_at_edges() {
        let mut exam = playing(DEFAULT_EXAM_DURATION);
        assert!(exam.apply(MockExamAction::Previous).unwrap().is_empty());
        exam.apply(MockExamAction::GoTo(9)).unwrap();
        assert!(exam.apply(MockExamAction::Next).unwrap().is_empty());
        exam.apply(MockExamAction::Previous).unwrap();
        assert_eq!(exam.snapshot().current, 8);
        assert!(matches!(
            exam.apply(MockExamAction::GoTo(10)),
            Err(GameError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_finish_scores_rounded_percentage_and_summary() {
        let mut exam = playing(DEFAULT_EXAM_DURATION);
        answer_correctly(&mut exam, [0, 1, 2]);
        // One wrong answer on question 3.
        let wrong = (exam.questions()[3].correct + 1) % 4;
        exam.apply(MockExamAction::GoTo(3)).unwrap();
        exam.apply(MockExamAction::Answer(wrong)).unwrap();

        exam.apply(MockExamAction::Finish).unwrap();
        let summary = exam.summary().unwrap();
        assert_eq!(summary.correct, 3);
        assert_eq!(summary.incorrect, 1);
        assert_eq!(summary.unanswered, 6);
        assert_eq!(summary.score, 30);
        assert_eq!(exam.score(), 30);
        assert_eq!(exam.status(), GameStatus::Finished);
    }

    #[test]
    fn test_timeout_forces_finish_with_unanswered_questions() {
        let mut exam = playing(Duration::from_secs(3));
        answer_correctly(&mut exam, [0]);
        assert!(exam.tick(Duration::from_secs(2)).is_empty());
        let events = exam.tick(Duration::from_secs(1));
        assert_eq!(events[0], MockExamEvent::TimeUp);
        assert!(matches!(events[1], MockExamEvent::Finished { .. }));
        assert_eq!(exam.status(), GameStatus::Finished);
        assert_eq!(exam.summary().unwrap().unanswered, 9);
        assert_eq!(exam.score(), 10);
        assert!(exam.tick(Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_review_requires_finish_and_allows_navigation() {
        let mut exam = playing(DEFAULT_EXAM_DURATION);
        assert!(matches!(
            exam.apply(MockExamAction::Review),
            Err(GameError::InvalidInput(_))
        ));
        exam.apply(MockExamAction::GoTo(4)).unwrap();
        exam.apply(MockExamAction::Finish).unwrap();
        assert_eq!(
            exam.apply(MockExamAction::Review).unwrap(),
            vec![MockExamEvent::ReviewStarted]
        );
        assert_eq!(exam.status(), GameStatus::Reviewing);
        assert_eq!(exam.snapshot().current, 0);

        exam.apply(MockExamAction::Next).unwrap();
        let snap = exam.snapshot();
        assert_eq!(snap.current, 1);
        assert_eq!(snap.correct_option, Some(exam.questions()[1].correct));
        assert_eq!(exam.apply(MockExamAction::Finish), Err(GameError::GameOver));
    }

    #[test]
    fn test_all_correct_scores_hundred() {
        let mut exam = playing(DEFAULT_EXAM_DURATION);
        answer_correctly(&mut exam, 0..10);
        exam.apply(MockExamAction::Finish).unwrap();
        assert_eq!(exam.score(), 100);
    }

    #[test]
    fn test_actions_before_reset_are_not_started() {
        let mut exam = MockExam::new();
        assert_eq!(exam.apply(MockExamAction::Next), Err(GameError::NotStarted));
        assert_eq!(exam.apply(MockExamAction::Answer(0)), Err(GameError::NotStarted));
    }
}
