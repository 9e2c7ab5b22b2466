//! Built-in game data.
//!
//! Every game ships with a fixed set of legal-studies content so it can
//! be played offline. Games copy what they need on reset.

use serde::{Deserialize, Serialize};

/// Words drawn by hangman. Uppercase A–Z only.
pub const HANGMAN_WORDS: [&str; 8] = [
    "CONSTITUTION",
    "TRIBUNAL",
    "JUSTICE",
    "ATTORNEY",
    "LAWSUIT",
    "SENTENCE",
    "APPEAL",
    "STATUTE",
];

/// One symbol per memory pair.
pub const MEMORY_SYMBOLS: [&str; 8] = ["⚖️", "📚", "🏛️", "👨‍⚖️", "📋", "🔨", "📜", "🏆"];

/// How hard an exam question is rated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

/// A four-option multiple choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceQuestion {
    pub prompt: &'static str,
    pub options: [&'static str; 4],
    /// Index into `options`.
    pub correct: usize,
    pub explanation: &'static str,
    pub subject: &'static str,
    pub level: Level,
}

pub const QUIZ_QUESTIONS: [ChoiceQuestion; 5] = [
    ChoiceQuestion {
        prompt: "Which principle is a foundation of the 1988 Federal Constitution?",
        options: ["Legality", "Human dignity", "Morality", "Efficiency"],
        correct: 1,
        explanation: "Human dignity is listed among the foundations of the Republic in art. 1, III.",
        subject: "Constitutional Law",
        level: Level::Easy,
    },
    ChoiceQuestion {
        prompt: "How long is the President's term of office?",
        options: ["3 years", "4 years", "5 years", "6 years"],
        correct: 1,
        explanation: "The presidential term is 4 years under art. 82.",
        subject: "Constitutional Law",
        level: Level::Easy,
    },
    ChoiceQuestion {
        prompt: "Which body exercises external control over the Union's accounts?",
        options: [
            "Supreme Federal Court",
            "Federal Court of Accounts",
            "Comptroller General",
            "Federal Public Prosecutor",
        ],
        correct: 1,
        explanation: "External control is assigned to the Federal Court of Accounts by art. 71.",
        subject: "Constitutional Law",
        level: Level::Medium,
    },
    ChoiceQuestion {
        prompt: "What is the minimum age to be elected a Federal Deputy?",
        options: ["18", "21", "25", "30"],
        correct: 1,
        explanation: "Art. 14, §3, VI sets 21 as the minimum age for Federal Deputy.",
        subject: "Constitutional Law",
        level: Level::Medium,
    },
    ChoiceQuestion {
        prompt: "How many Justices sit on the Supreme Federal Court?",
        options: ["9", "11", "13", "15"],
        correct: 1,
        explanation: "The Court is composed of 11 Justices under art. 101.",
        subject: "Constitutional Law",
        level: Level::Easy,
    },
];

pub const EXAM_QUESTIONS: [ChoiceQuestion; 10] = [
    ChoiceQuestion {
        prompt: "What is the time limit to bring an action to set aside a final judgment?",
        options: ["1 year", "2 years", "3 years", "5 years"],
        correct: 1,
        explanation: "Two years, under art. 975 of the Code of Civil Procedure.",
        subject: "Civil Procedure",
        level: Level::Medium,
    },
    ChoiceQuestion {
        prompt: "What quorum approves a constitutional amendment?",
        options: ["Simple majority", "Absolute majority", "3/5 of members", "2/3 of members"],
        correct: 2,
        explanation: "Three fifths of the members of each House, in two rounds.",
        subject: "Constitutional Law",
        level: Level::Hard,
    },
    ChoiceQuestion {
        prompt: "What is the limitation period for crimes with a maximum sentence of 4 years?",
        options: ["4 years", "8 years", "12 years", "16 years"],
        correct: 1,
        explanation: "Eight years, under art. 109, IV of the Penal Code.",
        subject: "Criminal Law",
        level: Level::Medium,
    },
    ChoiceQuestion {
        prompt: "How long does a defendant have to answer a civil complaint?",
        options: ["10 days", "15 days", "20 days", "30 days"],
        correct: 1,
        explanation: "Fifteen business days, under art. 335 of the Code of Civil Procedure.",
        subject: "Civil Procedure",
        level: Level::Easy,
    },
    ChoiceQuestion {
        prompt: "What is the lapse period for assessing a tax credit under the Tax Code?",
        options: ["3 years", "5 years", "10 years", "20 years"],
        correct: 1,
        explanation: "Five years, under art. 173 of the National Tax Code.",
        subject: "Tax Law",
        level: Level::Hard,
    },
    ChoiceQuestion {
        prompt: "What is the minimum age to be appointed a Supreme Court Justice?",
        options: ["30", "35", "40", "45"],
        correct: 1,
        explanation: "Thirty-five, under art. 101.",
        subject: "Constitutional Law",
        level: Level::Easy,
    },
    ChoiceQuestion {
        prompt: "How long after a contract ends can a labor claim be filed?",
        options: ["6 months", "1 year", "2 years", "5 years"],
        correct: 2,
        explanation: "Two years, under art. 7, XXIX.",
        subject: "Labor Law",
        level: Level::Medium,
    },
    ChoiceQuestion {
        prompt: "What cap on real interest rates does the Constitution currently impose?",
        options: ["6% a year", "12% a year", "18% a year", "No specific constitutional cap"],
        correct: 3,
        explanation: "The 12% cap was repealed by Constitutional Amendment 40/2003.",
        subject: "Constitutional Law",
        level: Level::Hard,
    },
    ChoiceQuestion {
        prompt: "What is the time limit to file an appeal?",
        options: ["10 days", "15 days", "20 days", "30 days"],
        correct: 1,
        explanation: "Fifteen business days, under art. 1.003, §5 of the Code of Civil Procedure.",
        subject: "Civil Procedure",
        level: Level::Easy,
    },
    ChoiceQuestion {
        prompt: "What is the maximum sentence for simple homicide under the Penal Code?",
        options: ["15 years", "20 years", "25 years", "30 years"],
        correct: 1,
        explanation: "Six to twenty years, under art. 121.",
        subject: "Criminal Law",
        level: Level::Medium,
    },
];

/// Orientation of a crossword answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Across,
    Down,
}

/// One crossword entry. `row`/`col` is the first letter's cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClueSpec {
    pub number: u8,
    pub direction: Direction,
    pub clue: &'static str,
    pub answer: &'static str,
    pub row: usize,
    pub col: usize,
}

pub const CROSSWORD_CLUES: [ClueSpec; 6] = [
    ClueSpec {
        number: 1,
        direction: Direction::Across,
        clue: "Fundamental law of a country",
        answer: "CONSTITUTION",
        row: 0,
        col: 0,
    },
    ClueSpec {
        number: 1,
        direction: Direction::Down,
        clue: "Place where justice is administered",
        answer: "COURT",
        row: 0,
        col: 0,
    },
    ClueSpec {
        number: 2,
        direction: Direction::Down,
        clue: "Law enacted by a legislature",
        answer: "STATUTE",
        row: 0,
        col: 3,
    },
    ClueSpec {
        number: 3,
        direction: Direction::Down,
        clue: "Formal examination of evidence before a judge",
        answer: "TRIAL",
        row: 0,
        col: 6,
    },
    ClueSpec {
        number: 4,
        direction: Direction::Across,
        clue: "Citizens who deliver a verdict",
        answer: "JURY",
        row: 4,
        col: 2,
    },
    ClueSpec {
        number: 5,
        direction: Direction::Across,
        clue: "Request for a higher court to review a decision",
        answer: "APPEAL",
        row: 6,
        col: 0,
    },
];

/// What landing on a roulette segment does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Award the segment's points times the multiplier.
    Points,
    /// Answer a question: 100 points times the multiplier.
    Question,
    /// The next scoring spin counts double.
    DoubleNext,
    /// The spin is refunded plus one extra.
    SpinAgain,
    /// Flat jackpot, not multiplied.
    Jackpot,
    /// Session score drops to zero.
    LoseAll,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub label: &'static str,
    pub points: u32,
    pub kind: SegmentKind,
}

pub const ROULETTE_SEGMENTS: [Segment; 10] = [
    Segment { label: "100 PTS", points: 100, kind: SegmentKind::Points },
    Segment { label: "QUESTION", points: 0, kind: SegmentKind::Question },
    Segment { label: "50 PTS", points: 50, kind: SegmentKind::Points },
    Segment { label: "BONUS 2X", points: 0, kind: SegmentKind::DoubleNext },
    Segment { label: "200 PTS", points: 200, kind: SegmentKind::Points },
    Segment { label: "SPIN AGAIN", points: 0, kind: SegmentKind::SpinAgain },
    Segment { label: "75 PTS", points: 75, kind: SegmentKind::Points },
    Segment { label: "LOSE ALL", points: 0, kind: SegmentKind::LoseAll },
    Segment { label: "150 PTS", points: 150, kind: SegmentKind::Points },
    Segment { label: "MEGA BONUS", points: 500, kind: SegmentKind::Jackpot },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hangman_words_are_uppercase_letters() {
        for word in HANGMAN_WORDS {
            assert!(word.chars().all(|c| c.is_ascii_uppercase()), "{word}");
        }
    }

    #[test]
    fn test_question_answers_are_in_range() {
        for q in QUIZ_QUESTIONS.iter().chain(EXAM_QUESTIONS.iter()) {
            assert!(q.correct < q.options.len(), "{}", q.prompt);
        }
    }

    #[test]
    fn test_crossword_clues_agree_where_they_cross() {
        let mut cells = std::collections::HashMap::new();
        for clue in &CROSSWORD_CLUES {
            for (i, letter) in clue.answer.chars().enumerate() {
                let cell = match clue.direction {
                    Direction::Across => (clue.row, clue.col + i),
                    Direction::Down => (clue.row + i, clue.col),
                };
                if let Some(existing) = cells.insert(cell, letter) {
                    assert_eq!(existing, letter, "conflict at {cell:?}");
                }
            }
        }
    }
}
