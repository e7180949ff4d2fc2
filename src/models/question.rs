use std::fmt;

use serde::{Deserialize, Serialize};

/// Difficulty bucket a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Prize slots handed out to a batch of this difficulty, by position modulo 5.
    pub fn prize_slots(self) -> [u32; 5] {
        match self {
            Difficulty::Easy => [100, 200, 300, 500, 1_000],
            Difficulty::Medium => [2_000, 4_000, 8_000, 16_000, 32_000],
            Difficulty::Hard => [64_000, 125_000, 250_000, 500_000, 1_000_000],
        }
    }

    pub fn prize_for_position(self, position: usize) -> u32 {
        let slots = self.prize_slots();
        slots[position % slots.len()]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Parse the lowercase wire name used by the trivia API.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canonical multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
    pub options: [String; 4],
    /// Index into `options`.
    pub correct_answer: usize,
    pub category: String,
    pub difficulty: Difficulty,
    /// Prize amount attached to the question.
    pub value: u32,
}

impl Question {
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_answer]
    }

    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_answer
    }
}

/// Questions for one game, sorted ascending by `value`.
pub type QuestionSet = Vec<Question>;

/// Where an acquired question set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionOrigin {
    /// Served from the local expiring cache.
    Cache,
    /// Fetched from the remote trivia API just now.
    Live,
    /// Sampled from the bundled question pool.
    Fallback,
}

impl QuestionOrigin {
    pub fn label(self) -> &'static str {
        match self {
            QuestionOrigin::Cache => "cached",
            QuestionOrigin::Live => "live",
            QuestionOrigin::Fallback => "offline",
        }
    }
}

/// Result of a question acquisition. There is no error variant.
#[derive(Debug, Clone)]
pub struct Acquisition {
    pub questions: QuestionSet,
    pub origin: QuestionOrigin,
}

impl Acquisition {
    pub fn new(questions: QuestionSet, origin: QuestionOrigin) -> Self {
        Self { questions, origin }
    }
}
