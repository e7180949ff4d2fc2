//! Bundled question pool used whenever live questions are unavailable.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::game::GAME_LENGTH;
use crate::models::{Difficulty, Question, QuestionSet};

use super::loader::parse_questions;

const BUILTIN_CORPUS: &str = include_str!("../../assets/fallback_questions.json");

/// Validation and sampling failures of the fallback pool.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to parse the bundled question corpus")]
    Parse(#[source] serde_json::Error),
    #[error("question id {id} appears more than once")]
    DuplicateId { id: u32 },
    #[error("question ids must be positive")]
    InvalidId,
    #[error("question {id} has correct answer index {index}, expected 0..4")]
    InvalidAnswerIndex { id: u32, index: usize },
    #[error("question {id} has empty text")]
    EmptyText { id: u32 },
    #[error("{difficulty} bucket holds {available} questions, a full game needs {required}")]
    BucketTooSmall {
        difficulty: Difficulty,
        available: usize,
        required: usize,
    },
    #[error("requested {requested} {difficulty} questions but only {available} exist")]
    Exhausted {
        difficulty: Difficulty,
        requested: usize,
        available: usize,
    },
}

/// Split a requested amount into `(easy, medium, hard)` counts.
///
/// Easy and medium each get `floor(amount * 0.33)`; hard takes the rest.
pub fn split_by_difficulty(amount: usize) -> (usize, usize, usize) {
    let easy = amount * 33 / 100;
    let medium = amount * 33 / 100;
    (easy, medium, amount - easy - medium)
}

/// Pre-validated corpus partitioned by difficulty.
#[derive(Debug, Clone)]
pub struct FallbackPool {
    easy: Vec<Question>,
    medium: Vec<Question>,
    hard: Vec<Question>,
}

impl FallbackPool {
    /// Build a pool, rejecting corpora that could not serve a full game.
    pub fn new(questions: Vec<Question>) -> Result<Self, PoolError> {
        let mut seen = HashSet::with_capacity(questions.len());
        let mut pool = Self {
            easy: Vec::new(),
            medium: Vec::new(),
            hard: Vec::new(),
        };

        for question in questions {
            if question.id == 0 {
                return Err(PoolError::InvalidId);
            }
            if !seen.insert(question.id) {
                return Err(PoolError::DuplicateId { id: question.id });
            }
            if question.correct_answer >= question.options.len() {
                return Err(PoolError::InvalidAnswerIndex {
                    id: question.id,
                    index: question.correct_answer,
                });
            }
            if question.text.trim().is_empty() {
                return Err(PoolError::EmptyText { id: question.id });
            }
            pool.bucket_mut(question.difficulty).push(question);
        }

        let (easy, medium, hard) = split_by_difficulty(GAME_LENGTH);
        for (difficulty, required) in Difficulty::ALL.into_iter().zip([easy, medium, hard]) {
            let available = pool.count(difficulty);
            if available < required {
                return Err(PoolError::BucketTooSmall {
                    difficulty,
                    available,
                    required,
                });
            }
        }

        Ok(pool)
    }

    /// The corpus compiled into the binary.
    pub fn builtin() -> Result<Self, PoolError> {
        let questions = parse_questions(BUILTIN_CORPUS).map_err(PoolError::Parse)?;
        Self::new(questions)
    }

    pub fn len(&self) -> usize {
        self.easy.len() + self.medium.len() + self.hard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count(&self, difficulty: Difficulty) -> usize {
        self.bucket(difficulty).len()
    }

    /// Draw `amount` distinct questions, sorted ascending by value.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        amount: usize,
        rng: &mut R,
    ) -> Result<QuestionSet, PoolError> {
        let (easy, medium, hard) = split_by_difficulty(amount);
        let mut questions = Vec::with_capacity(amount);

        for (difficulty, requested) in Difficulty::ALL.into_iter().zip([easy, medium, hard]) {
            let bucket = self.bucket(difficulty);
            if requested > bucket.len() {
                return Err(PoolError::Exhausted {
                    difficulty,
                    requested,
                    available: bucket.len(),
                });
            }
            questions.extend(draw(bucket, requested, rng));
        }

        questions.sort_by_key(|question| question.value);
        Ok(questions)
    }

    fn bucket(&self, difficulty: Difficulty) -> &[Question] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    fn bucket_mut(&mut self, difficulty: Difficulty) -> &mut Vec<Question> {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }
}

fn draw<R: Rng + ?Sized>(bucket: &[Question], count: usize, rng: &mut R) -> Vec<Question> {
    let mut indices: Vec<usize> = (0..bucket.len()).collect();
    indices.shuffle(rng);
    indices
        .into_iter()
        .take(count)
        .map(|index| bucket[index].clone())
        .collect()
}
