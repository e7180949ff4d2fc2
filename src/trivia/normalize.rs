use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::models::{Difficulty, Question};

use super::error::AcquireError;

const INCORRECT_ANSWERS: usize = 3;

/// One record as delivered by the trivia API. Text fields may carry HTML entities.
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuestion {
    pub category: String,
    pub difficulty: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

/// Turn a raw record into a canonical question.
///
/// `position` is the record's index within its difficulty batch and picks the
/// prize slot; `id` is assigned verbatim. The four options are shuffled with
/// `rng`, and `correct_answer` points at the first option equal to the decoded
/// correct answer.
pub fn normalize<R: Rng + ?Sized>(
    raw: &RawQuestion,
    position: usize,
    id: u32,
    rng: &mut R,
) -> Result<Question, AcquireError> {
    if raw.incorrect_answers.len() != INCORRECT_ANSWERS {
        return Err(AcquireError::invalid_record(format!(
            "expected {} incorrect answers, found {}",
            INCORRECT_ANSWERS,
            raw.incorrect_answers.len()
        )));
    }

    let correct = decode(&raw.correct_answer);
    if correct.is_empty() {
        return Err(AcquireError::invalid_record("correct answer is empty"));
    }

    let text = decode(&raw.question);
    if text.is_empty() {
        return Err(AcquireError::invalid_record("question text is empty"));
    }

    let difficulty = Difficulty::parse(&raw.difficulty).ok_or_else(|| {
        AcquireError::invalid_record(format!("unknown difficulty `{}`", raw.difficulty))
    })?;

    let mut options = [
        correct.clone(),
        decode(&raw.incorrect_answers[0]),
        decode(&raw.incorrect_answers[1]),
        decode(&raw.incorrect_answers[2]),
    ];
    options.shuffle(rng);

    let correct_answer = options
        .iter()
        .position(|option| *option == correct)
        .ok_or_else(|| AcquireError::invalid_record("correct answer lost while shuffling"))?;

    Ok(Question {
        id,
        text,
        options,
        correct_answer,
        category: decode(&raw.category),
        difficulty,
        value: difficulty.prize_for_position(position),
    })
}

fn decode(text: &str) -> String {
    html_escape::decode_html_entities(text).trim().to_string()
}
