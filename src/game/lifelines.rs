//! Locally simulated lifelines. All of them are pure functions of the
//! question, the options still visible, and the random source.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::models::{Difficulty, Question};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifeline {
    FiftyFifty,
    AskTheAudience,
    PhoneAFriend,
}

impl Lifeline {
    pub const ALL: [Lifeline; 3] = [
        Lifeline::FiftyFifty,
        Lifeline::AskTheAudience,
        Lifeline::PhoneAFriend,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Lifeline::FiftyFifty => "50:50",
            Lifeline::AskTheAudience => "Ask the Audience",
            Lifeline::PhoneAFriend => "Phone a Friend",
        }
    }
}

/// Share of votes per option, in percent. Always sums to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudiencePoll {
    pub votes: [u8; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FriendAdvice {
    pub choice: usize,
    /// How sure the friend sounds, in percent.
    pub confidence: u8,
}

/// Pick the two wrong options to hide, in ascending order.
pub fn fifty_fifty<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> [usize; 2] {
    let mut wrong: Vec<usize> = (0..question.options.len())
        .filter(|&option| option != question.correct_answer)
        .collect();
    wrong.shuffle(rng);

    let mut removed = [wrong[0], wrong[1]];
    removed.sort_unstable();
    removed
}

pub fn ask_the_audience<R: Rng + ?Sized>(
    question: &Question,
    hidden: &[bool; 4],
    rng: &mut R,
) -> AudiencePoll {
    let correct = question.correct_answer;
    let mut votes = [0u8; 4];
    let others = visible_wrong_options(question, hidden);

    if others.is_empty() {
        votes[correct] = 100;
        return AudiencePoll { votes };
    }

    let correct_share: u8 = match question.difficulty {
        Difficulty::Easy => rng.random_range(55..=80),
        Difficulty::Medium => rng.random_range(40..=65),
        Difficulty::Hard => rng.random_range(25..=50),
    };
    votes[correct] = correct_share;

    let remaining = 100 - u32::from(correct_share);
    let weights: Vec<u32> = others.iter().map(|_| rng.random_range(1..=10)).collect();
    let total: u32 = weights.iter().sum();

    let mut handed_out = 0;
    for (&option, &weight) in others.iter().zip(&weights) {
        let share = remaining * weight / total;
        votes[option] = share as u8;
        handed_out += share;
    }
    // Rounding leftovers go to the first wrong option.
    votes[others[0]] += (remaining - handed_out) as u8;

    AudiencePoll { votes }
}

pub fn phone_a_friend<R: Rng + ?Sized>(
    question: &Question,
    hidden: &[bool; 4],
    rng: &mut R,
) -> FriendAdvice {
    let accuracy = match question.difficulty {
        Difficulty::Easy => 0.9,
        Difficulty::Medium => 0.7,
        Difficulty::Hard => 0.5,
    };

    let wrong = visible_wrong_options(question, hidden);
    if !rng.random_bool(accuracy) {
        if let Some(&choice) = wrong.choose(rng) {
            return FriendAdvice {
                choice,
                confidence: rng.random_range(30..=60),
            };
        }
    }

    FriendAdvice {
        choice: question.correct_answer,
        confidence: rng.random_range(60..=95),
    }
}

fn visible_wrong_options(question: &Question, hidden: &[bool; 4]) -> Vec<usize> {
    (0..question.options.len())
        .filter(|&option| option != question.correct_answer && !hidden[option])
        .collect()
}
