use std::collections::HashSet;

use rand::Rng;
use thiserror::Error;

use crate::models::{Question, QuestionSet};

use super::ladder::{GAME_LENGTH, guaranteed_prize, prize_at};
use super::lifelines::{
    AudiencePoll, FriendAdvice, Lifeline, ask_the_audience, fifty_fifty, phone_a_friend,
};

/// Moves the session rejects in its current state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("a game needs at least one question")]
    NoQuestions,
    #[error("the game is already over")]
    GameOver,
    #[error("an answer is already locked in")]
    NotSelecting,
    #[error("no answer is waiting for confirmation")]
    NotConfirming,
    #[error("the answer has not been revealed yet")]
    NotRevealed,
    #[error("option {option} does not exist")]
    InvalidOption { option: usize },
    #[error("option {option} was removed by 50:50")]
    OptionHidden { option: usize },
    #[error("{} has already been used", .0.label())]
    LifelineUsed(Lifeline),
}

/// Where the current question stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// Waiting for the player to pick an option.
    Selecting,
    /// "Is that your final answer?"
    Confirming { choice: usize },
    /// The confirmed choice was right; waiting to move on.
    Revealed { choice: usize },
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Wrong { choice: usize, completed: usize },
    WalkedAway { completed: usize },
    Millionaire,
}

impl Outcome {
    pub fn winnings(self) -> u32 {
        match self {
            Outcome::Wrong { completed, .. } => guaranteed_prize(completed),
            Outcome::WalkedAway { completed: 0 } => 0,
            Outcome::WalkedAway { completed } => prize_at(completed - 1),
            Outcome::Millionaire => prize_at(GAME_LENGTH - 1),
        }
    }
}

pub struct GameSession {
    questions: QuestionSet,
    index: usize,
    turn: Turn,
    used: HashSet<Lifeline>,
    hidden: [bool; 4],
    poll: Option<AudiencePoll>,
    advice: Option<FriendAdvice>,
    outcome: Option<Outcome>,
}

impl GameSession {
    pub fn new(questions: QuestionSet) -> Result<Self, GameError> {
        if questions.is_empty() {
            return Err(GameError::NoQuestions);
        }

        Ok(Self {
            questions,
            index: 0,
            turn: Turn::Selecting,
            used: HashSet::new(),
            hidden: [false; 4],
            poll: None,
            advice: None,
            outcome: None,
        })
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.index]
    }

    /// 0-based index of the question being played.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn question_number(&self) -> usize {
        self.index + 1
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Questions answered correctly so far.
    pub fn completed(&self) -> usize {
        match (self.outcome, self.turn) {
            (Some(Outcome::Millionaire), _) => self.questions.len(),
            (Some(Outcome::Wrong { completed, .. }), _)
            | (Some(Outcome::WalkedAway { completed }), _) => completed,
            (None, Turn::Revealed { .. }) => self.index + 1,
            (None, _) => self.index,
        }
    }

    pub fn winnings(&self) -> u32 {
        self.outcome.map(Outcome::winnings).unwrap_or(0)
    }

    pub fn is_hidden(&self, option: usize) -> bool {
        self.hidden.get(option).copied().unwrap_or(true)
    }

    pub fn poll(&self) -> Option<&AudiencePoll> {
        self.poll.as_ref()
    }

    pub fn advice(&self) -> Option<&FriendAdvice> {
        self.advice.as_ref()
    }

    pub fn lifeline_available(&self, lifeline: Lifeline) -> bool {
        !self.used.contains(&lifeline)
    }

    /// Pick an option and ask for confirmation.
    pub fn lock_in(&mut self, choice: usize) -> Result<(), GameError> {
        self.ensure_selecting()?;
        if choice >= self.hidden.len() {
            return Err(GameError::InvalidOption { option: choice });
        }
        if self.hidden[choice] {
            return Err(GameError::OptionHidden { option: choice });
        }

        self.turn = Turn::Confirming { choice };
        Ok(())
    }

    /// Take back a locked-in choice.
    pub fn cancel(&mut self) -> Result<(), GameError> {
        self.ensure_playing()?;
        match self.turn {
            Turn::Confirming { .. } => {
                self.turn = Turn::Selecting;
                Ok(())
            }
            _ => Err(GameError::NotConfirming),
        }
    }

    /// Final answer. Returns whether it was correct; a wrong answer ends the game.
    pub fn confirm(&mut self) -> Result<bool, GameError> {
        self.ensure_playing()?;
        let Turn::Confirming { choice } = self.turn else {
            return Err(GameError::NotConfirming);
        };

        if self.current_question().is_correct(choice) {
            self.turn = Turn::Revealed { choice };
            Ok(true)
        } else {
            self.outcome = Some(Outcome::Wrong {
                choice,
                completed: self.index,
            });
            Ok(false)
        }
    }

    /// Move past a correctly answered question, winning on the last one.
    pub fn advance(&mut self) -> Result<(), GameError> {
        self.ensure_playing()?;
        if !matches!(self.turn, Turn::Revealed { .. }) {
            return Err(GameError::NotRevealed);
        }

        if self.index + 1 >= self.questions.len() {
            self.outcome = Some(Outcome::Millionaire);
            return Ok(());
        }

        self.index += 1;
        self.turn = Turn::Selecting;
        self.hidden = [false; 4];
        self.poll = None;
        self.advice = None;
        Ok(())
    }

    /// Leave with the prize of the last completed question.
    pub fn walk_away(&mut self) -> Result<Outcome, GameError> {
        self.ensure_selecting()?;
        let outcome = Outcome::WalkedAway {
            completed: self.index,
        };
        self.outcome = Some(outcome);
        Ok(outcome)
    }

    pub fn use_fifty_fifty<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<[usize; 2], GameError> {
        self.claim(Lifeline::FiftyFifty)?;
        let removed = fifty_fifty(self.current_question(), rng);
        for option in removed {
            self.hidden[option] = true;
        }
        // Votes an earlier poll gave to removed options move to the correct one.
        let correct = self.current_question().correct_answer;
        if let Some(poll) = self.poll.as_mut() {
            for option in removed {
                poll.votes[correct] += poll.votes[option];
                poll.votes[option] = 0;
            }
        }
        Ok(removed)
    }

    pub fn ask_the_audience<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<AudiencePoll, GameError> {
        self.claim(Lifeline::AskTheAudience)?;
        let poll = ask_the_audience(self.current_question(), &self.hidden, rng);
        self.poll = Some(poll);
        Ok(poll)
    }

    pub fn phone_a_friend<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<FriendAdvice, GameError> {
        self.claim(Lifeline::PhoneAFriend)?;
        let advice = phone_a_friend(self.current_question(), &self.hidden, rng);
        self.advice = Some(advice);
        Ok(advice)
    }

    fn claim(&mut self, lifeline: Lifeline) -> Result<(), GameError> {
        self.ensure_selecting()?;
        if !self.used.insert(lifeline) {
            return Err(GameError::LifelineUsed(lifeline));
        }
        Ok(())
    }

    fn ensure_playing(&self) -> Result<(), GameError> {
        if self.is_finished() {
            Err(GameError::GameOver)
        } else {
            Ok(())
        }
    }

    fn ensure_selecting(&self) -> Result<(), GameError> {
        self.ensure_playing()?;
        match self.turn {
            Turn::Selecting => Ok(()),
            _ => Err(GameError::NotSelecting),
        }
    }
}
