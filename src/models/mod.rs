mod question;

pub use question::{Acquisition, Difficulty, Question, QuestionOrigin, QuestionSet};

/// Top-level screen the terminal is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Title screen, nothing acquired yet.
    Welcome,
    /// Waiting for the question provider to resolve.
    Loading,
    /// A game session is running.
    Playing,
    /// The session ended and winnings are shown.
    Finished,
}
