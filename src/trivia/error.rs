use std::error::Error;

use thiserror::Error;

use crate::models::Difficulty;

/// Failures of a single live acquisition attempt.
///
/// None of these reach the caller of
/// [`QuestionProvider::acquire`](super::QuestionProvider::acquire); each one
/// degrades to the fallback pool.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// A raw record could not be turned into a question.
    #[error("invalid trivia record: {reason}")]
    InvalidRecord { reason: String },
    /// The remote API asked us to slow down.
    #[error("trivia API rate limit reached")]
    RateLimited,
    /// The request never produced a response.
    #[error("network failure: {message}")]
    NetworkFailure {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    #[error("trivia API request timed out")]
    Timeout,
    /// Non-success HTTP status other than 429.
    #[error("trivia API answered with HTTP status {status}")]
    HttpStatus { status: u16 },
    /// Non-zero `response_code` in the response body.
    #[error("trivia API answered with response code {code}")]
    ResponseCode { code: u8 },
    #[error("expected {expected} {difficulty} questions, received {actual}")]
    BatchSize {
        difficulty: Difficulty,
        expected: usize,
        actual: usize,
    },
    #[error("failed to decode trivia API response")]
    Decode(#[source] serde_json::Error),
}

impl AcquireError {
    pub fn invalid_record(reason: impl Into<String>) -> Self {
        AcquireError::InvalidRecord {
            reason: reason.into(),
        }
    }

    pub fn network(message: impl Into<String>, source: impl Error + Send + Sync + 'static) -> Self {
        AcquireError::NetworkFailure {
            message: message.into(),
            source: Box::new(source),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AcquireError::RateLimited)
    }
}
