//! Question acquisition pipeline.
//!
//! Cache lookup, request throttling, live fetching from the trivia API,
//! normalization and fallback sampling, combined behind
//! [`QuestionProvider::acquire`].

mod cache;
mod clock;
mod error;
mod normalize;
mod provider;
mod source;
mod store;
#[cfg(test)]
mod test_server;

pub use cache::{
    CACHE_TTL_MS, COOLDOWN_MS, MAX_REQUESTS_PER_WINDOW, QuestionCache, REQUEST_WINDOW_MS, keys,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::AcquireError;
pub use normalize::{RawQuestion, normalize};
pub use provider::{DEFAULT_PREFETCH_JITTER, QuestionProvider};
pub use source::{
    DEFAULT_API_URL, HttpTriviaSource, OfflineSource, RATE_LIMIT_RESPONSE_CODE, RawBatch,
    TriviaSource,
};
pub use store::{FileStore, KeyValueStore, MemoryStore, StorageError};
