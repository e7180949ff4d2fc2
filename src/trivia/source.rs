//! Remote trivia API access.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::models::Difficulty;

use super::error::AcquireError;
use super::normalize::RawQuestion;

pub const DEFAULT_API_URL: &str = "https://opentdb.com/api.php";
/// Body-level `response_code` the API uses for "too many requests".
pub const RATE_LIMIT_RESPONSE_CODE: u8 = 5;

/// Body of a trivia API response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBatch {
    pub response_code: u8,
    #[serde(default)]
    pub results: Vec<RawQuestion>,
}

/// Anything able to deliver a batch of raw multiple-choice questions.
pub trait TriviaSource: Send + Sync {
    fn fetch_batch(
        &self,
        difficulty: Difficulty,
        amount: usize,
    ) -> BoxFuture<'_, Result<RawBatch, AcquireError>>;
}

/// [`TriviaSource`] talking to an Open Trivia DB compatible endpoint.
#[derive(Clone)]
pub struct HttpTriviaSource {
    client: Client,
    api_url: Arc<str>,
}

impl HttpTriviaSource {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, AcquireError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| AcquireError::network("failed to build HTTP client", source))?;

        Ok(Self::with_client(client, api_url))
    }

    /// Use a preconfigured client. Its timeout applies to every batch.
    pub fn with_client(client: Client, api_url: &str) -> Self {
        Self {
            client,
            api_url: Arc::from(api_url),
        }
    }

    async fn request(&self, difficulty: Difficulty, amount: usize) -> Result<RawBatch, AcquireError> {
        debug!(%difficulty, amount, url = %self.api_url, "requesting trivia batch");

        let response = self
            .client
            .get(self.api_url.as_ref())
            .query(&[
                ("amount", amount.to_string()),
                ("difficulty", difficulty.as_str().to_string()),
                ("type", "multiple".to_string()),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => return Err(AcquireError::RateLimited),
            status if !status.is_success() => {
                return Err(AcquireError::HttpStatus {
                    status: status.as_u16(),
                });
            }
            _ => {}
        }

        let body = response.bytes().await.map_err(map_transport_error)?;
        serde_json::from_slice(&body).map_err(AcquireError::Decode)
    }
}

impl TriviaSource for HttpTriviaSource {
    fn fetch_batch(
        &self,
        difficulty: Difficulty,
        amount: usize,
    ) -> BoxFuture<'_, Result<RawBatch, AcquireError>> {
        Box::pin(self.request(difficulty, amount))
    }
}

fn map_transport_error(err: reqwest::Error) -> AcquireError {
    if err.is_timeout() {
        AcquireError::Timeout
    } else {
        AcquireError::network("trivia API request failed", err)
    }
}

/// Source that never reaches the network, for playing offline.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSource;

impl TriviaSource for OfflineSource {
    fn fetch_batch(
        &self,
        _difficulty: Difficulty,
        _amount: usize,
    ) -> BoxFuture<'_, Result<RawBatch, AcquireError>> {
        Box::pin(async {
            Err(AcquireError::network(
                "offline mode",
                io::Error::new(io::ErrorKind::NotConnected, "live questions disabled"),
            ))
        })
    }
}
