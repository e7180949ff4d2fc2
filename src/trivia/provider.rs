use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join3;
use rand::Rng;
use rand::rngs::StdRng;
use tracing::{error, info, warn};

use crate::data::FallbackPool;
use crate::models::{Acquisition, Difficulty, QuestionOrigin, QuestionSet};

use super::cache::QuestionCache;
use super::error::AcquireError;
use super::normalize::normalize;
use super::source::{RATE_LIMIT_RESPONSE_CODE, RawBatch, TriviaSource};

/// Bounds of the random pause taken before each live fetch.
pub const DEFAULT_PREFETCH_JITTER: (Duration, Duration) =
    (Duration::from_millis(100), Duration::from_millis(700));

/// Single entry point the game uses to obtain questions.
///
/// The order is fixed: cache, then throttle, then a live fetch, with the
/// fallback pool behind every failure. [`acquire`](Self::acquire) therefore
/// always produces a playable set.
pub struct QuestionProvider {
    cache: QuestionCache,
    source: Box<dyn TriviaSource>,
    pool: Arc<FallbackPool>,
    rng: StdRng,
    jitter: (Duration, Duration),
}

impl QuestionProvider {
    pub fn new(
        cache: QuestionCache,
        source: Box<dyn TriviaSource>,
        pool: Arc<FallbackPool>,
        rng: StdRng,
    ) -> Self {
        Self {
            cache,
            source,
            pool,
            rng,
            jitter: DEFAULT_PREFETCH_JITTER,
        }
    }

    pub fn with_prefetch_jitter(mut self, min: Duration, max: Duration) -> Self {
        self.jitter = if min <= max { (min, max) } else { (max, min) };
        self
    }

    pub fn cache(&self) -> &QuestionCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut QuestionCache {
        &mut self.cache
    }

    pub fn pool(&self) -> &Arc<FallbackPool> {
        &self.pool
    }

    /// Acquire `amount` questions sorted ascending by value. Never fails.
    pub async fn acquire(&mut self, amount: usize) -> Acquisition {
        if let Some(questions) = self.cache.read_cache() {
            info!(count = questions.len(), "serving cached question set");
            return Acquisition::new(questions, QuestionOrigin::Cache);
        }

        if !self.cache.may_fetch() {
            info!("live fetch throttled; sampling fallback pool");
            return self.fallback(amount);
        }

        match self.fetch_live(amount).await {
            Ok(questions) => {
                info!(count = questions.len(), "fetched live question set");
                self.cache.write_cache(&questions);
                Acquisition::new(questions, QuestionOrigin::Live)
            }
            Err(err) if err.is_rate_limited() => {
                warn!("trivia API rate limited; cooling down and sampling fallback pool");
                self.cache.enter_cooldown();
                self.fallback(amount)
            }
            Err(err) => {
                warn!(error = %err, "live fetch failed; sampling fallback pool");
                self.fallback(amount)
            }
        }
    }

    async fn fetch_live(&mut self, amount: usize) -> Result<QuestionSet, AcquireError> {
        let delay = self.prefetch_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let [easy, medium, hard] = live_batch_sizes(amount);
        let source = self.source.as_ref();
        let (easy_batch, medium_batch, hard_batch) = join3(
            source.fetch_batch(Difficulty::Easy, easy),
            source.fetch_batch(Difficulty::Medium, medium),
            source.fetch_batch(Difficulty::Hard, hard),
        )
        .await;

        let batches = [
            (Difficulty::Easy, easy, easy_batch),
            (Difficulty::Medium, medium, medium_batch),
            (Difficulty::Hard, hard, hard_batch),
        ];

        // A rate limit anywhere wins over every other failure.
        if batches.iter().any(|(_, _, batch)| is_rate_limited(batch)) {
            return Err(AcquireError::RateLimited);
        }

        let mut questions = Vec::with_capacity(amount);
        let mut next_id = 1;
        for (difficulty, expected, batch) in batches {
            let batch = batch?;
            if batch.response_code != 0 {
                return Err(AcquireError::ResponseCode {
                    code: batch.response_code,
                });
            }
            if batch.results.len() != expected {
                return Err(AcquireError::BatchSize {
                    difficulty,
                    expected,
                    actual: batch.results.len(),
                });
            }

            for (position, raw) in batch.results.iter().enumerate() {
                questions.push(normalize(raw, position, next_id, &mut self.rng)?);
                next_id += 1;
            }
        }

        questions.sort_by_key(|question| question.value);
        Ok(questions)
    }

    fn fallback(&mut self, amount: usize) -> Acquisition {
        let questions = match self.pool.sample(amount, &mut self.rng) {
            Ok(questions) => questions,
            Err(err) => {
                error!(error = %err, amount, "fallback pool cannot serve the request");
                Vec::new()
            }
        };
        Acquisition::new(questions, QuestionOrigin::Fallback)
    }

    fn prefetch_delay(&mut self) -> Duration {
        let (min, max) = self.jitter;
        if max <= min {
            return min;
        }
        let millis = self
            .rng
            .random_range(min.as_millis() as u64..=max.as_millis() as u64);
        Duration::from_millis(millis)
    }
}

/// Per-difficulty batch sizes for a live fetch: thirds, remainder to hard.
fn live_batch_sizes(amount: usize) -> [usize; 3] {
    let third = amount / 3;
    [third, third, amount - 2 * third]
}

fn is_rate_limited(batch: &Result<RawBatch, AcquireError>) -> bool {
    match batch {
        Ok(batch) => batch.response_code == RATE_LIMIT_RESPONSE_CODE,
        Err(err) => err.is_rate_limited(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures_util::future::BoxFuture;
    use rand::SeedableRng;

    use super::*;
    use crate::game::{GAME_LENGTH, LADDER};
    use crate::trivia::cache::keys;
    use crate::trivia::clock::ManualClock;
    use crate::trivia::normalize::RawQuestion;
    use crate::trivia::store::MemoryStore;
    use crate::trivia::test_server;

    const START: u64 = 1_700_000_000_000;

    type Responder = Box<dyn Fn(Difficulty, usize) -> Result<RawBatch, AcquireError> + Send + Sync>;

    struct ScriptedSource {
        calls: Arc<AtomicUsize>,
        respond: Responder,
    }

    impl TriviaSource for ScriptedSource {
        fn fetch_batch(
            &self,
            difficulty: Difficulty,
            amount: usize,
        ) -> BoxFuture<'_, Result<RawBatch, AcquireError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = (self.respond)(difficulty, amount);
            Box::pin(async move { result })
        }
    }

    fn raw_question(difficulty: Difficulty, index: usize) -> RawQuestion {
        RawQuestion {
            category: "Entertainment: Video Games".to_string(),
            difficulty: difficulty.as_str().to_string(),
            kind: "multiple".to_string(),
            question: format!("{} question #{} &amp; more", difficulty, index),
            correct_answer: format!("Right {}", index),
            incorrect_answers: vec![
                "Wrong &quot;A&quot;".to_string(),
                "Wrong B".to_string(),
                "Wrong C".to_string(),
            ],
        }
    }

    fn good_batch(difficulty: Difficulty, amount: usize) -> Result<RawBatch, AcquireError> {
        Ok(RawBatch {
            response_code: 0,
            results: (0..amount).map(|i| raw_question(difficulty, i)).collect(),
        })
    }

    fn provider_with(respond: Responder) -> (QuestionProvider, ManualClock, Arc<AtomicUsize>) {
        let clock = ManualClock::new(START);
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = QuestionCache::new(Box::new(MemoryStore::new()), Arc::new(clock.clone()));
        let source = ScriptedSource {
            calls: Arc::clone(&calls),
            respond,
        };
        let pool = Arc::new(FallbackPool::builtin().unwrap());
        let provider = QuestionProvider::new(cache, Box::new(source), pool, StdRng::seed_from_u64(5))
            .with_prefetch_jitter(Duration::ZERO, Duration::ZERO);
        (provider, clock, calls)
    }

    fn assert_fallback_set(acquisition: &Acquisition) {
        assert_eq!(acquisition.origin, QuestionOrigin::Fallback);
        assert_eq!(acquisition.questions.len(), GAME_LENGTH);
        assert!(
            acquisition
                .questions
                .windows(2)
                .all(|pair| pair[0].value <= pair[1].value)
        );
        let ids: HashSet<u32> = acquisition.questions.iter().map(|q| q.id).collect();
        assert_eq!(ids.len(), GAME_LENGTH);
    }

    #[tokio::test]
    async fn test_live_fetch_is_normalized_sorted_and_cached() {
        let (mut provider, _clock, calls) = provider_with(Box::new(good_batch));

        let acquisition = provider.acquire(GAME_LENGTH).await;

        assert_eq!(acquisition.origin, QuestionOrigin::Live);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let values: Vec<u32> = acquisition.questions.iter().map(|q| q.value).collect();
        assert_eq!(values, LADDER.to_vec());

        for question in &acquisition.questions {
            assert!(question.correct_option().starts_with("Right "));
            assert!(question.text.contains(" & more"));
            assert!(question.options.iter().any(|o| o == "Wrong \"A\""));
        }

        let ids: HashSet<u32> = acquisition.questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, (1..=15).collect());

        assert_eq!(provider.cache().read_cache(), Some(acquisition.questions));
    }

    #[tokio::test]
    async fn test_rate_limit_enters_cooldown() {
        let (mut provider, clock, _calls) = provider_with(Box::new(|difficulty: Difficulty, amount: usize| {
            if difficulty == Difficulty::Medium {
                Err(AcquireError::RateLimited)
            } else {
                good_batch(difficulty, amount)
            }
        }));

        let acquisition = provider.acquire(GAME_LENGTH).await;
        assert_fallback_set(&acquisition);
        assert!(provider.cache().read_cache().is_none());

        clock.advance(Duration::from_secs(29 * 60));
        assert!(!provider.cache_mut().may_fetch());

        clock.advance(Duration::from_secs(2 * 60));
        assert!(provider.cache_mut().may_fetch());
    }

    #[tokio::test]
    async fn test_http_429_enters_cooldown_and_falls_back() {
        let server = test_server::serve("429 Too Many Requests", "").await;
        let clock = ManualClock::new(START);
        let cache = QuestionCache::new(Box::new(MemoryStore::new()), Arc::new(clock.clone()));
        let pool = Arc::new(FallbackPool::builtin().unwrap());
        let mut provider = QuestionProvider::new(
            cache,
            Box::new(server.source(Duration::from_secs(5))),
            pool,
            StdRng::seed_from_u64(8),
        )
        .with_prefetch_jitter(Duration::ZERO, Duration::ZERO);

        assert_fallback_set(&provider.acquire(GAME_LENGTH).await);
        assert_eq!(server.request_lines().len(), 3);
        assert!(provider.cache().read_cache().is_none());

        clock.advance(Duration::from_secs(29 * 60));
        assert!(!provider.cache_mut().may_fetch());
    }

    #[tokio::test]
    async fn test_rate_limit_response_code_enters_cooldown() {
        let (mut provider, _clock, _calls) = provider_with(Box::new(|difficulty: Difficulty, amount: usize| {
            if difficulty == Difficulty::Hard {
                Ok(RawBatch {
                    response_code: RATE_LIMIT_RESPONSE_CODE,
                    results: Vec::new(),
                })
            } else {
                good_batch(difficulty, amount)
            }
        }));

        assert_fallback_set(&provider.acquire(GAME_LENGTH).await);
        assert!(provider.cache().store().get(keys::COOLDOWN_UNTIL).unwrap().is_some());
        assert!(!provider.cache_mut().may_fetch());
    }

    #[tokio::test]
    async fn test_rate_limit_wins_over_other_failures() {
        let (mut provider, _clock, _calls) = provider_with(Box::new(|difficulty: Difficulty, amount: usize| {
            match difficulty {
                Difficulty::Easy => Err(AcquireError::Timeout),
                Difficulty::Medium => good_batch(difficulty, amount),
                Difficulty::Hard => Err(AcquireError::RateLimited),
            }
        }));

        assert_fallback_set(&provider.acquire(GAME_LENGTH).await);
        assert!(!provider.cache_mut().may_fetch());
    }

    #[tokio::test]
    async fn test_fresh_cache_is_served_without_network() {
        let (mut provider, clock, calls) = provider_with(Box::new(good_batch));
        let cached = provider
            .pool()
            .sample(GAME_LENGTH, &mut StdRng::seed_from_u64(1))
            .unwrap();
        provider.cache_mut().write_cache(&cached);

        clock.advance(Duration::from_secs(60 * 60));
        let acquisition = provider.acquire(GAME_LENGTH).await;

        assert_eq!(acquisition.origin, QuestionOrigin::Cache);
        assert_eq!(acquisition.questions, cached);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(provider.cache().store().get(keys::REQUEST_COUNT).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_cache_goes_live() {
        let (mut provider, clock, calls) = provider_with(Box::new(good_batch));
        let stale = provider
            .pool()
            .sample(GAME_LENGTH, &mut StdRng::seed_from_u64(1))
            .unwrap();
        provider.cache_mut().write_cache(&stale);

        clock.advance(Duration::from_secs(25 * 60 * 60));
        let acquisition = provider.acquire(GAME_LENGTH).await;

        assert_eq!(acquisition.origin, QuestionOrigin::Live);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(provider.cache().read_cache(), Some(acquisition.questions));
    }

    #[tokio::test]
    async fn test_throttled_provider_skips_network() {
        let (mut provider, _clock, calls) = provider_with(Box::new(good_batch));
        for _ in 0..5 {
            assert!(provider.cache_mut().may_fetch());
        }

        assert_fallback_set(&provider.acquire(GAME_LENGTH).await);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_bad_response_code_falls_back_without_cooldown() {
        let (mut provider, _clock, _calls) = provider_with(Box::new(|difficulty: Difficulty, amount: usize| {
            if difficulty == Difficulty::Easy {
                Ok(RawBatch {
                    response_code: 1,
                    results: Vec::new(),
                })
            } else {
                good_batch(difficulty, amount)
            }
        }));

        assert_fallback_set(&provider.acquire(GAME_LENGTH).await);
        assert!(provider.cache().store().get(keys::COOLDOWN_UNTIL).unwrap().is_none());
        assert!(provider.cache_mut().may_fetch());
    }

    #[tokio::test]
    async fn test_short_batch_falls_back() {
        let (mut provider, _clock, _calls) = provider_with(Box::new(|difficulty: Difficulty, amount: usize| {
            let amount = if difficulty == Difficulty::Medium {
                amount - 1
            } else {
                amount
            };
            good_batch(difficulty, amount)
        }));

        assert_fallback_set(&provider.acquire(GAME_LENGTH).await);
        assert!(provider.cache().read_cache().is_none());
    }

    #[tokio::test]
    async fn test_invalid_record_abandons_whole_attempt() {
        let (mut provider, _clock, _calls) = provider_with(Box::new(|difficulty: Difficulty, amount: usize| {
            let mut batch = good_batch(difficulty, amount)?;
            if difficulty == Difficulty::Hard {
                batch.results[4].incorrect_answers.pop();
            }
            Ok(batch)
        }));

        let acquisition = provider.acquire(GAME_LENGTH).await;
        assert_fallback_set(&acquisition);
        assert!(provider.cache().read_cache().is_none());
    }

    #[tokio::test]
    async fn test_network_failure_falls_back_without_cooldown() {
        let (mut provider, _clock, _calls) = provider_with(Box::new(|_: Difficulty, _: usize| {
            Err(AcquireError::network(
                "connection refused",
                std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
            ))
        }));

        assert_fallback_set(&provider.acquire(GAME_LENGTH).await);
        assert!(provider.cache().store().get(keys::COOLDOWN_UNTIL).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_oversized_request_yields_empty_fallback() {
        let (mut provider, _clock, _calls) = provider_with(Box::new(good_batch));
        for _ in 0..5 {
            provider.cache_mut().may_fetch();
        }

        let acquisition = provider.acquire(300).await;
        assert_eq!(acquisition.origin, QuestionOrigin::Fallback);
        assert!(acquisition.questions.is_empty());
    }

    #[tokio::test]
    async fn test_prefetch_delay_stays_in_bounds() {
        let (provider, _clock, _calls) = provider_with(Box::new(good_batch));
        let mut provider = provider
            .with_prefetch_jitter(Duration::from_millis(700), Duration::from_millis(100));

        for _ in 0..100 {
            let delay = provider.prefetch_delay();
            assert!(delay >= Duration::from_millis(100));
            assert!(delay <= Duration::from_millis(700));
        }
    }

    #[test]
    fn test_live_batch_sizes() {
        assert_eq!(live_batch_sizes(15), [5, 5, 5]);
        assert_eq!(live_batch_sizes(10), [3, 3, 4]);
    }
}
