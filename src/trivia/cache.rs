//! Expiring question cache and outbound request throttle.
//!
//! Both live in the same [`KeyValueStore`] under fixed keys. Every read
//! tolerates missing, corrupt or unreadable values by treating them as
//! absent, and every write failure is logged and swallowed: caching and
//! throttling are best-effort and never fail an acquisition.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::QuestionSet;

use super::clock::Clock;
use super::store::KeyValueStore;

/// Age after which a cached question set is ignored.
pub const CACHE_TTL_MS: u64 = 24 * 60 * 60 * 1000;
/// How long live fetches stay disabled after a rate-limit signal.
pub const COOLDOWN_MS: u64 = 30 * 60 * 1000;
/// Idle gap after which the request counter starts over.
pub const REQUEST_WINDOW_MS: u64 = 5 * 60 * 1000;
pub const MAX_REQUESTS_PER_WINDOW: u32 = 5;

/// Fixed storage keys.
pub mod keys {
    pub const QUESTIONS: &str = "millionaire.cache.questions";
    pub const STORED_AT: &str = "millionaire.cache.stored_at";
    pub const COOLDOWN_UNTIL: &str = "millionaire.throttle.cooldown_until";
    pub const REQUEST_COUNT: &str = "millionaire.throttle.request_count";
    pub const LAST_REQUEST: &str = "millionaire.throttle.last_request";
}

pub struct QuestionCache {
    store: Box<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl QuestionCache {
    pub fn new(store: Box<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// The cached set, unless missing, corrupt or older than [`CACHE_TTL_MS`].
    /// A set with an answer index outside its options counts as corrupt.
    pub fn read_cache(&self) -> Option<QuestionSet> {
        let stored_at = self.read_number(keys::STORED_AT)?;
        let age = self.clock.now_millis().saturating_sub(stored_at);
        if age > CACHE_TTL_MS {
            debug!(age_ms = age, "cached question set expired");
            return None;
        }

        let raw = self.read(keys::QUESTIONS)?;
        match serde_json::from_str::<QuestionSet>(&raw) {
            Ok(questions) => {
                let valid = questions
                    .iter()
                    .all(|question| question.correct_answer < question.options.len());
                if !valid {
                    warn!("cached question set has an out-of-range answer; ignoring it");
                    return None;
                }
                Some(questions)
            }
            Err(err) => {
                warn!(error = %err, "cached question set is corrupt; ignoring it");
                None
            }
        }
    }

    /// Overwrite the cached set and stamp it with the current time.
    pub fn write_cache(&mut self, questions: &QuestionSet) {
        let json = match serde_json::to_string(questions) {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "failed to encode question set for the cache");
                return;
            }
        };

        let now = self.clock.now_millis();
        self.write(keys::QUESTIONS, json);
        self.write(keys::STORED_AT, now.to_string());
    }

    /// Decide whether a live fetch may go out now, consuming a request slot if so.
    pub fn may_fetch(&mut self) -> bool {
        let now = self.clock.now_millis();

        if let Some(cooldown_until) = self.read_number(keys::COOLDOWN_UNTIL) {
            if now < cooldown_until {
                debug!(remaining_ms = cooldown_until - now, "live fetch blocked by cooldown");
                return false;
            }
        }

        let last_request = self.read_number(keys::LAST_REQUEST).unwrap_or(0);
        let mut count = self
            .read_number(keys::REQUEST_COUNT)
            .and_then(|count| u32::try_from(count).ok())
            .unwrap_or(0);

        if now.saturating_sub(last_request) > REQUEST_WINDOW_MS {
            count = 0;
            self.write(keys::REQUEST_COUNT, count.to_string());
        }

        if count >= MAX_REQUESTS_PER_WINDOW {
            debug!(count, "live fetch blocked by request window");
            return false;
        }

        self.write(keys::REQUEST_COUNT, (count + 1).to_string());
        self.write(keys::LAST_REQUEST, now.to_string());
        true
    }

    pub fn enter_cooldown(&mut self) {
        let until = self.clock.now_millis().saturating_add(COOLDOWN_MS);
        self.write(keys::COOLDOWN_UNTIL, until.to_string());
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn KeyValueStore {
        self.store.as_mut()
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "store read failed; treating value as absent");
                None
            }
        }
    }

    fn read_number(&self, key: &str) -> Option<u64> {
        self.read(key)?.trim().parse().ok()
    }

    fn write(&mut self, key: &str, value: String) {
        if let Err(err) = self.store.set(key, value) {
            warn!(key, error = %err, "store write failed; continuing without it");
        }
    }
}
