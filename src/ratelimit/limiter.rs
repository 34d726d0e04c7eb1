//! Core rate limiter implementation.

use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::config::RateLimitConfig;
use crate::store::{CounterRecord, WindowedStore};

use super::decision::Decision;

/// Per-client request throttling over a windowed counter store.
///
/// One limiter represents one policy (limit, period, rejection
/// message) and owns one [`WindowedStore`] keyed by client
/// identifier. The limiter is thread-safe: the whole
/// reconcile/read/increment/write sequence runs under a single mutex,
/// so concurrent requests for the same client can never read the same
/// count and both write back count + 1. The critical section is O(1),
/// never blocks on I/O, and always completes.
pub struct RateLimiter {
    /// The policy this limiter enforces.
    config: RateLimitConfig,
    /// Counter records indexed by client identifier.
    store: Mutex<WindowedStore>,
}

impl RateLimiter {
    /// Create a rate limiter enforcing the given policy.
    pub fn new(config: RateLimitConfig) -> Self {
        let store = WindowedStore::new(config.period_ms, now_millis());
        Self {
            config,
            store: Mutex::new(store),
        }
    }

    /// The policy this limiter enforces.
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Evaluate a request from `client_id` against the wall clock.
    pub fn check(&self, client_id: &str) -> Decision {
        self.evaluate(client_id, now_millis())
    }

    /// Evaluate a request from `client_id` at the supplied timestamp.
    ///
    /// The client's counter is incremented unconditionally, even past
    /// the limit, so `remaining` and `reset_seconds` stay accurate for
    /// over-limit clients; only `allowed` gates the caller's response.
    /// An unknown client is first-seen, not an error.
    ///
    /// Timestamps are assumed non-decreasing across calls. A clock set
    /// backward is not detected: a record may then outlive its
    /// intended window or reset early.
    pub fn evaluate(&self, client_id: &str, now_ms: u64) -> Decision {
        trace!(client = client_id, now_ms = now_ms, "Evaluating request");

        let record = {
            let mut store = self.store.lock();

            let mut record = match store.get(client_id, now_ms) {
                Some(record) if !record.is_stale(now_ms) => record,
                _ => {
                    debug!(
                        client = client_id,
                        expiry_ms = now_ms + self.config.period_ms,
                        "Starting new counter window"
                    );
                    CounterRecord::new(now_ms + self.config.period_ms)
                }
            };

            record.count += 1;
            store.set(client_id, record, now_ms);
            record
        };

        let allowed = record.count <= self.config.limit;
        if !allowed {
            debug!(
                client = client_id,
                count = record.count,
                limit = self.config.limit,
                "Rate limit exceeded"
            );
        }

        Decision {
            allowed,
            limit: self.config.limit,
            remaining: self.config.limit.saturating_sub(record.count),
            reset_seconds: record.expiry_ms.saturating_sub(now_ms).div_ceil(1_000),
            message: self.config.message.clone(),
        }
    }

    /// Forget any counter held for `client_id`.
    pub fn forget(&self, client_id: &str) {
        self.store.lock().remove(client_id);
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

/// Milliseconds since the Unix epoch.
fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
