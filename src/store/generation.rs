//! Fixed-expiry generation buckets and the counter records they hold.

use std::collections::HashMap;

/// A per-client request counter with its own expiry.
///
/// The record's expiry is independent of the expiry of the generation
/// holding it: the generation bounds how long the record can be
/// stored, while the record's own expiry anchors the client's window
/// to that client's first request in the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterRecord {
    /// Number of requests attributed to the client in this window.
    pub count: u64,
    /// When this record becomes stale, in milliseconds since the epoch.
    pub expiry_ms: u64,
}

impl CounterRecord {
    /// Create a fresh record with a zero count.
    pub fn new(expiry_ms: u64) -> Self {
        Self {
            count: 0,
            expiry_ms,
        }
    }

    /// Whether this record should be treated as stale at `now_ms`.
    ///
    /// A record is valid strictly before its expiry; at the expiry
    /// instant it is already stale.
    pub fn is_stale(&self, now_ms: u64) -> bool {
        self.expiry_ms <= now_ms
    }
}

/// A bucket of key/record pairs covering one fixed time span.
///
/// The expiry is set at construction and never changes; the contents
/// are freely mutable. All operations are total.
#[derive(Debug)]
pub struct Generation {
    expiry_ms: u64,
    contents: HashMap<String, CounterRecord>,
}

impl Generation {
    /// Create an empty generation expiring at `expiry_ms`.
    pub fn new(expiry_ms: u64) -> Self {
        Self {
            expiry_ms,
            contents: HashMap::new(),
        }
    }

    /// The instant after which this generation is stale.
    pub fn expiry_ms(&self) -> u64 {
        self.expiry_ms
    }

    /// Whether this generation has expired at `now_ms`.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expiry_ms
    }

    /// Whether a record exists for `key`.
    pub fn has(&self, key: &str) -> bool {
        self.contents.contains_key(key)
    }

    /// Get a copy of the record for `key`, if present.
    pub fn get(&self, key: &str) -> Option<CounterRecord> {
        self.contents.get(key).copied()
    }

    /// Insert or replace the record for `key`.
    pub fn set(&mut self, key: &str, record: CounterRecord) {
        self.contents.insert(key.to_string(), record);
    }

    /// Remove the record for `key`, if present.
    pub fn remove(&mut self, key: &str) {
        self.contents.remove(key);
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Whether the generation holds no records.
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_staleness_boundary() {
        let record = CounterRecord::new(1_000);

        assert!(!record.is_stale(999));
        assert!(record.is_stale(1_000));
        assert!(record.is_stale(1_001));
    }

    #[test]
    fn test_generation_expiry_boundary() {
        let generation = Generation::new(5_000);

        assert!(!generation.is_expired(4_999));
        assert!(generation.is_expired(5_000));
        assert!(generation.is_expired(5_001));
    }

    #[test]
    fn test_generation_set_get_remove() {
        let mut generation = Generation::new(5_000);
        let record = CounterRecord {
            count: 3,
            expiry_ms: 4_000,
        };

        assert!(!generation.has("client"));
        assert_eq!(generation.get("client"), None);

        generation.set("client", record);
        assert!(generation.has("client"));
        assert_eq!(generation.get("client"), Some(record));
        assert_eq!(generation.len(), 1);

        generation.remove("client");
        assert!(!generation.has("client"));
        assert!(generation.is_empty());
    }

    #[test]
    fn test_generation_set_replaces() {
        let mut generation = Generation::new(5_000);

        generation.set("client", CounterRecord::new(4_000));
        generation.set(
            "client",
            CounterRecord {
                count: 7,
                expiry_ms: 4_000,
            },
        );

        assert_eq!(generation.len(), 1);
        assert_eq!(generation.get("client").unwrap().count, 7);
    }
}
