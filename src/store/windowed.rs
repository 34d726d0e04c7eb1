//! Two-generation windowed store with lazy expiry.

use std::mem;

use tracing::debug;

use super::generation::{CounterRecord, Generation};

/// A self-cleaning key/value store built from two overlapping
/// generations.
///
/// The store owns exactly two [`Generation`]s at all times: `current`
/// (earlier expiry) and `next` (expiring one lifespan later). Instead
/// of running a cleanup job, the store reconciles expiry lazily at the
/// top of every `has`/`get`/`set`: when only `current` has expired it
/// rolls over (promoting `next` and allocating a fresh `next`), and
/// when both have expired it resets wholesale. At most one rotation
/// happens per call, so cleanup is amortized O(1).
///
/// Holding two overlapping generations avoids a sharp boundary where
/// every key's record vanishes at the same wall-clock tick: a record
/// is written into whichever generation covers the record's own
/// expiry, so each key's window stays anchored to that key's first
/// write.
#[derive(Debug)]
pub struct WindowedStore {
    /// Duration covered by each generation, in milliseconds.
    lifespan_ms: u64,
    /// Generation with the earlier expiry.
    current: Generation,
    /// Generation expiring one lifespan after `current`.
    next: Generation,
}

impl WindowedStore {
    /// Create a store whose generations each cover `lifespan_ms`.
    ///
    /// `current` expires one lifespan from `now_ms`, `next` one
    /// lifespan after that.
    pub fn new(lifespan_ms: u64, now_ms: u64) -> Self {
        let current_expiry = now_ms + lifespan_ms;
        Self {
            lifespan_ms,
            current: Generation::new(current_expiry),
            next: Generation::new(current_expiry + lifespan_ms),
        }
    }

    /// Duration covered by each generation, in milliseconds.
    pub fn lifespan_ms(&self) -> u64 {
        self.lifespan_ms
    }

    /// Whether a record exists for `key` in either generation.
    pub fn has(&mut self, key: &str, now_ms: u64) -> bool {
        self.reconcile(now_ms);
        self.next.has(key) || self.current.has(key)
    }

    /// Get a copy of the record for `key`, if present.
    ///
    /// `next` takes precedence: a record freshly promoted into `next`
    /// must shadow a stale copy still sitting in `current`.
    pub fn get(&mut self, key: &str, now_ms: u64) -> Option<CounterRecord> {
        self.reconcile(now_ms);
        self.next.get(key).or_else(|| self.current.get(key))
    }

    /// Insert or replace the record for `key`.
    ///
    /// The destination generation is the one that covers the record's
    /// own expiry: `current` if the record expires before `current`
    /// does, `next` otherwise. When the destination downgrades to
    /// `current`, any copy in `next` is deleted first so lookups
    /// (which prefer `next`) cannot resurrect the stale value.
    pub fn set(&mut self, key: &str, record: CounterRecord, now_ms: u64) {
        self.reconcile(now_ms);
        if record.expiry_ms < self.current.expiry_ms() {
            if self.next.has(key) {
                self.next.remove(key);
            }
            self.current.set(key, record);
        } else {
            self.next.set(key, record);
        }
    }

    /// Remove the record for `key` from both generations.
    pub fn remove(&mut self, key: &str) {
        self.current.remove(key);
        self.next.remove(key);
    }

    /// Rotate or reset the generations if they have expired.
    ///
    /// Called at the top of every read or write, making cleanup a pure
    /// side effect of access.
    fn reconcile(&mut self, now_ms: u64) {
        if !self.current.is_expired(now_ms) {
            return;
        }
        if self.next.is_expired(now_ms) {
            self.reset(now_ms);
        } else {
            self.roll_over();
        }
    }

    /// Promote `next` to `current` and allocate a fresh `next`.
    ///
    /// The fresh generation expires one lifespan after the old `next`,
    /// preserving the fixed stride no matter how late reconciliation
    /// ran.
    fn roll_over(&mut self) {
        let next_expiry = self.next.expiry_ms() + self.lifespan_ms;
        debug!(
            dropped = self.current.len(),
            next_expiry_ms = next_expiry,
            "Rolling over store generations"
        );
        self.current = mem::replace(&mut self.next, Generation::new(next_expiry));
    }

    /// Discard both generations and start fresh from `now_ms`.
    fn reset(&mut self, now_ms: u64) {
        let current_expiry = now_ms + self.lifespan_ms;
        debug!(
            dropped = self.current.len() + self.next.len(),
            current_expiry_ms = current_expiry,
            "Resetting store generations"
        );
        self.current = Generation::new(current_expiry);
        self.next = Generation::new(current_expiry + self.lifespan_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIFESPAN: u64 = 1_000;

    fn record(count: u64, expiry_ms: u64) -> CounterRecord {
        CounterRecord { count, expiry_ms }
    }

    #[test]
    fn test_set_then_get() {
        let mut store = WindowedStore::new(LIFESPAN, 0);

        store.set("a", record(1, 900), 0);

        assert!(store.has("a", 0));
        assert_eq!(store.get("a", 0), Some(record(1, 900)));
        assert_eq!(store.get("missing", 0), None);
    }

    #[test]
    fn test_remove_clears_both_generations() {
        let mut store = WindowedStore::new(LIFESPAN, 0);

        // One record lands in current, one in next.
        store.set("a", record(1, 500), 0);
        store.set("b", record(1, 1_500), 0);

        store.remove("a");
        store.remove("b");

        assert!(!store.has("a", 0));
        assert!(!store.has("b", 0));
    }

    #[test]
    fn test_placement_by_record_expiry() {
        let mut store = WindowedStore::new(LIFESPAN, 0);

        // Expires before current (t=1000): stays in current, so it is
        // gone after one roll-over...
        store.set("short", record(1, 500), 0);
        // ...while a record covered by next (t=2000) survives it.
        store.set("long", record(1, 1_500), 0);

        // Advance past current's expiry but not next's.
        assert!(!store.has("short", 1_100));
        assert!(store.has("long", 1_100));
    }

    #[test]
    fn test_downgrade_deletes_next_copy() {
        let mut store = WindowedStore::new(LIFESPAN, 0);

        // First write goes to next (expiry covers it).
        store.set("a", record(5, 1_500), 0);
        // Rewrite with a shrunken expiry goes to current; the next
        // copy must not shadow it.
        store.set("a", record(1, 500), 0);

        assert_eq!(store.get("a", 0), Some(record(1, 500)));
    }

    #[test]
    fn test_single_rollover_keeps_next_records() {
        let mut store = WindowedStore::new(LIFESPAN, 0);
        store.set("a", record(2, 1_500), 0);

        // More than one lifespan but less than two: exactly one
        // roll-over, not a reset.
        let now = 1_500;
        assert_eq!(store.get("a", now), Some(record(2, 1_500)));
    }

    #[test]
    fn test_double_expiry_resets_everything() {
        let mut store = WindowedStore::new(LIFESPAN, 0);
        store.set("a", record(2, 900), 0);
        store.set("b", record(4, 1_900), 0);

        // Both generations (expiries 1000 and 2000) are stale.
        let now = 2_500;
        assert!(!store.has("a", now));
        assert!(!store.has("b", now));
    }

    #[test]
    fn test_rollover_preserves_expiry_stride() {
        let mut store = WindowedStore::new(LIFESPAN, 0);

        // Reconcile late in the roll-over window; the fresh next must
        // still expire at old-next + lifespan, not now + lifespan.
        store.set("a", record(1, 2_500), 1_900);

        // Generations now expire at 2000 and 3000, and the record sits
        // in the one expiring at 3000. It survives the roll-over at
        // 2500 and is dropped by the one at 3000.
        assert!(store.has("a", 2_500));
        assert!(!store.has("a", 3_000));
    }

    #[test]
    fn test_read_does_not_rotate_before_expiry() {
        let mut store = WindowedStore::new(LIFESPAN, 0);
        store.set("a", record(1, 999), 0);

        // Any access strictly before current's expiry leaves both
        // generations in place.
        assert!(store.has("a", 998));
        assert_eq!(store.get("a", 500), Some(record(1, 999)));
    }
}
