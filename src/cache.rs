//! Time-bounded memoization for pipeline results.
//!
//! The analytics pipeline is a pure function of (snapshot, parameters), so
//! repeated invocations within a short refresh window can reuse the
//! previous output. The cache lives outside the statistical core to keep
//! that core referentially transparent.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// A value cached together with its insertion time.
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// A memoizer with a fixed time-to-live per entry.
///
/// Keys are expected to identify both the input snapshot and the
/// parameters that produced the value; stale entries are replaced on the
/// next lookup rather than evicted eagerly.
pub struct TtlCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    ttl: Duration,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Look up a fresh entry, or compute, store and return a new value.
    pub fn get_or_insert_with<F>(&mut self, key: K, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(&key) {
            if now.duration_since(entry.inserted_at) < self.ttl {
                return entry.value.clone();
            }
        }

        let value = compute();
        self.entries.insert(
            key,
            CacheEntry {
                value: value.clone(),
                inserted_at: now,
            },
        );
        value
    }

    /// Whether a fresh (unexpired) entry exists for the key.
    pub fn contains_fresh(&self, key: &K) -> bool {
        self.entries
            .get(key)
            .is_some_and(|e| e.inserted_at.elapsed() < self.ttl)
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
