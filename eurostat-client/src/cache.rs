//! FILENAME: eurostat-client/src/cache.rs
//! TTL cache for decoded cubes.
//!
//! Eviction is lazy: a stale entry is only removed when the next lookup
//! finds it expired. There is no background sweep.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonstat::Dataset;

/// Entries are served for 24 hours; the statistics behind them update
/// twice a year.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

struct CacheEntry {
    cube: Arc<Dataset>,
    stored: Instant,
}

/// Keyed cube cache with a fixed time-to-live.
pub struct TtlCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
}

impl TtlCache {
    pub fn new(ttl: Duration) -> Self {
        TtlCache {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Returns a fresh entry or nothing; an expired entry is evicted by
    /// this lookup.
    pub fn lookup(&mut self, key: &str) -> Option<Arc<Dataset>> {
        match self.entries.get(key) {
            Some(entry) if entry.stored.elapsed() < self.ttl => Some(Arc::clone(&entry.cube)),
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn store(&mut self, key: String, cube: Arc<Dataset>) {
        self.entries.insert(
            key,
            CacheEntry {
                cube,
                stored: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cube() -> Arc<Dataset> {
        let payload = json!({
            "class": "dataset",
            "id": ["time"],
            "size": [1],
            "dimension": {"time": {"category": {"index": ["2024"]}}},
            "value": [1.0]
        });
        Arc::new(jsonstat::decode_dataset(&payload).unwrap())
    }

    #[test]
    fn fresh_entries_are_served() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.store("k".to_string(), cube());
        assert!(cache.lookup("k").is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn expired_entries_are_evicted_on_lookup() {
        let mut cache = TtlCache::new(Duration::ZERO);
        cache.store("k".to_string(), cube());
        assert_eq!(cache.len(), 1);
        assert!(cache.lookup("k").is_none());
        // The expired entry is gone, not just skipped.
        assert!(cache.is_empty());
    }

    #[test]
    fn missing_keys_are_a_clean_miss() {
        let mut cache = TtlCache::new(DEFAULT_TTL);
        assert!(cache.lookup("absent").is_none());
    }
}
