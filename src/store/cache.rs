//! Read-through record cache
//!
//! An explicit map from cache key to a JSON snapshot plus the monotonic
//! instant it was stored. Entries older than the TTL are treated as absent.
//! Owned by the store instance; there are no background timers.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde_json::Value;

/// How long a cached snapshot stays fresh
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5);

/// In-memory cache of recently read records
pub struct RecordCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Value, Instant)>>,
}

impl RecordCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Get a fresh snapshot, dropping it if it has expired
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some((value, stored_at)) if stored_at.elapsed() < self.ttl => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a snapshot under a key
    pub fn put(&self, key: &str, value: Value) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), (value, Instant::now()));
    }

    /// Drop a single key
    pub fn invalidate(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(key);
    }

    /// Drop every key with the given prefix
    pub fn invalidate_prefix(&self, prefix: &str) {
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|key, _| !key.starts_with(prefix));
    }

    /// Drop everything
    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap();
        entries.clear();
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

impl Default for RecordCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_put_and_get() {
        let cache = RecordCache::new(Duration::from_secs(60));
        cache.put("1:patient", json!({"patient_id": "HN-1"}));

        assert_eq!(cache.get("1:patient"), Some(json!({"patient_id": "HN-1"})));
        assert_eq!(cache.get("2:patient"), None);
    }

    #[test]
    fn test_expired_entry_is_absent() {
        let cache = RecordCache::new(Duration::ZERO);
        cache.put("1:patient", json!(1));

        assert_eq!(cache.get("1:patient"), None);
        // The stale entry was dropped, not just hidden
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_invalidate() {
        let cache = RecordCache::new(Duration::from_secs(60));
        cache.put("1:patient", json!(1));
        cache.put("1:vitals", json!(2));
        cache.put("2:patient", json!(3));

        cache.invalidate("1:vitals");
        assert_eq!(cache.get("1:vitals"), None);
        assert!(cache.get("1:patient").is_some());

        cache.invalidate_prefix("1:");
        assert_eq!(cache.get("1:patient"), None);
        assert!(cache.get("2:patient").is_some());

        cache.clear();
        assert_eq!(cache.len(), 0);
    }
}
