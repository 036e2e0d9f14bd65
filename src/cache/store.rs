//! Cache storage.
//!
//! Values are stored as JSON so one store can hold every module's payloads.
//! Each entry carries an absolute expiry; expired entries read as absent and
//! are dropped on access or by [`CacheStore::purge_expired`].

use std::sync::RwLock;
use std::time::{Duration, Instant};

use lru::LruCache;
use serde_json::Value;

use super::config::CacheConfig;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

/// Key/value storage with per-entry TTL.
///
/// Every method is a single critical section, so operations on one key are
/// atomic with respect to each other.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;

    /// Insert or replace `key`. Returns the key evicted to make room, if any.
    fn set(&self, key: String, value: Value, ttl: Duration) -> Option<String>;

    fn delete(&self, key: &str) -> bool;

    /// Remove every key starting with `prefix`, returning how many were removed.
    fn delete_prefix(&self, prefix: &str) -> usize;

    fn flush(&self) -> usize;

    fn purge_expired(&self) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}

/// In-process LRU store.
pub struct MemoryStore {
    entries: RwLock<LruCache<String, CacheEntry>>,
}

impl MemoryStore {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(config.capacity_non_zero())),
        }
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        let mut entries = rw_write(&self.entries, SOURCE, "get");
        let expired = entries.get(key)?.is_expired(Instant::now());
        if expired {
            entries.pop(key);
            return None;
        }
        entries.get(key).map(|entry| entry.value.clone())
    }

    fn set(&self, key: String, value: Value, ttl: Duration) -> Option<String> {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        let mut entries = rw_write(&self.entries, SOURCE, "set");
        match entries.push(key.clone(), entry) {
            Some((displaced, _)) if displaced != key => Some(displaced),
            _ => None,
        }
    }

    fn delete(&self, key: &str) -> bool {
        rw_write(&self.entries, SOURCE, "delete")
            .pop(key)
            .is_some()
    }

    fn delete_prefix(&self, prefix: &str) -> usize {
        let mut entries = rw_write(&self.entries, SOURCE, "delete_prefix");
        let doomed: Vec<String> = entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &doomed {
            entries.pop(key);
        }
        doomed.len()
    }

    fn flush(&self) -> usize {
        let mut entries = rw_write(&self.entries, SOURCE, "flush");
        let removed = entries.len();
        entries.clear();
        removed
    }

    fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = rw_write(&self.entries, SOURCE, "purge_expired");
        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            entries.pop(key);
        }
        expired.len()
    }

    fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").len()
    }

    fn capacity(&self) -> usize {
        rw_read(&self.entries, SOURCE, "capacity").cap().get()
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use serde_json::json;

    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    fn store_with_capacity(capacity: usize) -> MemoryStore {
        MemoryStore::new(&CacheConfig {
            capacity,
            ..Default::default()
        })
    }

    #[test]
    fn set_then_get_returns_value() {
        let store = store_with_capacity(8);
        assert!(store.get("careers_list_item_1").is_none());

        store.set("careers_list_item_1".into(), json!({"id": 1}), TTL);

        assert_eq!(store.get("careers_list_item_1"), Some(json!({"id": 1})));
    }

    #[test]
    fn expired_entries_read_as_absent() {
        let store = store_with_capacity(8);
        store.set("blogs_list_item_3".into(), json!(3), Duration::ZERO);

        assert!(store.get("blogs_list_item_3").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn purge_expired_keeps_live_entries() {
        let store = store_with_capacity(8);
        store.set("a".into(), json!(1), Duration::ZERO);
        store.set("b".into(), json!(2), Duration::ZERO);
        store.set("c".into(), json!(3), TTL);

        assert_eq!(store.purge_expired(), 2);
        assert_eq!(store.len(), 1);
        assert!(store.get("c").is_some());
    }

    #[test]
    fn delete_prefix_is_scoped_to_one_module() {
        let store = store_with_capacity(8);
        store.set("careers_list_page_1_limit_10_filters_{}".into(), json!([]), TTL);
        store.set("careers_list_item_7".into(), json!({}), TTL);
        store.set("blogs_list_item_7".into(), json!({}), TTL);

        assert_eq!(store.delete_prefix("careers_list_"), 2);
        assert!(store.get("blogs_list_item_7").is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn replacing_a_key_is_not_an_eviction() {
        let store = store_with_capacity(2);
        assert_eq!(store.set("a".into(), json!(1), TTL), None);
        assert_eq!(store.set("a".into(), json!(2), TTL), None);
        assert_eq!(store.get("a"), Some(json!(2)));
    }

    #[test]
    fn capacity_evicts_least_recently_used() {
        let store = store_with_capacity(2);
        store.set("a".into(), json!(1), TTL);
        store.set("b".into(), json!(2), TTL);
        assert!(store.get("a").is_some());

        let evicted = store.set("c".into(), json!(3), TTL);

        assert_eq!(evicted.as_deref(), Some("b"));
        assert!(store.get("b").is_none());
        assert_eq!(store.capacity(), 2);
    }

    #[test]
    fn flush_empties_store() {
        let store = store_with_capacity(4);
        store.set("a".into(), json!(1), TTL);
        store.set("b".into(), json!(2), TTL);

        assert_eq!(store.flush(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn store_recovers_from_poisoned_lock() {
        let store = store_with_capacity(4);

        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = store.entries.write().expect("entries lock should be acquired");
            panic!("poison entries lock");
        }));

        store.set("a".into(), json!(1), TTL);
        assert_eq!(store.get("a"), Some(json!(1)));
    }
}
