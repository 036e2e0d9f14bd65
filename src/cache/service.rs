//! Typed cache facade used by the entity services.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use metrics::counter;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::config::CacheConfig;
use super::keys::{CacheTtl, ModuleKey, item_key, list_key};
use super::store::{CacheStore, MemoryStore};

/// Point-in-time cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub enabled: bool,
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

pub struct CacheService {
    store: Arc<dyn CacheStore>,
    enabled: bool,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheService {
    pub fn new(store: Arc<dyn CacheStore>, config: &CacheConfig) -> Self {
        Self {
            store,
            enabled: config.enabled,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// In-memory cache sized from `config`.
    pub fn in_memory(config: &CacheConfig) -> Self {
        Self::new(Arc::new(MemoryStore::new(config)), config)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn get_list<T, F>(
        &self,
        module: impl Into<ModuleKey>,
        page: u32,
        limit: u32,
        filters: &F,
    ) -> Option<T>
    where
        T: DeserializeOwned,
        F: Serialize + ?Sized,
    {
        let module = module.into();
        let key = self.list_key(&module, page, limit, filters)?;
        self.read(&module, &key)
    }

    pub fn set_list<T, F>(
        &self,
        module: impl Into<ModuleKey>,
        page: u32,
        limit: u32,
        filters: &F,
        value: &T,
        ttl: CacheTtl,
    ) where
        T: Serialize,
        F: Serialize + ?Sized,
    {
        let module = module.into();
        if let Some(key) = self.list_key(&module, page, limit, filters) {
            self.write(&module, key, value, ttl);
        }
    }

    pub fn get_item<T>(&self, module: impl Into<ModuleKey>, id: impl fmt::Display) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let module = module.into();
        let key = item_key(&module, id);
        self.read(&module, &key)
    }

    pub fn set_item<T>(
        &self,
        module: impl Into<ModuleKey>,
        id: impl fmt::Display,
        value: &T,
        ttl: CacheTtl,
    ) where
        T: Serialize,
    {
        let module = module.into();
        let key = item_key(&module, id);
        self.write(&module, key, value, ttl);
    }

    pub fn delete_item(&self, module: impl Into<ModuleKey>, id: impl fmt::Display) -> bool {
        let module = module.into();
        self.store.delete(&item_key(&module, id))
    }

    /// Drop every list page and item cached for `module`.
    pub fn invalidate_module(&self, module: impl Into<ModuleKey>) -> usize {
        let module = module.into();
        let removed: usize = module
            .prefixes()
            .iter()
            .map(|prefix| self.store.delete_prefix(prefix))
            .sum();
        if removed > 0 {
            counter!("drivefitt_cache_invalidated_total", "module" => module.base().to_owned())
                .increment(removed as u64);
        }
        debug!(module = %module, removed, "cache module invalidated");
        removed
    }

    /// Drop everything. Only the admin clear operation should need this.
    pub fn clear_all(&self) -> usize {
        let removed = self.store.flush();
        if removed > 0 {
            counter!("drivefitt_cache_invalidated_total", "module" => "*").increment(removed as u64);
        }
        info!(removed, "cache cleared");
        removed
    }

    pub fn purge_expired(&self) -> usize {
        self.store.purge_expired()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            enabled: self.enabled,
            entries: self.store.len(),
            capacity: self.store.capacity(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn list_key<F>(&self, module: &ModuleKey, page: u32, limit: u32, filters: &F) -> Option<String>
    where
        F: Serialize + ?Sized,
    {
        if !self.enabled {
            return None;
        }
        match list_key(module, page, limit, filters) {
            Ok(key) => Some(key),
            Err(err) => {
                warn!(module = %module, error = %err, "failed to derive list cache key");
                None
            }
        }
    }

    fn read<T>(&self, module: &ModuleKey, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        if !self.enabled {
            return None;
        }

        let Some(value) = self.store.get(key) else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            counter!("drivefitt_cache_miss_total", "module" => module.base().to_owned())
                .increment(1);
            return None;
        };

        match serde_json::from_value(value) {
            Ok(decoded) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                counter!("drivefitt_cache_hit_total", "module" => module.base().to_owned())
                    .increment(1);
                Some(decoded)
            }
            Err(err) => {
                warn!(key = %key, error = %err, "dropping undecodable cache entry");
                self.store.delete(key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                counter!("drivefitt_cache_miss_total", "module" => module.base().to_owned())
                    .increment(1);
                None
            }
        }
    }

    fn write<T>(&self, module: &ModuleKey, key: String, value: &T, ttl: CacheTtl)
    where
        T: Serialize,
    {
        if !self.enabled {
            return;
        }

        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(err) => {
                warn!(key = %key, error = %err, "failed to encode cache entry");
                return;
            }
        };

        if let Some(evicted) = self.store.set(key, value, ttl.as_duration()) {
            debug!(module = %module, evicted = %evicted, "cache entry evicted");
            counter!("drivefitt_cache_evict_total", "module" => module.base().to_owned())
                .increment(1);
        }
    }
}

/// Periodically purge expired entries until the runtime shuts down.
pub fn spawn_sweeper(cache: Arc<CacheService>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.tick().await;
        loop {
            interval.tick().await;
            let purged = cache.purge_expired();
            if purged > 0 {
                debug!(purged, "expired cache entries purged");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::Deserialize;

    use super::*;
    use crate::cache::keys::CacheModule;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Page {
        ids: Vec<i64>,
        total: i64,
    }

    fn filters(status: i64) -> BTreeMap<&'static str, i64> {
        BTreeMap::from([("status", status)])
    }

    #[test]
    fn list_round_trip_respects_filters() {
        let cache = CacheService::in_memory(&CacheConfig::default());
        let page = Page {
            ids: vec![1, 2],
            total: 2,
        };

        cache.set_list(CacheModule::Careers, 1, 10, &filters(1), &page, CacheTtl::Medium);

        assert_eq!(
            cache.get_list::<Page, _>(CacheModule::Careers, 1, 10, &filters(1)),
            Some(page)
        );
        assert!(
            cache
                .get_list::<Page, _>(CacheModule::Careers, 1, 10, &filters(2))
                .is_none()
        );
        assert!(
            cache
                .get_list::<Page, _>(CacheModule::Careers, 2, 10, &filters(1))
                .is_none()
        );
    }

    #[test]
    fn invalidate_module_leaves_other_modules_alone() {
        let cache = CacheService::in_memory(&CacheConfig::default());
        cache.set_item(CacheModule::Careers, 1, &"career", CacheTtl::Medium);
        cache.set_list(CacheModule::Careers, 1, 10, &filters(1), &"page", CacheTtl::Medium);
        cache.set_item(CacheModule::Blogs, 1, &"blog", CacheTtl::Medium);

        assert_eq!(cache.invalidate_module(CacheModule::Careers), 2);

        assert!(cache.get_item::<String>(CacheModule::Careers, 1).is_none());
        assert_eq!(
            cache.get_item::<String>(CacheModule::Blogs, 1).as_deref(),
            Some("blog")
        );
    }

    #[test]
    fn custom_module_names_use_their_literal_prefix() {
        let cache = CacheService::in_memory(&CacheConfig::default());
        cache.set_item(ModuleKey::parse("PROMOS"), 5, &42, CacheTtl::Short);

        assert_eq!(cache.get_item::<i32>(ModuleKey::parse("PROMOS"), 5), Some(42));
        assert_eq!(cache.invalidate_module(ModuleKey::parse("PROMOS")), 1);
    }

    #[test]
    fn custom_name_prefixing_a_known_base_key_stays_in_its_namespace() {
        let cache = CacheService::in_memory(&CacheConfig::default());
        cache.set_item(CacheModule::Careers, 1, &"career", CacheTtl::Medium);
        cache.set_list(CacheModule::Careers, 1, 10, &filters(1), &"page", CacheTtl::Medium);
        cache.set_item(ModuleKey::parse("careers"), 1, &"custom", CacheTtl::Medium);

        assert_eq!(cache.invalidate_module(ModuleKey::parse("careers")), 1);

        assert_eq!(
            cache.get_item::<String>(CacheModule::Careers, 1).as_deref(),
            Some("career")
        );
        assert_eq!(
            cache
                .get_list::<String, _>(CacheModule::Careers, 1, 10, &filters(1))
                .as_deref(),
            Some("page")
        );
    }

    #[test]
    fn delete_item_and_clear_all() {
        let cache = CacheService::in_memory(&CacheConfig::default());
        cache.set_item(CacheModule::Payments, 3, &3, CacheTtl::Long);
        cache.set_item(CacheModule::Users, 4, &4, CacheTtl::Long);

        assert!(cache.delete_item(CacheModule::Payments, 3));
        assert!(!cache.delete_item(CacheModule::Payments, 3));
        assert_eq!(cache.clear_all(), 1);
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn disabled_cache_never_hits() {
        let config = CacheConfig {
            enabled: false,
            ..Default::default()
        };
        let cache = CacheService::in_memory(&config);
        cache.set_item(CacheModule::Blogs, 1, &"blog", CacheTtl::Medium);

        assert!(cache.get_item::<String>(CacheModule::Blogs, 1).is_none());
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn undecodable_entry_counts_as_miss_and_is_dropped() {
        let cache = CacheService::in_memory(&CacheConfig::default());
        cache.set_item(CacheModule::Blogs, 1, &"not a page", CacheTtl::Medium);

        assert!(cache.get_item::<Page>(CacheModule::Blogs, 1).is_none());

        let stats = cache.stats();
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 0);
    }
}
