//! Generic cached listing and record services.
//!
//! Per-entity services compose these two; the flow for a list request is:
//! clamp the window, try the list cache, otherwise run count and page
//! concurrently from one [`ListQuery`] and cache the result.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::error::ServiceError;
use crate::application::filters::{FilterSource, ListQuery};
use crate::application::pagination::{ListPage, PageWindow};
use crate::application::repos::{ListingRepo, RecordRepo};
use crate::cache::{CacheModule, CacheService, CacheTtl};

/// An entity exposed through a cached listing.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Filter: FilterSource + Send + Sync;

    const MODULE: CacheModule;
    /// Payload key for one record, e.g. `career`.
    const SINGULAR: &'static str;
    /// Payload key for a collection, e.g. `careers`.
    const PLURAL: &'static str;
}

pub struct ListingService<R: Resource> {
    repo: Arc<dyn ListingRepo<R>>,
    cache: Arc<CacheService>,
}

impl<R: Resource> Clone for ListingService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<R: Resource> ListingService<R> {
    pub fn new(repo: Arc<dyn ListingRepo<R>>, cache: Arc<CacheService>) -> Self {
        Self { repo, cache }
    }

    pub async fn list(
        &self,
        window: PageWindow,
        filter: &R::Filter,
    ) -> Result<ListPage<R>, ServiceError> {
        self.list_query(window, ListQuery::from_source(filter))
            .await
    }

    pub async fn list_query(
        &self,
        window: PageWindow,
        query: ListQuery,
    ) -> Result<ListPage<R>, ServiceError> {
        if let Some(cached) = self.cache.get_list::<ListPage<R>, _>(
            R::MODULE,
            window.page(),
            window.limit(),
            query.filters(),
        ) {
            debug!(module = R::MODULE.name(), page = window.page(), "list served from cache");
            return Ok(cached);
        }

        let (total, items) = tokio::try_join!(
            async {
                self.repo
                    .count(&query)
                    .await
                    .map_err(|err| ServiceError::persistence("count", R::PLURAL, err))
            },
            async {
                self.repo
                    .list(&query, window)
                    .await
                    .map_err(|err| ServiceError::persistence("fetch", R::PLURAL, err))
            },
        )?;

        let page = ListPage::new(items, total, window);
        self.cache.set_list(
            R::MODULE,
            window.page(),
            window.limit(),
            query.filters(),
            &page,
            CacheTtl::Medium,
        );
        Ok(page)
    }

    /// Every matching record, uncached and unpaginated.
    pub async fn export(&self, filter: &R::Filter) -> Result<Vec<R>, ServiceError> {
        let query = ListQuery::from_source(filter);
        self.repo
            .export(&query)
            .await
            .map_err(|err| ServiceError::persistence("export", R::PLURAL, err))
    }
}

pub struct RecordService<R: Resource> {
    repo: Arc<dyn RecordRepo<R>>,
    cache: Arc<CacheService>,
}

impl<R: Resource> Clone for RecordService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<R: Resource> RecordService<R> {
    pub fn new(repo: Arc<dyn RecordRepo<R>>, cache: Arc<CacheService>) -> Self {
        Self { repo, cache }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<R, ServiceError> {
        if let Some(cached) = self.cache.get_item::<R>(R::MODULE, id) {
            return Ok(cached);
        }

        let record = self
            .find_uncached(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(R::SINGULAR))?;
        self.cache
            .set_item(R::MODULE, id, &record, CacheTtl::Medium);
        Ok(record)
    }

    /// Read straight from the repository, bypassing the item cache.
    pub async fn find_uncached(&self, id: i64) -> Result<Option<R>, ServiceError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|err| ServiceError::persistence("fetch", R::SINGULAR, err))
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        if self.find_uncached(id).await?.is_none() {
            return Err(ServiceError::not_found(R::SINGULAR));
        }

        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|err| ServiceError::persistence("delete", R::SINGULAR, err))?;
        self.invalidate(id);

        if deleted {
            Ok(())
        } else {
            Err(ServiceError::not_found(R::SINGULAR))
        }
    }

    /// Drop the module's cached pages and the record's item entry.
    pub fn invalidate(&self, id: i64) {
        self.cache.invalidate_module(R::MODULE);
        self.cache.delete_item(R::MODULE, id);
    }
}
