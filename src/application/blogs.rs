//! Blog articles with title-derived slugs.

use std::sync::Arc;

use time::OffsetDateTime;

use crate::application::error::ServiceError;
use crate::application::filters::{FilterField, FilterSet, FilterSource, PredicateKind};
use crate::application::pagination::{ListPage, PageWindow};
use crate::application::repos::{
    BlogsWriteRepo, CreateBlogParams, ListingRepo, RecordRepo, RepoError, UpdateBlogParams,
};
use crate::application::resource::{ListingService, RecordService, Resource};
use crate::cache::{CacheModule, CacheService, CacheTtl};
use crate::domain::entities::BlogRecord;
use crate::domain::error::{DomainError, ensure_present};
use crate::domain::slug::{SlugAsyncError, SlugError, generate_unique_slug};
use crate::domain::types::BlogStatus;

#[derive(Debug, Clone, Default)]
pub struct BlogFilter {
    pub status: Option<i64>,
    pub category: Option<String>,
    pub author_id: Option<i64>,
    pub search: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl FilterSource for BlogFilter {
    const FIELDS: &'static [FilterField] = &[
        FilterField::new("status", PredicateKind::Exact("status")),
        FilterField::new("category", PredicateKind::Substring("category")),
        FilterField::new("author_id", PredicateKind::Exact("author_id")),
        FilterField::new("search", PredicateKind::AnySubstring(&["title", "content"])),
        FilterField::new("tags", PredicateKind::ContainsTags("tags")),
    ];

    fn filter_set(&self) -> FilterSet {
        FilterSet::new()
            .int("status", self.status)
            .text("category", self.category.as_deref())
            .int("author_id", self.author_id)
            .text("search", self.search.as_deref())
            .tags("tags", self.tags.as_deref())
    }
}

impl Resource for BlogRecord {
    type Filter = BlogFilter;

    const MODULE: CacheModule = CacheModule::Blogs;
    const SINGULAR: &'static str = "blog";
    const PLURAL: &'static str = "blogs";
}

#[derive(Debug, Clone, Default)]
pub struct CreateBlogCommand {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub author_id: i64,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub status: Option<i16>,
    pub published_at: Option<OffsetDateTime>,
}

/// Partial update; a new title regenerates the slug. `Some(None)` clears an
/// optional field.
#[derive(Debug, Clone, Default)]
pub struct UpdateBlogCommand {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<Option<String>>,
    pub featured_image: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub meta_title: Option<Option<String>>,
    pub meta_description: Option<Option<String>>,
    pub status: Option<i16>,
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Clone)]
pub struct BlogService {
    listing: ListingService<BlogRecord>,
    records: RecordService<BlogRecord>,
    writer: Arc<dyn BlogsWriteRepo>,
    cache: Arc<CacheService>,
}

impl BlogService {
    pub fn new(
        reader: Arc<dyn ListingRepo<BlogRecord>>,
        records: Arc<dyn RecordRepo<BlogRecord>>,
        writer: Arc<dyn BlogsWriteRepo>,
        cache: Arc<CacheService>,
    ) -> Self {
        Self {
            listing: ListingService::new(reader, Arc::clone(&cache)),
            records: RecordService::new(records, Arc::clone(&cache)),
            writer,
            cache,
        }
    }

    pub async fn list(
        &self,
        window: PageWindow,
        filter: &BlogFilter,
    ) -> Result<ListPage<BlogRecord>, ServiceError> {
        self.listing.list(window, filter).await
    }

    /// Public listing; always restricted to published articles.
    pub async fn list_published(
        &self,
        window: PageWindow,
        filter: &BlogFilter,
    ) -> Result<ListPage<BlogRecord>, ServiceError> {
        let filter = BlogFilter {
            status: Some(BlogStatus::Published.code().into()),
            ..filter.clone()
        };
        self.listing.list(window, &filter).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<BlogRecord, ServiceError> {
        self.records.get_by_id(id).await
    }

    pub async fn get_published_by_id(&self, id: i64) -> Result<BlogRecord, ServiceError> {
        published(self.records.get_by_id(id).await?)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<BlogRecord, ServiceError> {
        let cache_id = format!("slug_{slug}");
        if let Some(cached) = self.cache.get_item::<BlogRecord>(BlogRecord::MODULE, &cache_id) {
            return Ok(cached);
        }

        let blog = self
            .writer
            .find_by_slug(slug)
            .await
            .map_err(|err| ServiceError::persistence("fetch", BlogRecord::SINGULAR, err))?
            .ok_or_else(|| ServiceError::not_found(BlogRecord::SINGULAR))?;
        self.cache
            .set_item(BlogRecord::MODULE, &cache_id, &blog, CacheTtl::Medium);
        Ok(blog)
    }

    pub async fn get_published_by_slug(&self, slug: &str) -> Result<BlogRecord, ServiceError> {
        published(self.get_by_slug(slug).await?)
    }

    pub async fn create(&self, command: CreateBlogCommand) -> Result<BlogRecord, ServiceError> {
        ensure_present(&command.title, "title")?;
        ensure_present(&command.content, "content")?;
        let status = match command.status {
            Some(code) => BlogStatus::try_from(code)?,
            None => BlogStatus::Draft,
        };

        let slug = self.unique_slug(&command.title, None).await?;
        let published_at = match (status, command.published_at) {
            (BlogStatus::Published, None) => Some(OffsetDateTime::now_utc()),
            (_, published_at) => published_at,
        };

        let params = CreateBlogParams {
            title: command.title.trim().to_string(),
            slug,
            content: command.content,
            excerpt: command.excerpt,
            featured_image: command.featured_image,
            author_id: command.author_id,
            category: command.category,
            tags: normalize_tags(command.tags),
            meta_title: command.meta_title,
            meta_description: command.meta_description,
            status: status.code(),
            published_at,
        };

        let blog = self
            .writer
            .create_blog(params)
            .await
            .map_err(|err| ServiceError::persistence("create", BlogRecord::SINGULAR, err))?;
        self.records.invalidate(blog.id);
        Ok(blog)
    }

    pub async fn update(
        &self,
        id: i64,
        command: UpdateBlogCommand,
    ) -> Result<BlogRecord, ServiceError> {
        let Some(current) = self.records.find_uncached(id).await? else {
            return Err(ServiceError::not_found(BlogRecord::SINGULAR));
        };

        let mut params = UpdateBlogParams {
            title: command.title,
            slug: None,
            content: command.content,
            excerpt: command.excerpt,
            featured_image: command.featured_image,
            category: command.category,
            tags: command.tags.map(normalize_tags),
            meta_title: command.meta_title,
            meta_description: command.meta_description,
            status: command.status,
            published_at: command.published_at,
        };
        if params.is_empty() {
            return Err(DomainError::validation("No fields to update").into());
        }

        if let Some(title) = params.title.take() {
            ensure_present(&title, "title")?;
            let title = title.trim().to_string();
            if title != current.title {
                params.slug = Some(self.unique_slug(&title, Some(id)).await?);
            }
            params.title = Some(title);
        }
        if let Some(code) = params.status {
            let status = BlogStatus::try_from(code)?;
            if status == BlogStatus::Published
                && params.published_at.is_none()
                && current.published_at.is_none()
            {
                params.published_at = Some(OffsetDateTime::now_utc());
            }
        }

        let updated = self
            .writer
            .update_blog(id, params)
            .await
            .map_err(|err| ServiceError::persistence("update", BlogRecord::SINGULAR, err))?;
        self.records.invalidate(id);
        updated.ok_or_else(|| ServiceError::not_found(BlogRecord::SINGULAR))
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.records.delete(id).await
    }

    async fn unique_slug(&self, title: &str, exclude: Option<i64>) -> Result<String, ServiceError> {
        let writer = Arc::clone(&self.writer);
        let result = generate_unique_slug(title, move |candidate| {
            let writer = Arc::clone(&writer);
            async move {
                writer
                    .slug_taken(&candidate, exclude)
                    .await
                    .map(|taken| !taken)
            }
        })
        .await;

        result.map_err(|err: SlugAsyncError<RepoError>| match err {
            SlugAsyncError::Slug(SlugError::EmptyInput) => DomainError::required("title").into(),
            SlugAsyncError::Slug(SlugError::Unrepresentable { .. }) => {
                DomainError::validation("`title` must contain letters or digits").into()
            }
            SlugAsyncError::Slug(SlugError::Exhausted { base }) => ServiceError::Duplicate {
                message: format!("Too many blogs share the slug `{base}`"),
            },
            SlugAsyncError::Predicate(err) => {
                ServiceError::persistence("check slug for", BlogRecord::SINGULAR, err)
            }
        })
    }
}

fn published(blog: BlogRecord) -> Result<BlogRecord, ServiceError> {
    if blog.status == BlogStatus::Published.code() {
        Ok(blog)
    } else {
        Err(ServiceError::not_found(BlogRecord::SINGULAR))
    }
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !normalized.iter().any(|existing| existing == tag) {
            normalized.push(tag.to_string());
        }
    }
    normalized
}
