//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::{Date, OffsetDateTime};

use crate::application::filters::ListQuery;
use crate::application::pagination::PageWindow;
use crate::application::resource::Resource;
use crate::domain::entities::{
    BlogRecord, CareerRecord, ContactRecord, FranchiseRecord, PaymentRecord, SubscriptionRecord,
    UserDetailsRecord, UserLoginRecord, UserRecord,
};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Filtered, paginated reads over one table.
///
/// `list`, `count` and `export` must all apply `query.clause()` unchanged.
#[async_trait]
pub trait ListingRepo<R: Resource>: Send + Sync {
    /// Rows ordered by `created_at DESC`, limited to `window`.
    async fn list(&self, query: &ListQuery, window: PageWindow) -> Result<Vec<R>, RepoError>;

    async fn count(&self, query: &ListQuery) -> Result<i64, RepoError>;

    /// Every matching row ordered by `created_at DESC`.
    async fn export(&self, query: &ListQuery) -> Result<Vec<R>, RepoError>;
}

/// Keyed access for tables with a numeric primary key.
#[async_trait]
pub trait RecordRepo<R: Resource>: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<R>, RepoError>;

    /// Returns `false` when no row had this id.
    async fn delete(&self, id: i64) -> Result<bool, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateCareerParams {
    pub title: String,
    pub description: String,
    pub location: String,
    pub job_type: String,
    pub experience_level: String,
    pub salary_range: Option<String>,
    pub requirements: String,
    pub responsibilities: String,
    pub benefits: Option<String>,
    pub status: i16,
    pub posted_by: i64,
}

/// Only `Some` fields are written; `Some(None)` sets a nullable column to NULL.
#[derive(Debug, Clone, Default)]
pub struct UpdateCareerParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub salary_range: Option<Option<String>>,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub benefits: Option<Option<String>>,
    pub status: Option<i16>,
}

impl UpdateCareerParams {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.job_type.is_none()
            && self.experience_level.is_none()
            && self.salary_range.is_none()
            && self.requirements.is_none()
            && self.responsibilities.is_none()
            && self.benefits.is_none()
            && self.status.is_none()
    }
}

#[async_trait]
pub trait CareersWriteRepo: Send + Sync {
    async fn create_career(&self, params: CreateCareerParams) -> Result<CareerRecord, RepoError>;

    /// `None` when the row vanished before the update.
    async fn update_career(
        &self,
        id: i64,
        params: UpdateCareerParams,
    ) -> Result<Option<CareerRecord>, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateBlogParams {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub author_id: i64,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub status: i16,
    pub published_at: Option<OffsetDateTime>,
}

/// Only `Some` fields are written; `Some(None)` sets a nullable column to
/// NULL. `slug` accompanies a title change.
#[derive(Debug, Clone, Default)]
pub struct UpdateBlogParams {
    pub title: Option<String>,
    pub slug: Option<String>,
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

impl UpdateBlogParams {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.slug.is_none()
            && self.content.is_none()
            && self.excerpt.is_none()
            && self.featured_image.is_none()
            && self.category.is_none()
            && self.tags.is_none()
            && self.meta_title.is_none()
            && self.meta_description.is_none()
            && self.status.is_none()
            && self.published_at.is_none()
    }
}

#[async_trait]
pub trait BlogsWriteRepo: Send + Sync {
    async fn create_blog(&self, params: CreateBlogParams) -> Result<BlogRecord, RepoError>;

    async fn update_blog(
        &self,
        id: i64,
        params: UpdateBlogParams,
    ) -> Result<Option<BlogRecord>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogRecord>, RepoError>;

    /// Whether another blog (not `exclude_id`) already uses `slug`.
    async fn slug_taken(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateContactParams {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

#[async_trait]
pub trait ContactsWriteRepo: Send + Sync {
    async fn create_contact(&self, params: CreateContactParams)
    -> Result<ContactRecord, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateFranchiseParams {
    pub contact_person: String,
    pub business_name: Option<String>,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub state: Option<String>,
    pub investment_capacity: Option<i64>,
    pub message: Option<String>,
    pub status: i16,
}

#[derive(Debug, Clone)]
pub struct UpdateFranchiseStatusParams {
    pub id: i64,
    pub status: i16,
    pub notes: Option<String>,
    pub assigned_to: Option<i64>,
}

#[async_trait]
pub trait FranchiseWriteRepo: Send + Sync {
    async fn create_franchise(
        &self,
        params: CreateFranchiseParams,
    ) -> Result<FranchiseRecord, RepoError>;

    async fn update_franchise_status(
        &self,
        params: UpdateFranchiseStatusParams,
    ) -> Result<Option<FranchiseRecord>, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateSubscriptionParams {
    pub subscription_id: String,
    pub user_id: String,
    pub cms_user_id: Option<i64>,
    pub plan_id: String,
    pub base_amount: i64,
    pub discount_amount: i64,
    pub total_amount: i64,
    pub coupon_code: Option<String>,
    pub discount_type: Option<String>,
    pub razorpay_order_id: Option<String>,
}

#[async_trait]
pub trait SubscriptionsWriteRepo: Send + Sync {
    /// A reused `subscription_id` fails with [`RepoError::Duplicate`].
    async fn create_subscription(
        &self,
        params: CreateSubscriptionParams,
    ) -> Result<SubscriptionRecord, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateUserDetailsParams {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub dob: Option<Date>,
    pub gender: Option<String>,
    pub cms_user_id: Option<i64>,
    pub source: Option<String>,
    pub otp_verified: bool,
}

#[async_trait]
pub trait UserDetailsWriteRepo: Send + Sync {
    async fn create_user_details(
        &self,
        params: CreateUserDetailsParams,
    ) -> Result<UserDetailsRecord, RepoError>;
}

/// Every repository the application services need from one storage backend.
pub trait Repositories:
    ListingRepo<CareerRecord>
    + RecordRepo<CareerRecord>
    + CareersWriteRepo
    + ListingRepo<BlogRecord>
    + RecordRepo<BlogRecord>
    + BlogsWriteRepo
    + ListingRepo<ContactRecord>
    + ContactsWriteRepo
    + ListingRepo<FranchiseRecord>
    + RecordRepo<FranchiseRecord>
    + FranchiseWriteRepo
    + ListingRepo<PaymentRecord>
    + ListingRepo<UserLoginRecord>
    + ListingRepo<UserRecord>
    + ListingRepo<SubscriptionRecord>
    + SubscriptionsWriteRepo
    + UserDetailsWriteRepo
    + 'static
{
}

impl<T> Repositories for T where
    T: ListingRepo<CareerRecord>
        + RecordRepo<CareerRecord>
        + CareersWriteRepo
        + ListingRepo<BlogRecord>
        + RecordRepo<BlogRecord>
        + BlogsWriteRepo
        + ListingRepo<ContactRecord>
        + ContactsWriteRepo
        + ListingRepo<FranchiseRecord>
        + RecordRepo<FranchiseRecord>
        + FranchiseWriteRepo
        + ListingRepo<PaymentRecord>
        + ListingRepo<UserLoginRecord>
        + ListingRepo<UserRecord>
        + ListingRepo<SubscriptionRecord>
        + SubscriptionsWriteRepo
        + UserDetailsWriteRepo
        + 'static
{
}
