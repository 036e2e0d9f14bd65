//! In-memory repositories shared by the integration tests.
//!
//! Filters are evaluated against the record's JSON form using the same
//! `FilterSource::FIELDS` declarations the SQL clause is built from.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use serde_json::{Map, Value};
use time::format_description::well_known::Rfc3339;
use time::{Date, Duration, OffsetDateTime};
use tokio::sync::Mutex;

use drivefitt::application::filters::{FilterSource, FilterValue, ListQuery, PredicateKind};
use drivefitt::application::pagination::PageWindow;
use drivefitt::application::repos::{
    BlogsWriteRepo, CareersWriteRepo, ContactsWriteRepo, CreateBlogParams, CreateCareerParams,
    CreateContactParams, CreateFranchiseParams, CreateSubscriptionParams, CreateUserDetailsParams,
    FranchiseWriteRepo, ListingRepo, RecordRepo, RepoError, SubscriptionsWriteRepo,
    UpdateBlogParams, UpdateCareerParams, UpdateFranchiseStatusParams, UserDetailsWriteRepo,
};
use drivefitt::application::resource::Resource;
use drivefitt::application::services::Services;
use drivefitt::cache::{CacheConfig, CacheService};
use drivefitt::infra::error::InfraError;
use drivefitt::infra::http::{AdminToken, HealthCheck, HttpState, build_router};
use drivefitt::domain::entities::{
    BlogRecord, CareerRecord, ContactRecord, FranchiseRecord, PaymentRecord, SubscriptionRecord,
    UserDetailsRecord, UserLoginRecord, UserRecord,
};

#[derive(Default)]
pub struct Calls {
    pub list: AtomicUsize,
    pub count: AtomicUsize,
    pub export: AtomicUsize,
    pub find: AtomicUsize,
}

impl Calls {
    pub fn list(&self) -> usize {
        self.list.load(Ordering::SeqCst)
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn find(&self) -> usize {
        self.find.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct MemoryRepos {
    pub careers: Mutex<Vec<CareerRecord>>,
    pub blogs: Mutex<Vec<BlogRecord>>,
    pub contacts: Mutex<Vec<ContactRecord>>,
    pub franchise: Mutex<Vec<FranchiseRecord>>,
    pub payments: Mutex<Vec<PaymentRecord>>,
    pub user_logins: Mutex<Vec<UserLoginRecord>>,
    pub users: Mutex<Vec<UserRecord>>,
    pub subscriptions: Mutex<Vec<SubscriptionRecord>>,
    pub user_details: Mutex<Vec<UserDetailsRecord>>,
    pub calls: Calls,
    /// When set, `count` fails with a persistence error.
    pub fail_count: AtomicBool,
    next_id: AtomicI64,
}

impl MemoryRepos {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Monotonic id and a `created_at` one second after the previous row.
    pub fn next_stamp(&self) -> (i64, OffsetDateTime) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        (id, stamp(id))
    }

    pub async fn seed_career(&self, title: &str, status: i16) -> CareerRecord {
        let (id, at) = self.next_stamp();
        let record = CareerRecord {
            id,
            title: title.to_string(),
            description: format!("{title} description"),
            location: "Pune".to_string(),
            job_type: "Full-time".to_string(),
            experience_level: "Mid".to_string(),
            salary_range: None,
            requirements: "Certification".to_string(),
            responsibilities: "Coaching".to_string(),
            benefits: None,
            status,
            posted_by: 1,
            created_at: at,
            updated_at: at,
        };
        self.careers.lock().await.push(record.clone());
        record
    }

    pub async fn seed_payment(&self, email: &str, amount: i64, status: &str) -> PaymentRecord {
        let (id, at) = self.next_stamp();
        let record = PaymentRecord {
            id,
            transaction_id: format!("txn_{id}"),
            user_id: Some(id),
            user_email: Some(email.to_string()),
            user_name: None,
            amount,
            currency: "INR".to_string(),
            payment_method: "card".to_string(),
            payment_gateway: "razorpay".to_string(),
            gateway_transaction_id: None,
            status: status.to_string(),
            description: None,
            subscription_id: None,
            created_at: at,
            updated_at: at,
        };
        self.payments.lock().await.push(record.clone());
        record
    }

    pub async fn seed_user(&self, email: &str, email_verified: bool) -> UserRecord {
        let (id, at) = self.next_stamp();
        let record = UserRecord {
            id,
            email: email.to_string(),
            phone: None,
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            gender: None,
            status: 1,
            email_verified,
            phone_verified: false,
            last_login_at: None,
            created_at: at,
            updated_at: at,
        };
        self.users.lock().await.push(record.clone());
        record
    }
}

pub fn stamp(offset_seconds: i64) -> OffsetDateTime {
    OffsetDateTime::UNIX_EPOCH + Duration::days(20_000) + Duration::seconds(offset_seconds)
}

pub fn cache() -> Arc<CacheService> {
    Arc::new(CacheService::in_memory(&CacheConfig::default()))
}

pub fn services() -> (Arc<MemoryRepos>, Services) {
    let repos = MemoryRepos::new();
    let services = Services::new(repos.clone(), cache());
    (repos, services)
}

pub const ADMIN_TOKEN: &str = "front-desk-secret";

pub struct StaticHealth(pub bool);

#[async_trait]
impl HealthCheck for StaticHealth {
    async fn check(&self) -> Result<(), InfraError> {
        if self.0 {
            Ok(())
        } else {
            Err(InfraError::database("connection refused"))
        }
    }
}

/// Router over fresh in-memory repositories, admin token [`ADMIN_TOKEN`].
pub fn app() -> (Arc<MemoryRepos>, Router) {
    let (repos, services) = services();
    let state = HttpState::new(
        services,
        Arc::new(StaticHealth(true)),
        AdminToken::from_secret(ADMIN_TOKEN),
    );
    (repos, build_router(state))
}

/// Record types the fake can store.
pub trait Stored: Resource {
    fn table(repos: &MemoryRepos) -> &Mutex<Vec<Self>>;
    fn created_at(&self) -> OffsetDateTime;
}

pub trait Keyed: Stored {
    fn id(&self) -> i64;
}

macro_rules! stored {
    ($record:ty, $field:ident) => {
        impl Stored for $record {
            fn table(repos: &MemoryRepos) -> &Mutex<Vec<Self>> {
                &repos.$field
            }

            fn created_at(&self) -> OffsetDateTime {
                self.created_at
            }
        }
    };
    ($record:ty, $field:ident, keyed) => {
        stored!($record, $field);

        impl Keyed for $record {
            fn id(&self) -> i64 {
                self.id
            }
        }
    };
}

stored!(CareerRecord, careers, keyed);
stored!(BlogRecord, blogs, keyed);
stored!(ContactRecord, contacts);
stored!(FranchiseRecord, franchise, keyed);
stored!(PaymentRecord, payments);
stored!(UserLoginRecord, user_logins);
stored!(UserRecord, users);
stored!(SubscriptionRecord, subscriptions);

async fn matching<R: Stored>(repos: &MemoryRepos, query: &ListQuery) -> Vec<R> {
    let rows = R::table(repos).lock().await;
    let mut matched: Vec<R> = rows
        .iter()
        .filter(|record| matches(*record, query))
        .cloned()
        .collect();
    matched.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    matched
}

pub fn matches<R: Resource>(record: &R, query: &ListQuery) -> bool {
    let Ok(Value::Object(row)) = serde_json::to_value(record) else {
        return false;
    };
    <R::Filter as FilterSource>::FIELDS
        .iter()
        .all(|field| match query.filters().get(field.key) {
            Some(value) => holds(&row, field.kind, value),
            None => true,
        })
}

fn holds(row: &Map<String, Value>, kind: PredicateKind, value: &FilterValue) -> bool {
    match kind {
        PredicateKind::Exact(column) => equals(row.get(column), value),
        PredicateKind::Substring(column) => contains(row.get(column), value),
        PredicateKind::AnySubstring(columns) => {
            columns.iter().any(|column| contains(row.get(*column), value))
        }
        PredicateKind::DateFrom(column) => {
            compare_dates(row.get(column), value, |day, bound| day >= bound)
        }
        PredicateKind::DateTo(column) => {
            compare_dates(row.get(column), value, |day, bound| day <= bound)
        }
        PredicateKind::AtLeast(column) => {
            compare_ints(row.get(column), value, |cell, bound| cell >= bound)
        }
        PredicateKind::AtMost(column) => {
            compare_ints(row.get(column), value, |cell, bound| cell <= bound)
        }
        PredicateKind::ContainsTags(column) => {
            let FilterValue::Tags(tags) = value else {
                return false;
            };
            let Some(present) = row.get(column).and_then(Value::as_array) else {
                return false;
            };
            tags.iter()
                .all(|tag| present.iter().any(|cell| cell.as_str() == Some(tag.as_str())))
        }
    }
}

fn equals(cell: Option<&Value>, value: &FilterValue) -> bool {
    let Some(cell) = cell else {
        return false;
    };
    match value {
        FilterValue::Text(text) => cell.as_str() == Some(text.as_str()),
        FilterValue::Int(number) => cell.as_i64() == Some(*number),
        FilterValue::Bool(flag) => cell.as_bool() == Some(*flag),
        _ => false,
    }
}

fn contains(cell: Option<&Value>, value: &FilterValue) -> bool {
    let needle = match value {
        FilterValue::Text(text) => text.to_lowercase(),
        FilterValue::Int(number) => number.to_string(),
        _ => return false,
    };
    cell.and_then(Value::as_str)
        .is_some_and(|text| text.to_lowercase().contains(&needle))
}

fn compare_dates(cell: Option<&Value>, value: &FilterValue, check: fn(Date, Date) -> bool) -> bool {
    let FilterValue::Date(bound) = value else {
        return false;
    };
    cell.and_then(Value::as_str)
        .and_then(|raw| OffsetDateTime::parse(raw, &Rfc3339).ok())
        .is_some_and(|at| check(at.date(), *bound))
}

fn compare_ints(cell: Option<&Value>, value: &FilterValue, check: fn(i64, i64) -> bool) -> bool {
    let FilterValue::Int(bound) = value else {
        return false;
    };
    cell.and_then(Value::as_i64)
        .is_some_and(|number| check(number, *bound))
}

#[async_trait]
impl<R: Stored> ListingRepo<R> for MemoryRepos {
    async fn list(&self, query: &ListQuery, window: PageWindow) -> Result<Vec<R>, RepoError> {
        self.calls.list.fetch_add(1, Ordering::SeqCst);
        let offset = usize::try_from(window.offset()).unwrap_or(0);
        Ok(matching::<R>(self, query)
            .await
            .into_iter()
            .skip(offset)
            .take(window.limit() as usize)
            .collect())
    }

    async fn count(&self, query: &ListQuery) -> Result<i64, RepoError> {
        self.calls.count.fetch_add(1, Ordering::SeqCst);
        if self.fail_count.load(Ordering::SeqCst) {
            return Err(RepoError::from_persistence("connection reset by peer"));
        }
        Ok(matching::<R>(self, query).await.len() as i64)
    }

    async fn export(&self, query: &ListQuery) -> Result<Vec<R>, RepoError> {
        self.calls.export.fetch_add(1, Ordering::SeqCst);
        Ok(matching::<R>(self, query).await)
    }
}

#[async_trait]
impl<R: Keyed> RecordRepo<R> for MemoryRepos {
    async fn find_by_id(&self, id: i64) -> Result<Option<R>, RepoError> {
        self.calls.find.fetch_add(1, Ordering::SeqCst);
        let rows = R::table(self).lock().await;
        Ok(rows.iter().find(|record| record.id() == id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        let mut rows = R::table(self).lock().await;
        let before = rows.len();
        rows.retain(|record| record.id() != id);
        Ok(rows.len() != before)
    }
}

#[async_trait]
impl CareersWriteRepo for MemoryRepos {
    async fn create_career(&self, params: CreateCareerParams) -> Result<CareerRecord, RepoError> {
        let (id, at) = self.next_stamp();
        let record = CareerRecord {
            id,
            title: params.title,
            description: params.description,
            location: params.location,
            job_type: params.job_type,
            experience_level: params.experience_level,
            salary_range: params.salary_range,
            requirements: params.requirements,
            responsibilities: params.responsibilities,
            benefits: params.benefits,
            status: params.status,
            posted_by: params.posted_by,
            created_at: at,
            updated_at: at,
        };
        self.careers.lock().await.push(record.clone());
        Ok(record)
    }

    async fn update_career(
        &self,
        id: i64,
        params: UpdateCareerParams,
    ) -> Result<Option<CareerRecord>, RepoError> {
        let mut rows = self.careers.lock().await;
        let Some(record) = rows.iter_mut().find(|record| record.id == id) else {
            return Ok(None);
        };
        if let Some(title) = params.title {
            record.title = title;
        }
        if let Some(description) = params.description {
            record.description = description;
        }
        if let Some(location) = params.location {
            record.location = location;
        }
        if let Some(job_type) = params.job_type {
            record.job_type = job_type;
        }
        if let Some(level) = params.experience_level {
            record.experience_level = level;
        }
        if let Some(salary_range) = params.salary_range {
            record.salary_range = salary_range;
        }
        if let Some(requirements) = params.requirements {
            record.requirements = requirements;
        }
        if let Some(responsibilities) = params.responsibilities {
            record.responsibilities = responsibilities;
        }
        if let Some(benefits) = params.benefits {
            record.benefits = benefits;
        }
        if let Some(status) = params.status {
            record.status = status;
        }
        record.updated_at = record.updated_at + Duration::seconds(1);
        Ok(Some(record.clone()))
    }
}

#[async_trait]
impl BlogsWriteRepo for MemoryRepos {
    async fn create_blog(&self, params: CreateBlogParams) -> Result<BlogRecord, RepoError> {
        let mut rows = self.blogs.lock().await;
        if rows.iter().any(|blog| blog.slug == params.slug) {
            return Err(RepoError::Duplicate {
                constraint: "blogs_slug_key".to_string(),
            });
        }
        let (id, at) = self.next_stamp();
        let record = BlogRecord {
            id,
            title: params.title,
            slug: params.slug,
            content: params.content,
            excerpt: params.excerpt,
            featured_image: params.featured_image,
            author_id: params.author_id,
            category: params.category,
            tags: params.tags,
            meta_title: params.meta_title,
            meta_description: params.meta_description,
            status: params.status,
            published_at: params.published_at,
            created_at: at,
            updated_at: at,
        };
        rows.push(record.clone());
        Ok(record)
    }

    async fn update_blog(
        &self,
        id: i64,
        params: UpdateBlogParams,
    ) -> Result<Option<BlogRecord>, RepoError> {
        let mut rows = self.blogs.lock().await;
        let Some(record) = rows.iter_mut().find(|record| record.id == id) else {
            return Ok(None);
        };
        if let Some(title) = params.title {
            record.title = title;
        }
        if let Some(slug) = params.slug {
            record.slug = slug;
        }
        if let Some(content) = params.content {
            record.content = content;
        }
        if let Some(excerpt) = params.excerpt {
            record.excerpt = excerpt;
        }
        if let Some(image) = params.featured_image {
            record.featured_image = image;
        }
        if let Some(category) = params.category {
            record.category = category;
        }
        if let Some(tags) = params.tags {
            record.tags = tags;
        }
        if let Some(meta_title) = params.meta_title {
            record.meta_title = meta_title;
        }
        if let Some(meta_description) = params.meta_description {
            record.meta_description = meta_description;
        }
        if let Some(status) = params.status {
            record.status = status;
        }
        if let Some(published_at) = params.published_at {
            record.published_at = Some(published_at);
        }
        Ok(Some(record.clone()))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogRecord>, RepoError> {
        let rows = self.blogs.lock().await;
        Ok(rows.iter().find(|blog| blog.slug == slug).cloned())
    }

    async fn slug_taken(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool, RepoError> {
        let rows = self.blogs.lock().await;
        Ok(rows
            .iter()
            .any(|blog| blog.slug == slug && Some(blog.id) != exclude_id))
    }
}

#[async_trait]
impl ContactsWriteRepo for MemoryRepos {
    async fn create_contact(
        &self,
        params: CreateContactParams,
    ) -> Result<ContactRecord, RepoError> {
        let (id, at) = self.next_stamp();
        let record = ContactRecord {
            id,
            first_name: params.first_name,
            last_name: params.last_name,
            email: params.email,
            phone: params.phone,
            message: params.message,
            created_at: at,
            updated_at: at,
        };
        self.contacts.lock().await.push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl FranchiseWriteRepo for MemoryRepos {
    async fn create_franchise(
        &self,
        params: CreateFranchiseParams,
    ) -> Result<FranchiseRecord, RepoError> {
        let (id, at) = self.next_stamp();
        let record = FranchiseRecord {
            id,
            contact_person: params.contact_person,
            business_name: params.business_name,
            email: params.email,
            phone: params.phone,
            city: params.city,
            state: params.state,
            investment_capacity: params.investment_capacity,
            message: params.message,
            status: params.status,
            notes: None,
            assigned_to: None,
            created_at: at,
            updated_at: at,
        };
        self.franchise.lock().await.push(record.clone());
        Ok(record)
    }

    async fn update_franchise_status(
        &self,
        params: UpdateFranchiseStatusParams,
    ) -> Result<Option<FranchiseRecord>, RepoError> {
        let mut rows = self.franchise.lock().await;
        let Some(record) = rows.iter_mut().find(|record| record.id == params.id) else {
            return Ok(None);
        };
        record.status = params.status;
        if params.notes.is_some() {
            record.notes = params.notes;
        }
        if params.assigned_to.is_some() {
            record.assigned_to = params.assigned_to;
        }
        Ok(Some(record.clone()))
    }
}

#[async_trait]
impl SubscriptionsWriteRepo for MemoryRepos {
    async fn create_subscription(
        &self,
        params: CreateSubscriptionParams,
    ) -> Result<SubscriptionRecord, RepoError> {
        let mut rows = self.subscriptions.lock().await;
        if rows
            .iter()
            .any(|row| row.subscription_id == params.subscription_id)
        {
            return Err(RepoError::Duplicate {
                constraint: "subscriptions_pkey".to_string(),
            });
        }
        let (_, at) = self.next_stamp();
        let record = SubscriptionRecord {
            subscription_id: params.subscription_id,
            user_id: params.user_id,
            cms_user_id: params.cms_user_id,
            plan_id: params.plan_id,
            base_amount: params.base_amount,
            discount_amount: params.discount_amount,
            total_amount: params.total_amount,
            coupon_code: params.coupon_code,
            discount_type: params.discount_type,
            razorpay_order_id: params.razorpay_order_id,
            payment_status: "pending".to_string(),
            status: "inactive".to_string(),
            start_date: None,
            end_date: None,
            created_at: at,
            updated_at: at,
        };
        rows.push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl UserDetailsWriteRepo for MemoryRepos {
    async fn create_user_details(
        &self,
        params: CreateUserDetailsParams,
    ) -> Result<UserDetailsRecord, RepoError> {
        let (id, at) = self.next_stamp();
        let record = UserDetailsRecord {
            id,
            name: params.name,
            phone: params.phone,
            email: params.email,
            dob: params.dob,
            gender: params.gender,
            cms_user_id: params.cms_user_id,
            source: params.source,
            otp_verified: params.otp_verified,
            created_at: at,
        };
        self.user_details.lock().await.push(record.clone());
        Ok(record)
    }
}
