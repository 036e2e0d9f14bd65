//! Plan subscriptions, keyed by the gateway subscription id.
//!
//! The brand website records a subscription when checkout starts; admins
//! list them. `total_amount` is always derived as base minus discount.

use std::sync::Arc;

use time::Date;

use crate::application::error::ServiceError;
use crate::application::filters::{FilterField, FilterSet, FilterSource, PredicateKind};
use crate::application::pagination::{ListPage, PageWindow};
use crate::application::repos::{CreateSubscriptionParams, ListingRepo, SubscriptionsWriteRepo};
use crate::application::resource::{ListingService, Resource};
use crate::cache::{CacheModule, CacheService};
use crate::domain::entities::SubscriptionRecord;
use crate::domain::error::{DomainError, ensure_present};
use crate::domain::types::DiscountType;

#[derive(Debug, Clone, Default)]
pub struct SubscriptionFilter {
    pub user_id: Option<String>,
    pub cms_user_id: Option<i64>,
    pub plan_id: Option<String>,
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub search: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

impl FilterSource for SubscriptionFilter {
    const FIELDS: &'static [FilterField] = &[
        FilterField::new("user_id", PredicateKind::Exact("user_id")),
        FilterField::new("cms_user_id", PredicateKind::Exact("cms_user_id")),
        FilterField::new("plan_id", PredicateKind::Exact("plan_id")),
        FilterField::new("status", PredicateKind::Exact("status")),
        FilterField::new("payment_status", PredicateKind::Exact("payment_status")),
        FilterField::new(
            "search",
            PredicateKind::AnySubstring(&["user_id", "plan_id", "subscription_id"]),
        ),
        FilterField::new("start_date", PredicateKind::DateFrom("created_at")),
        FilterField::new("end_date", PredicateKind::DateTo("created_at")),
    ];

    fn filter_set(&self) -> FilterSet {
        FilterSet::new()
            .text("user_id", self.user_id.as_deref())
            .int("cms_user_id", self.cms_user_id)
            .text("plan_id", self.plan_id.as_deref())
            .text("status", self.status.as_deref())
            .text("payment_status", self.payment_status.as_deref())
            .text("search", self.search.as_deref())
            .date("start_date", self.start_date)
            .date("end_date", self.end_date)
    }
}

impl Resource for SubscriptionRecord {
    type Filter = SubscriptionFilter;

    const MODULE: CacheModule = CacheModule::Subscriptions;
    const SINGULAR: &'static str = "subscription";
    const PLURAL: &'static str = "subscriptions";
}

#[derive(Debug, Clone, Default)]
pub struct CreateSubscriptionCommand {
    pub subscription_id: String,
    pub user_id: String,
    pub cms_user_id: Option<i64>,
    pub plan_id: String,
    pub base_amount: i64,
    pub discount_amount: Option<i64>,
    pub coupon_code: Option<String>,
    pub discount_type: Option<String>,
    pub razorpay_order_id: Option<String>,
}

#[derive(Clone)]
pub struct SubscriptionService {
    listing: ListingService<SubscriptionRecord>,
    writer: Arc<dyn SubscriptionsWriteRepo>,
    cache: Arc<CacheService>,
}

impl SubscriptionService {
    pub fn new(
        reader: Arc<dyn ListingRepo<SubscriptionRecord>>,
        writer: Arc<dyn SubscriptionsWriteRepo>,
        cache: Arc<CacheService>,
    ) -> Self {
        Self {
            listing: ListingService::new(reader, Arc::clone(&cache)),
            writer,
            cache,
        }
    }

    pub async fn list(
        &self,
        window: PageWindow,
        filter: &SubscriptionFilter,
    ) -> Result<ListPage<SubscriptionRecord>, ServiceError> {
        self.listing.list(window, filter).await
    }

    pub async fn create(
        &self,
        command: CreateSubscriptionCommand,
    ) -> Result<SubscriptionRecord, ServiceError> {
        let params = validate_create(command)?;
        let subscription = self
            .writer
            .create_subscription(params)
            .await
            .map_err(|err| {
                ServiceError::persistence("create", SubscriptionRecord::SINGULAR, err)
            })?;
        self.cache.invalidate_module(SubscriptionRecord::MODULE);
        Ok(subscription)
    }
}

fn validate_create(
    command: CreateSubscriptionCommand,
) -> Result<CreateSubscriptionParams, DomainError> {
    ensure_present(&command.subscription_id, "subscription_id")?;
    ensure_present(&command.user_id, "user_id")?;
    ensure_present(&command.plan_id, "plan_id")?;
    if command.base_amount <= 0 {
        return Err(DomainError::validation("`base_amount` must be greater than 0"));
    }
    let discount_amount = command.discount_amount.unwrap_or(0);
    if !(0..=command.base_amount).contains(&discount_amount) {
        return Err(DomainError::validation(
            "`discount_amount` must be between 0 and `base_amount`",
        ));
    }
    let discount_type = command
        .discount_type
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(DiscountType::parse)
        .transpose()?;

    Ok(CreateSubscriptionParams {
        subscription_id: command.subscription_id.trim().to_string(),
        user_id: command.user_id.trim().to_string(),
        cms_user_id: command.cms_user_id,
        plan_id: command.plan_id.trim().to_string(),
        base_amount: command.base_amount,
        discount_amount,
        total_amount: command.base_amount - discount_amount,
        coupon_code: command.coupon_code.filter(|code| !code.trim().is_empty()),
        discount_type: discount_type.map(|kind| kind.as_str().to_string()),
        razorpay_order_id: command.razorpay_order_id,
    })
}
