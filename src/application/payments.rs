//! Payment transactions: admin listing and export.

use time::Date;

use crate::application::filters::{FilterField, FilterSet, FilterSource, PredicateKind};
use crate::application::resource::{ListingService, Resource};
use crate::cache::CacheModule;
use crate::domain::entities::PaymentRecord;

/// Amount bounds are in minor currency units.
#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    pub user_id: Option<i64>,
    pub user_email: Option<String>,
    pub transaction_id: Option<String>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
    pub payment_gateway: Option<String>,
    pub subscription_id: Option<String>,
    pub min_amount: Option<i64>,
    pub max_amount: Option<i64>,
    pub search: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

impl FilterSource for PaymentFilter {
    const FIELDS: &'static [FilterField] = &[
        FilterField::new("user_id", PredicateKind::Exact("user_id")),
        FilterField::new("user_email", PredicateKind::Substring("user_email")),
        FilterField::new("transaction_id", PredicateKind::Substring("transaction_id")),
        FilterField::new("status", PredicateKind::Exact("status")),
        FilterField::new("payment_method", PredicateKind::Exact("payment_method")),
        FilterField::new("payment_gateway", PredicateKind::Exact("payment_gateway")),
        FilterField::new("subscription_id", PredicateKind::Exact("subscription_id")),
        FilterField::new("min_amount", PredicateKind::AtLeast("amount")),
        FilterField::new("max_amount", PredicateKind::AtMost("amount")),
        FilterField::new(
            "search",
            PredicateKind::AnySubstring(&["user_email", "transaction_id", "payment_method"]),
        ),
        FilterField::new("start_date", PredicateKind::DateFrom("created_at")),
        FilterField::new("end_date", PredicateKind::DateTo("created_at")),
    ];

    fn filter_set(&self) -> FilterSet {
        FilterSet::new()
            .int("user_id", self.user_id)
            .text("user_email", self.user_email.as_deref())
            .text("transaction_id", self.transaction_id.as_deref())
            .text("status", self.status.as_deref())
            .text("payment_method", self.payment_method.as_deref())
            .text("payment_gateway", self.payment_gateway.as_deref())
            .text("subscription_id", self.subscription_id.as_deref())
            .int("min_amount", self.min_amount)
            .int("max_amount", self.max_amount)
            .text("search", self.search.as_deref())
            .date("start_date", self.start_date)
            .date("end_date", self.end_date)
    }
}

impl Resource for PaymentRecord {
    type Filter = PaymentFilter;

    const MODULE: CacheModule = CacheModule::Payments;
    const SINGULAR: &'static str = "payment";
    const PLURAL: &'static str = "payments";
}

pub type PaymentService = ListingService<PaymentRecord>;
