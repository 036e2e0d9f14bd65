//! Registered app users, listed without credentials.

use time::Date;

use crate::application::filters::{FilterField, FilterSet, FilterSource, PredicateKind};
use crate::application::resource::{ListingService, Resource};
use crate::cache::CacheModule;
use crate::domain::entities::UserRecord;

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<i64>,
    pub email_verified: Option<bool>,
    pub search: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

impl FilterSource for UserFilter {
    const FIELDS: &'static [FilterField] = &[
        FilterField::new("email", PredicateKind::Substring("email")),
        FilterField::new("phone", PredicateKind::Substring("phone")),
        FilterField::new("status", PredicateKind::Exact("status")),
        FilterField::new("email_verified", PredicateKind::Exact("email_verified")),
        FilterField::new(
            "search",
            PredicateKind::AnySubstring(&["first_name", "last_name", "email"]),
        ),
        FilterField::new("start_date", PredicateKind::DateFrom("created_at")),
        FilterField::new("end_date", PredicateKind::DateTo("created_at")),
    ];

    fn filter_set(&self) -> FilterSet {
        FilterSet::new()
            .text("email", self.email.as_deref())
            .text("phone", self.phone.as_deref())
            .int("status", self.status)
            .flag("email_verified", self.email_verified)
            .text("search", self.search.as_deref())
            .date("start_date", self.start_date)
            .date("end_date", self.end_date)
    }
}

impl Resource for UserRecord {
    type Filter = UserFilter;

    const MODULE: CacheModule = CacheModule::Users;
    const SINGULAR: &'static str = "user";
    const PLURAL: &'static str = "users";
}

pub type UserService = ListingService<UserRecord>;
