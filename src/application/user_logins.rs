//! App login audit trail: admin listing and export.

use time::Date;

use crate::application::filters::{FilterField, FilterSet, FilterSource, PredicateKind};
use crate::application::resource::{ListingService, Resource};
use crate::cache::CacheModule;
use crate::domain::entities::UserLoginRecord;

#[derive(Debug, Clone, Default)]
pub struct UserLoginFilter {
    pub email: Option<String>,
    pub device_type: Option<String>,
    pub platform: Option<String>,
    pub search: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

impl FilterSource for UserLoginFilter {
    const FIELDS: &'static [FilterField] = &[
        FilterField::new("email", PredicateKind::Substring("email")),
        FilterField::new("device_type", PredicateKind::Exact("device_type")),
        FilterField::new("platform", PredicateKind::Substring("platform")),
        FilterField::new(
            "search",
            PredicateKind::AnySubstring(&["email", "device_type", "platform"]),
        ),
        FilterField::new("start_date", PredicateKind::DateFrom("created_at")),
        FilterField::new("end_date", PredicateKind::DateTo("created_at")),
    ];

    fn filter_set(&self) -> FilterSet {
        FilterSet::new()
            .text("email", self.email.as_deref())
            .text("device_type", self.device_type.as_deref())
            .text("platform", self.platform.as_deref())
            .text("search", self.search.as_deref())
            .date("start_date", self.start_date)
            .date("end_date", self.end_date)
    }
}

impl Resource for UserLoginRecord {
    type Filter = UserLoginFilter;

    const MODULE: CacheModule = CacheModule::UserLogins;
    const SINGULAR: &'static str = "userLogin";
    const PLURAL: &'static str = "userLogins";
}

pub type UserLoginService = ListingService<UserLoginRecord>;
