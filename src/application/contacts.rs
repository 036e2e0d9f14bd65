//! "Contact us" submissions: public intake, admin listing and export.

use std::sync::Arc;

use time::Date;

use crate::application::error::ServiceError;
use crate::application::filters::{FilterField, FilterSet, FilterSource, PredicateKind};
use crate::application::pagination::{ListPage, PageWindow};
use crate::application::repos::{ContactsWriteRepo, CreateContactParams, ListingRepo};
use crate::application::resource::{ListingService, Resource};
use crate::cache::{CacheModule, CacheService};
use crate::domain::entities::ContactRecord;
use crate::domain::error::ensure_present;

#[derive(Debug, Clone, Default)]
pub struct ContactFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub search: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

impl FilterSource for ContactFilter {
    const FIELDS: &'static [FilterField] = &[
        FilterField::new("first_name", PredicateKind::Substring("first_name")),
        FilterField::new("last_name", PredicateKind::Substring("last_name")),
        FilterField::new("email", PredicateKind::Substring("email")),
        FilterField::new("phone", PredicateKind::Substring("phone")),
        FilterField::new(
            "search",
            PredicateKind::AnySubstring(&["first_name", "last_name", "email", "phone", "message"]),
        ),
        FilterField::new("start_date", PredicateKind::DateFrom("created_at")),
        FilterField::new("end_date", PredicateKind::DateTo("created_at")),
    ];

    fn filter_set(&self) -> FilterSet {
        FilterSet::new()
            .text("first_name", self.first_name.as_deref())
            .text("last_name", self.last_name.as_deref())
            .text("email", self.email.as_deref())
            .text("phone", self.phone.as_deref())
            .text("search", self.search.as_deref())
            .date("start_date", self.start_date)
            .date("end_date", self.end_date)
    }
}

impl Resource for ContactRecord {
    type Filter = ContactFilter;

    const MODULE: CacheModule = CacheModule::Contact;
    const SINGULAR: &'static str = "contact";
    const PLURAL: &'static str = "contactUs";
}

#[derive(Debug, Clone, Default)]
pub struct CreateContactCommand {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: String,
    pub message: Option<String>,
}

#[derive(Clone)]
pub struct ContactService {
    listing: ListingService<ContactRecord>,
    writer: Arc<dyn ContactsWriteRepo>,
    cache: Arc<CacheService>,
}

impl ContactService {
    pub fn new(
        reader: Arc<dyn ListingRepo<ContactRecord>>,
        writer: Arc<dyn ContactsWriteRepo>,
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
        filter: &ContactFilter,
    ) -> Result<ListPage<ContactRecord>, ServiceError> {
        self.listing.list(window, filter).await
    }

    pub async fn export(&self, filter: &ContactFilter) -> Result<Vec<ContactRecord>, ServiceError> {
        self.listing.export(filter).await
    }

    pub async fn create(
        &self,
        command: CreateContactCommand,
    ) -> Result<ContactRecord, ServiceError> {
        ensure_present(&command.first_name, "first_name")?;
        ensure_present(&command.phone, "phone")?;

        let params = CreateContactParams {
            first_name: command.first_name.trim().to_string(),
            last_name: trimmed_or_empty(command.last_name),
            email: trimmed_or_empty(command.email),
            phone: Some(command.phone.trim().to_string()),
            message: command.message.unwrap_or_default(),
        };

        let contact = self
            .writer
            .create_contact(params)
            .await
            .map_err(|err| ServiceError::persistence("save", "contact submission", err))?;
        self.cache.invalidate_module(ContactRecord::MODULE);
        Ok(contact)
    }
}

fn trimmed_or_empty(value: Option<String>) -> String {
    value
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}
