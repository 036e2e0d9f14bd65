//! Franchise inquiries: public intake and the admin follow-up pipeline.

use std::sync::Arc;

use time::Date;

use crate::application::error::ServiceError;
use crate::application::filters::{FilterField, FilterSet, FilterSource, PredicateKind};
use crate::application::pagination::{ListPage, PageWindow};
use crate::application::repos::{
    CreateFranchiseParams, FranchiseWriteRepo, ListingRepo, RecordRepo,
    UpdateFranchiseStatusParams,
};
use crate::application::resource::{ListingService, RecordService, Resource};
use crate::cache::{CacheModule, CacheService};
use crate::domain::entities::FranchiseRecord;
use crate::domain::error::{DomainError, ensure_present};
use crate::domain::types::FranchiseStatus;

#[derive(Debug, Clone, Default)]
pub struct FranchiseFilter {
    pub status: Option<i64>,
    pub assigned_to: Option<i64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub search: Option<String>,
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
    pub investment_capacity_min: Option<i64>,
    pub investment_capacity_max: Option<i64>,
}

impl FilterSource for FranchiseFilter {
    const FIELDS: &'static [FilterField] = &[
        FilterField::new("status", PredicateKind::Exact("status")),
        FilterField::new("assigned_to", PredicateKind::Exact("assigned_to")),
        FilterField::new("city", PredicateKind::Substring("city")),
        FilterField::new("state", PredicateKind::Substring("state")),
        FilterField::new(
            "search",
            PredicateKind::AnySubstring(&["business_name", "contact_person", "email", "phone"]),
        ),
        FilterField::new("date_from", PredicateKind::DateFrom("created_at")),
        FilterField::new("date_to", PredicateKind::DateTo("created_at")),
        FilterField::new(
            "investment_capacity_min",
            PredicateKind::AtLeast("investment_capacity"),
        ),
        FilterField::new(
            "investment_capacity_max",
            PredicateKind::AtMost("investment_capacity"),
        ),
    ];

    fn filter_set(&self) -> FilterSet {
        FilterSet::new()
            .int("status", self.status)
            .int("assigned_to", self.assigned_to)
            .text("city", self.city.as_deref())
            .text("state", self.state.as_deref())
            .text("search", self.search.as_deref())
            .date("date_from", self.date_from)
            .date("date_to", self.date_to)
            .int("investment_capacity_min", self.investment_capacity_min)
            .int("investment_capacity_max", self.investment_capacity_max)
    }
}

impl Resource for FranchiseRecord {
    type Filter = FranchiseFilter;

    const MODULE: CacheModule = CacheModule::Franchise;
    const SINGULAR: &'static str = "franchise";
    const PLURAL: &'static str = "franchiseInquiries";
}

#[derive(Debug, Clone, Default)]
pub struct CreateFranchiseCommand {
    pub contact_person: String,
    pub business_name: Option<String>,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub state: Option<String>,
    pub investment_capacity: Option<i64>,
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateFranchiseStatusCommand {
    pub status: i16,
    pub notes: Option<String>,
    pub assigned_to: Option<i64>,
}

#[derive(Clone)]
pub struct FranchiseService {
    listing: ListingService<FranchiseRecord>,
    records: RecordService<FranchiseRecord>,
    writer: Arc<dyn FranchiseWriteRepo>,
}

impl FranchiseService {
    pub fn new(
        reader: Arc<dyn ListingRepo<FranchiseRecord>>,
        records: Arc<dyn RecordRepo<FranchiseRecord>>,
        writer: Arc<dyn FranchiseWriteRepo>,
        cache: Arc<CacheService>,
    ) -> Self {
        Self {
            listing: ListingService::new(reader, Arc::clone(&cache)),
            records: RecordService::new(records, cache),
            writer,
        }
    }

    pub async fn list(
        &self,
        window: PageWindow,
        filter: &FranchiseFilter,
    ) -> Result<ListPage<FranchiseRecord>, ServiceError> {
        self.listing.list(window, filter).await
    }

    pub async fn export(
        &self,
        filter: &FranchiseFilter,
    ) -> Result<Vec<FranchiseRecord>, ServiceError> {
        self.listing.export(filter).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<FranchiseRecord, ServiceError> {
        self.records.get_by_id(id).await
    }

    pub async fn create(
        &self,
        command: CreateFranchiseCommand,
    ) -> Result<FranchiseRecord, ServiceError> {
        ensure_present(&command.contact_person, "contact_person")?;
        ensure_present(&command.email, "email")?;
        ensure_present(&command.phone, "phone")?;
        ensure_present(&command.city, "city")?;
        if command.investment_capacity.is_some_and(|amount| amount < 0) {
            return Err(DomainError::validation("`investment_capacity` must not be negative").into());
        }

        let params = CreateFranchiseParams {
            contact_person: command.contact_person.trim().to_string(),
            business_name: command.business_name,
            email: command.email.trim().to_string(),
            phone: command.phone.trim().to_string(),
            city: command.city.trim().to_string(),
            state: command.state,
            investment_capacity: command.investment_capacity,
            message: command.message,
            status: FranchiseStatus::New.code(),
        };

        let inquiry = self
            .writer
            .create_franchise(params)
            .await
            .map_err(|err| ServiceError::persistence("save", "franchise inquiry", err))?;
        self.records.invalidate(inquiry.id);
        Ok(inquiry)
    }

    pub async fn update_status(
        &self,
        id: i64,
        command: UpdateFranchiseStatusCommand,
    ) -> Result<FranchiseRecord, ServiceError> {
        if self.records.find_uncached(id).await?.is_none() {
            return Err(ServiceError::not_found(FranchiseRecord::SINGULAR));
        }
        let status = FranchiseStatus::try_from(command.status)?;

        let updated = self
            .writer
            .update_franchise_status(UpdateFranchiseStatusParams {
                id,
                status: status.code(),
                notes: command.notes,
                assigned_to: command.assigned_to,
            })
            .await
            .map_err(|err| ServiceError::persistence("update", FranchiseRecord::SINGULAR, err))?;
        self.records.invalidate(id);
        updated.ok_or_else(|| ServiceError::not_found(FranchiseRecord::SINGULAR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn investment_range_maps_to_two_bounds() {
        let filter = FranchiseFilter {
            investment_capacity_min: Some(0),
            investment_capacity_max: Some(2_500_000),
            ..Default::default()
        };
        let query = crate::application::filters::ListQuery::from_source(&filter);
        assert_eq!(
            query.clause().sql(),
            "WHERE 1=1 AND investment_capacity >= ? AND investment_capacity <= ?"
        );
    }
}
