//! Job postings: admin CRUD plus the public listing of active roles.

use std::sync::Arc;

use crate::application::error::ServiceError;
use crate::application::filters::{FilterField, FilterSet, FilterSource, PredicateKind};
use crate::application::pagination::{ListPage, PageWindow};
use crate::application::repos::{
    CareersWriteRepo, CreateCareerParams, ListingRepo, RecordRepo, UpdateCareerParams,
};
use crate::application::resource::{ListingService, RecordService, Resource};
use crate::cache::{CacheModule, CacheService};
use crate::domain::entities::CareerRecord;
use crate::domain::error::{DomainError, ensure_present};
use crate::domain::types::{CareerStatus, ExperienceLevel, JobType};

#[derive(Debug, Clone, Default)]
pub struct CareerFilter {
    pub status: Option<i64>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub posted_by: Option<i64>,
    pub search: Option<String>,
}

impl FilterSource for CareerFilter {
    const FIELDS: &'static [FilterField] = &[
        FilterField::new("status", PredicateKind::Exact("status")),
        FilterField::new("location", PredicateKind::Substring("location")),
        FilterField::new("job_type", PredicateKind::Exact("job_type")),
        FilterField::new("experience_level", PredicateKind::Exact("experience_level")),
        FilterField::new("posted_by", PredicateKind::Exact("posted_by")),
        FilterField::new(
            "search",
            PredicateKind::AnySubstring(&["title", "description"]),
        ),
    ];

    fn filter_set(&self) -> FilterSet {
        FilterSet::new()
            .int("status", self.status)
            .text("location", self.location.as_deref())
            .text("job_type", self.job_type.as_deref())
            .text("experience_level", self.experience_level.as_deref())
            .int("posted_by", self.posted_by)
            .text("search", self.search.as_deref())
    }
}

impl Resource for CareerRecord {
    type Filter = CareerFilter;

    const MODULE: CacheModule = CacheModule::Careers;
    const SINGULAR: &'static str = "career";
    const PLURAL: &'static str = "careers";
}

#[derive(Debug, Clone, Default)]
pub struct CreateCareerCommand {
    pub title: String,
    pub description: String,
    pub location: String,
    pub job_type: String,
    pub experience_level: String,
    pub salary_range: Option<String>,
    pub requirements: String,
    pub responsibilities: String,
    pub benefits: Option<String>,
    pub status: Option<i16>,
    pub posted_by: i64,
}

#[derive(Clone)]
pub struct CareerService {
    listing: ListingService<CareerRecord>,
    records: RecordService<CareerRecord>,
    writer: Arc<dyn CareersWriteRepo>,
}

impl CareerService {
    pub fn new(
        reader: Arc<dyn ListingRepo<CareerRecord>>,
        records: Arc<dyn RecordRepo<CareerRecord>>,
        writer: Arc<dyn CareersWriteRepo>,
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
        filter: &CareerFilter,
    ) -> Result<ListPage<CareerRecord>, ServiceError> {
        self.listing.list(window, filter).await
    }

    /// Public listing; always restricted to active postings.
    pub async fn list_active(
        &self,
        window: PageWindow,
        filter: &CareerFilter,
    ) -> Result<ListPage<CareerRecord>, ServiceError> {
        let filter = CareerFilter {
            status: Some(CareerStatus::Active.code().into()),
            ..filter.clone()
        };
        self.listing.list(window, &filter).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<CareerRecord, ServiceError> {
        self.records.get_by_id(id).await
    }

    /// Inactive and draft postings read as missing.
    pub async fn get_active_by_id(&self, id: i64) -> Result<CareerRecord, ServiceError> {
        let career = self.records.get_by_id(id).await?;
        if career.status == CareerStatus::Active.code() {
            Ok(career)
        } else {
            Err(ServiceError::not_found(CareerRecord::SINGULAR))
        }
    }

    pub async fn create(&self, command: CreateCareerCommand) -> Result<CareerRecord, ServiceError> {
        let params = validate_create(command)?;
        let career = self
            .writer
            .create_career(params)
            .await
            .map_err(|err| ServiceError::persistence("create", CareerRecord::SINGULAR, err))?;
        self.records.invalidate(career.id);
        Ok(career)
    }

    pub async fn update(
        &self,
        id: i64,
        params: UpdateCareerParams,
    ) -> Result<CareerRecord, ServiceError> {
        if self.records.find_uncached(id).await?.is_none() {
            return Err(ServiceError::not_found(CareerRecord::SINGULAR));
        }
        let params = validate_update(params)?;

        let updated = self
            .writer
            .update_career(id, params)
            .await
            .map_err(|err| ServiceError::persistence("update", CareerRecord::SINGULAR, err))?;
        self.records.invalidate(id);
        updated.ok_or_else(|| ServiceError::not_found(CareerRecord::SINGULAR))
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.records.delete(id).await
    }
}

fn validate_create(command: CreateCareerCommand) -> Result<CreateCareerParams, DomainError> {
    ensure_present(&command.title, "title")?;
    ensure_present(&command.description, "description")?;
    ensure_present(&command.location, "location")?;
    ensure_present(&command.job_type, "job_type")?;
    ensure_present(&command.experience_level, "experience_level")?;
    ensure_present(&command.requirements, "requirements")?;
    ensure_present(&command.responsibilities, "responsibilities")?;

    let job_type = JobType::parse(command.job_type.trim())?;
    let experience_level = ExperienceLevel::parse(command.experience_level.trim())?;
    let status = match command.status {
        Some(code) => CareerStatus::try_from(code)?,
        None => CareerStatus::Active,
    };

    Ok(CreateCareerParams {
        title: command.title.trim().to_string(),
        description: command.description,
        location: command.location.trim().to_string(),
        job_type: job_type.as_str().to_string(),
        experience_level: experience_level.as_str().to_string(),
        salary_range: command.salary_range,
        requirements: command.requirements,
        responsibilities: command.responsibilities,
        benefits: command.benefits,
        status: status.code(),
        posted_by: command.posted_by,
    })
}

fn validate_update(mut params: UpdateCareerParams) -> Result<UpdateCareerParams, DomainError> {
    if params.is_empty() {
        return Err(DomainError::validation("No fields to update"));
    }
    if let Some(title) = &params.title {
        ensure_present(title, "title")?;
    }
    if let Some(job_type) = params.job_type.take() {
        params.job_type = Some(JobType::parse(job_type.trim())?.as_str().to_string());
    }
    if let Some(level) = params.experience_level.take() {
        params.experience_level = Some(ExperienceLevel::parse(level.trim())?.as_str().to_string());
    }
    if let Some(code) = params.status {
        CareerStatus::try_from(code)?;
    }
    Ok(params)
}
