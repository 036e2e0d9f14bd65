use async_trait::async_trait;
use sqlx::QueryBuilder;
use time::OffsetDateTime;

use crate::application::repos::{
    CareersWriteRepo, CreateCareerParams, RepoError, UpdateCareerParams,
};
use crate::domain::entities::CareerRecord;

use super::PostgresRepositories;
use super::listing::{KeyedTable, Table};
use super::util::{map_sqlx_error, push_assignment};

const CAREER_COLUMNS: &str = "id, title, description, location, job_type, experience_level, \
    salary_range, requirements, responsibilities, benefits, status, posted_by, created_at, updated_at";

#[derive(sqlx::FromRow)]
pub struct CareerRow {
    id: i64,
    title: String,
    description: String,
    location: String,
    job_type: String,
    experience_level: String,
    salary_range: Option<String>,
    requirements: String,
    responsibilities: String,
    benefits: Option<String>,
    status: i16,
    posted_by: i64,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<CareerRow> for CareerRecord {
    fn from(row: CareerRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            location: row.location,
            job_type: row.job_type,
            experience_level: row.experience_level,
            salary_range: row.salary_range,
            requirements: row.requirements,
            responsibilities: row.responsibilities,
            benefits: row.benefits,
            status: row.status,
            posted_by: row.posted_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl Table for CareerRecord {
    const TABLE: &'static str = "careers";
    const COLUMNS: &'static str = CAREER_COLUMNS;

    type Row = CareerRow;
}

impl KeyedTable for CareerRecord {}

#[async_trait]
impl CareersWriteRepo for PostgresRepositories {
    async fn create_career(&self, params: CreateCareerParams) -> Result<CareerRecord, RepoError> {
        let mut qb = QueryBuilder::new(
            "INSERT INTO careers (title, description, location, job_type, experience_level, \
             salary_range, requirements, responsibilities, benefits, status, posted_by) ",
        );
        qb.push_values([params], |mut row, params| {
            row.push_bind(params.title)
                .push_bind(params.description)
                .push_bind(params.location)
                .push_bind(params.job_type)
                .push_bind(params.experience_level)
                .push_bind(params.salary_range)
                .push_bind(params.requirements)
                .push_bind(params.responsibilities)
                .push_bind(params.benefits)
                .push_bind(params.status)
                .push_bind(params.posted_by);
        });
        qb.push(" RETURNING ");
        qb.push(CAREER_COLUMNS);

        let row = qb
            .build_query_as::<CareerRow>()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn update_career(
        &self,
        id: i64,
        params: UpdateCareerParams,
    ) -> Result<Option<CareerRecord>, RepoError> {
        let mut qb = QueryBuilder::new("UPDATE careers SET ");
        let mut set = qb.separated(", ");
        push_assignment(&mut set, "title", params.title);
        push_assignment(&mut set, "description", params.description);
        push_assignment(&mut set, "location", params.location);
        push_assignment(&mut set, "job_type", params.job_type);
        push_assignment(&mut set, "experience_level", params.experience_level);
        push_assignment(&mut set, "salary_range", params.salary_range);
        push_assignment(&mut set, "requirements", params.requirements);
        push_assignment(&mut set, "responsibilities", params.responsibilities);
        push_assignment(&mut set, "benefits", params.benefits);
        push_assignment(&mut set, "status", params.status);
        set.push("updated_at = NOW()");

        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" RETURNING ");
        qb.push(CAREER_COLUMNS);

        let row = qb
            .build_query_as::<CareerRow>()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(CareerRecord::from))
    }
}
