use async_trait::async_trait;
use time::OffsetDateTime;

use crate::application::repos::{
    CreateFranchiseParams, FranchiseWriteRepo, RepoError, UpdateFranchiseStatusParams,
};
use crate::domain::entities::FranchiseRecord;

use super::PostgresRepositories;
use super::listing::{KeyedTable, Table};
use super::util::map_sqlx_error;

const FRANCHISE_COLUMNS: &str = "id, contact_person, business_name, email, phone, city, state, \
    investment_capacity, message, status, notes, assigned_to, created_at, updated_at";

#[derive(sqlx::FromRow)]
pub struct FranchiseRow {
    id: i64,
    contact_person: String,
    business_name: Option<String>,
    email: String,
    phone: String,
    city: String,
    state: Option<String>,
    investment_capacity: Option<i64>,
    message: Option<String>,
    status: i16,
    notes: Option<String>,
    assigned_to: Option<i64>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<FranchiseRow> for FranchiseRecord {
    fn from(row: FranchiseRow) -> Self {
        Self {
            id: row.id,
            contact_person: row.contact_person,
            business_name: row.business_name,
            email: row.email,
            phone: row.phone,
            city: row.city,
            state: row.state,
            investment_capacity: row.investment_capacity,
            message: row.message,
            status: row.status,
            notes: row.notes,
            assigned_to: row.assigned_to,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl Table for FranchiseRecord {
    const TABLE: &'static str = "franchise_inquiries";
    const COLUMNS: &'static str = FRANCHISE_COLUMNS;

    type Row = FranchiseRow;
}

impl KeyedTable for FranchiseRecord {}

#[async_trait]
impl FranchiseWriteRepo for PostgresRepositories {
    async fn create_franchise(
        &self,
        params: CreateFranchiseParams,
    ) -> Result<FranchiseRecord, RepoError> {
        let sql = format!(
            "INSERT INTO franchise_inquiries (contact_person, business_name, email, phone, city, \
             state, investment_capacity, message, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {FRANCHISE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, FranchiseRow>(&sql)
            .bind(params.contact_person)
            .bind(params.business_name)
            .bind(params.email)
            .bind(params.phone)
            .bind(params.city)
            .bind(params.state)
            .bind(params.investment_capacity)
            .bind(params.message)
            .bind(params.status)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    /// Absent notes or assignee keep their stored values.
    async fn update_franchise_status(
        &self,
        params: UpdateFranchiseStatusParams,
    ) -> Result<Option<FranchiseRecord>, RepoError> {
        let sql = format!(
            "UPDATE franchise_inquiries \
             SET status = $1, notes = COALESCE($2, notes), \
                 assigned_to = COALESCE($3, assigned_to), updated_at = NOW() \
             WHERE id = $4 RETURNING {FRANCHISE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, FranchiseRow>(&sql)
            .bind(params.status)
            .bind(params.notes)
            .bind(params.assigned_to)
            .bind(params.id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(FranchiseRecord::from))
    }
}
