use async_trait::async_trait;
use time::OffsetDateTime;

use crate::application::repos::{ContactsWriteRepo, CreateContactParams, RepoError};
use crate::domain::entities::ContactRecord;

use super::PostgresRepositories;
use super::listing::Table;
use super::util::map_sqlx_error;

const CONTACT_COLUMNS: &str =
    "id, first_name, last_name, email, phone, message, created_at, updated_at";

#[derive(sqlx::FromRow)]
pub struct ContactRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    message: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ContactRow> for ContactRecord {
    fn from(row: ContactRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            message: row.message,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl Table for ContactRecord {
    const TABLE: &'static str = "contact_us";
    const COLUMNS: &'static str = CONTACT_COLUMNS;

    type Row = ContactRow;
}

#[async_trait]
impl ContactsWriteRepo for PostgresRepositories {
    async fn create_contact(
        &self,
        params: CreateContactParams,
    ) -> Result<ContactRecord, RepoError> {
        let sql = format!(
            "INSERT INTO contact_us (first_name, last_name, email, phone, message) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {CONTACT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ContactRow>(&sql)
            .bind(params.first_name)
            .bind(params.last_name)
            .bind(params.email)
            .bind(params.phone)
            .bind(params.message)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.into())
    }
}
