//! Filtered listing and keyed access shared by every table.
//!
//! A record type opts in by implementing [`Table`]; list, count and export
//! then render the same [`WhereClause`](crate::application::filters::WhereClause)
//! so the page and its total always agree.

use async_trait::async_trait;
use sqlx::{FromRow, Postgres, QueryBuilder, postgres::PgRow};

use crate::application::filters::ListQuery;
use crate::application::pagination::PageWindow;
use crate::application::repos::{ListingRepo, RecordRepo, RepoError};
use crate::application::resource::Resource;

use super::PostgresRepositories;
use super::clause::push_where;
use super::util::map_sqlx_error;

/// Storage mapping for a listed record.
pub trait Table: Resource {
    const TABLE: &'static str;
    /// Select list, in the order the row type expects.
    const COLUMNS: &'static str;

    type Row: for<'r> FromRow<'r, PgRow> + Send + Unpin + Into<Self>;
}

/// Tables keyed by a `BIGSERIAL id`.
pub trait KeyedTable: Table {}

fn select<R: Table>(query: &ListQuery) -> Result<QueryBuilder<'static, Postgres>, RepoError> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM {} ", R::COLUMNS, R::TABLE));
    push_where(&mut qb, query.clause())?;
    qb.push(" ORDER BY created_at DESC");
    Ok(qb)
}

#[async_trait]
impl<R: Table> ListingRepo<R> for PostgresRepositories {
    async fn list(&self, query: &ListQuery, window: PageWindow) -> Result<Vec<R>, RepoError> {
        let mut qb = select::<R>(query)?;
        qb.push(" LIMIT ");
        qb.push_bind(i64::from(window.limit()));
        qb.push(" OFFSET ");
        qb.push_bind(window.offset());

        let rows = qb
            .build_query_as::<R::Row>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self, query: &ListQuery) -> Result<i64, RepoError> {
        let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {} ", R::TABLE));
        push_where(&mut qb, query.clause())?;

        qb.build_query_scalar::<i64>()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn export(&self, query: &ListQuery) -> Result<Vec<R>, RepoError> {
        let mut qb = select::<R>(query)?;
        let rows = qb
            .build_query_as::<R::Row>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl<R: KeyedTable> RecordRepo<R> for PostgresRepositories {
    async fn find_by_id(&self, id: i64) -> Result<Option<R>, RepoError> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {} FROM {} WHERE id = ",
            R::COLUMNS,
            R::TABLE
        ));
        qb.push_bind(id);

        let row = qb
            .build_query_as::<R::Row>()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        let mut qb = QueryBuilder::new(format!("DELETE FROM {} WHERE id = ", R::TABLE));
        qb.push_bind(id);

        let result = qb
            .build()
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}
