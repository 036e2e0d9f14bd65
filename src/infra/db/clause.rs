//! Renders a [`WhereClause`] into a Postgres query.

use sqlx::{Postgres, QueryBuilder};

use crate::application::filters::{SqlParam, WhereClause};
use crate::application::repos::RepoError;

/// Append `clause`, turning each `?` into the next `$n` bind.
pub(crate) fn push_where(
    qb: &mut QueryBuilder<'_, Postgres>,
    clause: &WhereClause,
) -> Result<(), RepoError> {
    let mut params = clause.params().iter();
    let mut fragments = clause.sql().split('?');

    if let Some(head) = fragments.next() {
        qb.push(head);
    }
    for fragment in fragments {
        let param = params.next().ok_or_else(|| RepoError::InvalidInput {
            message: "filter clause has more placeholders than parameters".to_string(),
        })?;
        push_param(qb, param);
        qb.push(fragment);
    }

    if params.next().is_some() {
        return Err(RepoError::InvalidInput {
            message: "filter clause has more parameters than placeholders".to_string(),
        });
    }
    Ok(())
}

fn push_param(qb: &mut QueryBuilder<'_, Postgres>, param: &SqlParam) {
    match param {
        SqlParam::Text(value) => qb.push_bind(value.clone()),
        SqlParam::Int(value) => qb.push_bind(*value),
        SqlParam::Bool(value) => qb.push_bind(*value),
        SqlParam::Date(value) => qb.push_bind(*value),
    };
}
