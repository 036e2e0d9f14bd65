use sqlx::{Encode, Postgres, Type, query_builder::Separated};

use crate::application::repos::RepoError;

pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => RepoError::Duplicate {
            constraint: db.constraint().unwrap_or("unknown").to_string(),
        },
        sqlx::Error::Database(db)
            if db.is_foreign_key_violation()
                || db.is_check_violation()
                || db.message().contains("invalid input syntax") =>
        {
            RepoError::InvalidInput {
                message: db.message().to_string(),
            }
        }
        sqlx::Error::Database(db)
            if db
                .message()
                .contains("canceling statement due to user request") =>
        {
            RepoError::Timeout
        }
        sqlx::Error::PoolTimedOut => RepoError::Timeout,
        other => RepoError::from_persistence(other),
    }
}

/// Push `column = $n` onto an `UPDATE ... SET` list when `value` is present.
pub(crate) fn push_assignment<'args, T>(
    set: &mut Separated<'_, 'args, Postgres, &'static str>,
    column: &'static str,
    value: Option<T>,
) where
    T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
{
    if let Some(value) = value {
        set.push(format_args!("{column} = "));
        set.push_bind_unseparated(value);
    }
}
