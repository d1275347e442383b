//! Shared helper functions for SQLite repositories.

use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::warn;

use crate::db::{DbError, DbResult, Id, SaveOutcome, SaveRejection};

/// True when the store refused a write because of a UNIQUE constraint.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

/// Finish an upsert transaction.
///
/// Commits on success. A uniqueness violation rolls the transaction back and
/// becomes `SaveOutcome::Rejected`; any other failure is returned as an error
/// (dropping `tx` rolls it back).
pub async fn finish_save(
    tx: Transaction<'_, Sqlite>,
    entity_type: &str,
    result: Result<Id, sqlx::Error>,
) -> DbResult<SaveOutcome<Id>> {
    match result {
        Ok(id) => {
            tx.commit().await?;
            Ok(SaveOutcome::Saved(id))
        }
        Err(e) if is_unique_violation(&e) => {
            tx.rollback().await?;
            warn!(entity_type, error = %e, "save rejected by uniqueness constraint");
            Ok(SaveOutcome::Rejected(SaveRejection {
                entity_type: entity_type.to_string(),
                reason: e.to_string(),
            }))
        }
        Err(e) => Err(e.into()),
    }
}

/// Fail with `NotFound` unless a user with this username exists.
pub async fn ensure_user_exists(pool: &SqlitePool, username: &str) -> DbResult<()> {
    let exists: bool =
        sqlx::query_scalar(r#"SELECT EXISTS(SELECT 1 FROM "user" WHERE username = ?)"#)
            .bind(username)
            .fetch_one(pool)
            .await?;

    if !exists {
        return Err(DbError::not_found("User", username));
    }
    Ok(())
}

/// Convert a SQL `COUNT(*)` into a `usize`.
pub fn count_to_usize(count: i64) -> usize {
    usize::try_from(count).unwrap_or_default()
}
