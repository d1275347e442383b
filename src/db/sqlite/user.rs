//! SQLite UserRepository implementation.

use sqlx::{Row, SqlitePool};

use super::helpers::{count_to_usize, finish_save};
use crate::db::{DbError, DbResult, Id, SaveOutcome, User, UserRepository};

const USER_COLUMNS: &str = "id, username, email, password_hash, member_since, last_seen, is_admin";

/// SQLx-backed user repository.
pub struct SqliteUserRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl<'a> UserRepository for SqliteUserRepository<'a> {
    async fn save(&self, user: &User) -> DbResult<SaveOutcome<User>> {
        let mut tx = self.pool.begin().await?;

        let result = match user.id {
            None => sqlx::query(
                r#"INSERT INTO "user" (username, email, password_hash, member_since, last_seen, is_admin)
                   VALUES (?, ?, ?, ?, ?, ?)"#,
            )
            .bind(user.username())
            .bind(user.email())
            .bind(user.password_hash())
            .bind(user.member_since)
            .bind(user.last_seen)
            .bind(user.is_admin)
            .execute(&mut *tx)
            .await
            .map(|done| done.last_insert_rowid()),
            Some(id) => {
                let updated = sqlx::query(
                    r#"UPDATE "user"
                       SET username = ?, email = ?, password_hash = ?, member_since = ?,
                           last_seen = ?, is_admin = ?
                       WHERE id = ?"#,
                )
                .bind(user.username())
                .bind(user.email())
                .bind(user.password_hash())
                .bind(user.member_since)
                .bind(user.last_seen)
                .bind(user.is_admin)
                .bind(id)
                .execute(&mut *tx)
                .await;

                match updated {
                    Ok(done) if done.rows_affected() == 0 => {
                        return Err(DbError::not_found("User", id));
                    }
                    other => other.map(|_| id),
                }
            }
        };

        let outcome = finish_save(tx, "User", result).await?;
        Ok(outcome.map(|id| {
            let mut saved = user.clone();
            saved.id = Some(id);
            saved
        }))
    }

    async fn get(&self, id: Id) -> DbResult<User> {
        let row = sqlx::query(&format!(r#"SELECT {USER_COLUMNS} FROM "user" WHERE id = ?"#))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        let row = row.ok_or_else(|| DbError::not_found("User", id))?;
        row_to_user(&row)
    }

    async fn get_by_username(&self, username: &str) -> DbResult<User> {
        let row = sqlx::query(&format!(
            r#"SELECT {USER_COLUMNS} FROM "user" WHERE username = ?"#
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        let row = row.ok_or_else(|| DbError::not_found("User", username))?;
        row_to_user(&row)
    }

    async fn list(&self) -> DbResult<Vec<User>> {
        let rows = sqlx::query(&format!(
            r#"SELECT {USER_COLUMNS} FROM "user" ORDER BY username"#
        ))
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(row_to_user).collect()
    }

    async fn count(&self) -> DbResult<usize> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "user""#)
            .fetch_one(self.pool)
            .await?;

        Ok(count_to_usize(count))
    }

    async fn seen(&self, user: &mut User) -> DbResult<SaveOutcome<User>> {
        user.mark_seen();
        let Some(id) = user.id else {
            return self.save(user).await;
        };

        let result = sqlx::query(r#"UPDATE "user" SET last_seen = ? WHERE id = ?"#)
            .bind(user.last_seen)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }
        Ok(SaveOutcome::Saved(user.clone()))
    }

    async fn promote_to_admin(&self, user: &mut User) -> DbResult<SaveOutcome<User>> {
        user.grant_admin();
        let Some(id) = user.id else {
            return self.save(user).await;
        };

        let result = sqlx::query(r#"UPDATE "user" SET is_admin = 1 WHERE id = ?"#)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }
        Ok(SaveOutcome::Saved(user.clone()))
    }

    async fn delete(&self, id: Id) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(r#"DELETE FROM "user" WHERE id = ?"#)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Convert a database row to a User model.
fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> DbResult<User> {
    Ok(User::from_row(
        row.try_get("id")?,
        row.try_get("username")?,
        row.try_get("email")?,
        row.try_get("password_hash")?,
        row.try_get("member_since")?,
        row.try_get("last_seen")?,
        row.try_get("is_admin")?,
    ))
}
