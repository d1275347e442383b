//! SQLite TodoListRepository implementation.

use sqlx::{Row, SqlitePool};

use super::helpers::{count_to_usize, ensure_user_exists, finish_save};
use crate::db::{DbError, DbResult, Id, SaveOutcome, TodoList, TodoListRepository};

/// SQLx-backed todo list repository.
pub struct SqliteTodoListRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl<'a> TodoListRepository for SqliteTodoListRepository<'a> {
    async fn save(&self, todo_list: &TodoList) -> DbResult<SaveOutcome<TodoList>> {
        if todo_list.id.is_none()
            && let Some(creator) = &todo_list.creator
        {
            ensure_user_exists(self.pool, creator).await?;
        }

        let mut tx = self.pool.begin().await?;

        let result = match todo_list.id {
            None => sqlx::query("INSERT INTO todolist (title, created_at, creator) VALUES (?, ?, ?)")
                .bind(todo_list.title())
                .bind(todo_list.created_at)
                .bind(&todo_list.creator)
                .execute(&mut *tx)
                .await
                .map(|done| done.last_insert_rowid()),
            Some(id) => {
                let updated = sqlx::query(
                    "UPDATE todolist SET title = ?, created_at = ?, creator = ? WHERE id = ?",
                )
                .bind(todo_list.title())
                .bind(todo_list.created_at)
                .bind(&todo_list.creator)
                .bind(id)
                .execute(&mut *tx)
                .await;

                match updated {
                    Ok(done) if done.rows_affected() == 0 => {
                        return Err(DbError::not_found("TodoList", id));
                    }
                    other => other.map(|_| id),
                }
            }
        };

        let outcome = finish_save(tx, "TodoList", result).await?;
        Ok(outcome.map(|id| {
            let mut saved = todo_list.clone();
            saved.id = Some(id);
            saved
        }))
    }

    async fn get(&self, id: Id) -> DbResult<TodoList> {
        let row = sqlx::query("SELECT id, title, created_at, creator FROM todolist WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        let row = row.ok_or_else(|| DbError::not_found("TodoList", id))?;
        row_to_todo_list(&row)
    }

    async fn list(&self) -> DbResult<Vec<TodoList>> {
        let rows =
            sqlx::query("SELECT id, title, created_at, creator FROM todolist ORDER BY created_at, id")
                .fetch_all(self.pool)
                .await?;

        rows.iter().map(row_to_todo_list).collect()
    }

    async fn list_by_creator(&self, username: &str) -> DbResult<Vec<TodoList>> {
        let rows = sqlx::query(
            "SELECT id, title, created_at, creator FROM todolist
             WHERE creator = ? ORDER BY created_at, id",
        )
        .bind(username)
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(row_to_todo_list).collect()
    }

    async fn count_by_creator(&self, username: &str) -> DbResult<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todolist WHERE creator = ?")
            .bind(username)
            .fetch_one(self.pool)
            .await?;

        Ok(count_to_usize(count))
    }

    async fn delete(&self, id: Id) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM todolist WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("TodoList", id));
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Convert a database row to a TodoList model.
fn row_to_todo_list(row: &sqlx::sqlite::SqliteRow) -> DbResult<TodoList> {
    Ok(TodoList::from_row(
        row.try_get("id")?,
        row.try_get("title")?,
        row.try_get("created_at")?,
        row.try_get("creator")?,
    ))
}
