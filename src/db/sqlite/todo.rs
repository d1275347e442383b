//! SQLite TodoRepository implementation.

use sqlx::{Row, SqlitePool};

use super::helpers::{count_to_usize, ensure_user_exists, finish_save};
use crate::db::{DbError, DbResult, Id, SaveOutcome, Todo, TodoRepository};

const TODO_COLUMNS: &str =
    "id, description, created_at, finished_at, is_finished, creator, todolist_id";

/// SQLx-backed todo repository.
pub struct SqliteTodoRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl<'a> TodoRepository for SqliteTodoRepository<'a> {
    async fn save(&self, todo: &Todo) -> DbResult<SaveOutcome<Todo>> {
        // New todos must point at an existing list (and creator, if any)
        if todo.id.is_none() {
            let list_exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM todolist WHERE id = ?)")
                    .bind(todo.todolist_id)
                    .fetch_one(self.pool)
                    .await?;
            if !list_exists {
                return Err(DbError::not_found("TodoList", todo.todolist_id));
            }
            if let Some(creator) = &todo.creator {
                ensure_user_exists(self.pool, creator).await?;
            }
        }

        let mut tx = self.pool.begin().await?;

        let result = match todo.id {
            None => sqlx::query(
                "INSERT INTO todo (description, created_at, finished_at, is_finished, creator, todolist_id)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(todo.description())
            .bind(todo.created_at)
            .bind(todo.finished_at())
            .bind(todo.is_finished())
            .bind(&todo.creator)
            .bind(todo.todolist_id)
            .execute(&mut *tx)
            .await
            .map(|done| done.last_insert_rowid()),
            Some(id) => {
                let updated = sqlx::query(
                    "UPDATE todo
                     SET description = ?, created_at = ?, finished_at = ?, is_finished = ?,
                         creator = ?, todolist_id = ?
                     WHERE id = ?",
                )
                .bind(todo.description())
                .bind(todo.created_at)
                .bind(todo.finished_at())
                .bind(todo.is_finished())
                .bind(&todo.creator)
                .bind(todo.todolist_id)
                .bind(id)
                .execute(&mut *tx)
                .await;

                match updated {
                    Ok(done) if done.rows_affected() == 0 => {
                        return Err(DbError::not_found("Todo", id));
                    }
                    other => other.map(|_| id),
                }
            }
        };

        let outcome = finish_save(tx, "Todo", result).await?;
        Ok(outcome.map(|id| {
            let mut saved = todo.clone();
            saved.id = Some(id);
            saved
        }))
    }

    async fn get(&self, id: Id) -> DbResult<Todo> {
        let row = sqlx::query(&format!("SELECT {TODO_COLUMNS} FROM todo WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        let row = row.ok_or_else(|| DbError::not_found("Todo", id))?;
        row_to_todo(&row)
    }

    async fn list_for(&self, todolist_id: Id) -> DbResult<Vec<Todo>> {
        let rows = sqlx::query(&format!(
            "SELECT {TODO_COLUMNS} FROM todo WHERE todolist_id = ? ORDER BY created_at, id"
        ))
        .bind(todolist_id)
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(row_to_todo).collect()
    }

    async fn count_for(&self, todolist_id: Id) -> DbResult<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todo WHERE todolist_id = ?")
            .bind(todolist_id)
            .fetch_one(self.pool)
            .await?;

        Ok(count_to_usize(count))
    }

    async fn count_by_status(&self, todolist_id: Id, finished: bool) -> DbResult<usize> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM todo WHERE todolist_id = ? AND is_finished = ?",
        )
        .bind(todolist_id)
        .bind(finished)
        .fetch_one(self.pool)
        .await?;

        Ok(count_to_usize(count))
    }

    async fn delete(&self, id: Id) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM todo WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Todo", id));
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Convert a database row to a Todo model.
fn row_to_todo(row: &sqlx::sqlite::SqliteRow) -> DbResult<Todo> {
    Ok(Todo::from_row(
        row.try_get("id")?,
        row.try_get("description")?,
        row.try_get("created_at")?,
        row.try_get("finished_at")?,
        row.try_get("is_finished")?,
        row.try_get("creator")?,
        row.try_get("todolist_id")?,
    ))
}
