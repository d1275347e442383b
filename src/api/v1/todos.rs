//! Todo handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::api::AppState;
use crate::api::extract::AdminUser;
use crate::api::views::TodoView;
use crate::db::{Database, DbError, Id, NewTodo, Todo, TodoRepository};

use super::todo_lists::{find_list, find_owned_list};
use super::users::find_user;
use super::{ErrorResponse, HandlerError, db_error, error_response, saved};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserTodoRequest {
    #[schema(example = "buy milk")]
    pub description: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTodoRequest {
    #[schema(example = "buy milk")]
    pub description: String,
    /// Username of an existing user
    #[schema(example = "adam")]
    pub creator: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTodoRequest {
    #[schema(example = true)]
    pub is_finished: bool,
}

// =============================================================================
// User-scoped handlers
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/user/{username}/todolist/{id}/todos/",
    tag = "todos",
    params(
        ("username" = String, Path, description = "Username"),
        ("id" = i64, Path, description = "TodoList ID")
    ),
    responses(
        (status = 200, description = "Todos of the list", body = Vec<TodoView>),
        (status = 404, description = "List not found or not owned by the user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_user_todolist_todos<D: Database>(
    State(state): State<AppState<D>>,
    Path((username, id)): Path<(String, Id)>,
) -> Result<Json<Vec<TodoView>>, HandlerError> {
    find_owned_list(state.db(), &username, id).await?;
    list_todos(state.db(), id).await
}

#[utoipa::path(
    post,
    path = "/api/user/{username}/todolist/{id}/todos/",
    tag = "todos",
    params(
        ("username" = String, Path, description = "Username"),
        ("id" = i64, Path, description = "TodoList ID")
    ),
    request_body = CreateUserTodoRequest,
    responses(
        (status = 201, description = "Todo added, created by the user", body = TodoView),
        (status = 400, description = "Invalid description", body = ErrorResponse),
        (status = 404, description = "List not found or not owned by the user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_user_todolist_todo<D: Database>(
    State(state): State<AppState<D>>,
    Path((username, id)): Path<(String, Id)>,
    Json(req): Json<CreateUserTodoRequest>,
) -> Result<(StatusCode, Json<TodoView>), HandlerError> {
    let list = find_owned_list(state.db(), &username, id).await?;
    add_todo(state.db(), id, req.description, list.creator).await
}

// =============================================================================
// Handlers
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/todolist/{id}/todos/",
    tag = "todos",
    params(("id" = i64, Path, description = "TodoList ID")),
    responses(
        (status = 200, description = "Todos of the list", body = Vec<TodoView>),
        (status = 404, description = "List not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_todolist_todos<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<Id>,
) -> Result<Json<Vec<TodoView>>, HandlerError> {
    find_list(state.db(), id).await?;
    list_todos(state.db(), id).await
}

#[utoipa::path(
    post,
    path = "/api/todolist/{id}/todos/",
    tag = "todos",
    params(("id" = i64, Path, description = "TodoList ID")),
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo added", body = TodoView),
        (status = 400, description = "Invalid description", body = ErrorResponse),
        (status = 404, description = "List or creator not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_todolist_todo<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<Id>,
    Json(req): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoView>), HandlerError> {
    find_list(state.db(), id).await?;
    let creator = match req.creator {
        Some(username) => Some(find_user(state.db(), &username).await?.username().to_string()),
        None => None,
    };

    add_todo(state.db(), id, req.description, creator).await
}

#[utoipa::path(
    get,
    path = "/api/todo/{id}/",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Todo found", body = TodoView),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_todo<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<Id>,
) -> Result<Json<TodoView>, HandlerError> {
    let todo = find_todo(state.db(), id).await?;
    Ok(Json(TodoView::from(&todo)))
}

#[utoipa::path(
    put,
    path = "/api/todo/{id}/",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo ID")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Todo finished or reopened", body = TodoView),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_todo<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<Id>,
    Json(req): Json<UpdateTodoRequest>,
) -> Result<Json<TodoView>, HandlerError> {
    let mut todo = find_todo(state.db(), id).await?;

    let todos = state.db().todos();
    let outcome = if req.is_finished {
        todos.finished(&mut todo).await
    } else {
        todos.reopen(&mut todo).await
    }
    .map_err(db_error)?;
    let todo = saved(outcome)?;

    Ok(Json(TodoView::from(&todo)))
}

#[utoipa::path(
    delete,
    path = "/api/todo/{id}/",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo ID")),
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, admin))]
pub async fn delete_todo<D: Database>(
    State(state): State<AppState<D>>,
    admin: AdminUser,
    Path(id): Path<Id>,
) -> Result<StatusCode, HandlerError> {
    state
        .db()
        .todos()
        .delete(id)
        .await
        .map_err(|e| todo_error(e, id))?;

    info!(id, by = admin.0.username(), "todo deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Helpers
// =============================================================================

async fn list_todos<D: Database>(db: &D, todolist_id: Id) -> Result<Json<Vec<TodoView>>, HandlerError> {
    let todos = db.todos().list_for(todolist_id).await.map_err(db_error)?;
    Ok(Json(todos.iter().map(TodoView::from).collect()))
}

async fn add_todo<D: Database>(
    db: &D,
    todolist_id: Id,
    description: String,
    creator: Option<String>,
) -> Result<(StatusCode, Json<TodoView>), HandlerError> {
    let outcome = db
        .todos()
        .create_from(NewTodo {
            description,
            todolist_id,
            creator,
            created_at: None,
        })
        .await
        .map_err(db_error)?;
    let todo = saved(outcome)?;

    info!(id = todo.id, todolist_id, "todo added");
    Ok((StatusCode::CREATED, Json(TodoView::from(&todo))))
}

fn todo_error(e: DbError, id: Id) -> HandlerError {
    match e {
        DbError::NotFound { .. } => {
            error_response(StatusCode::NOT_FOUND, format!("Todo '{}' not found", id))
        }
        _ => db_error(e),
    }
}

async fn find_todo<D: Database>(db: &D, id: Id) -> Result<Todo, HandlerError> {
    db.todos().get(id).await.map_err(|e| todo_error(e, id))
}
