//! TodoList handlers.

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
use crate::api::views::TodoListView;
use crate::db::{Database, DbError, Id, NewTodoList, TodoList, TodoListRepository};

use super::users::find_user;
use super::{ErrorResponse, HandlerError, db_error, error_response, saved};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateTodoListRequest {
    /// Defaults to "untitled" when missing or invalid
    #[schema(example = "groceries")]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTodoListRequest {
    #[schema(example = "hardware store")]
    pub title: String,
}

// =============================================================================
// User-scoped handlers
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/user/{username}/todolists/",
    tag = "todolists",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Lists created by the user", body = Vec<TodoListView>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_user_todolists<D: Database>(
    State(state): State<AppState<D>>,
    Path(username): Path<String>,
) -> Result<Json<Vec<TodoListView>>, HandlerError> {
    let user = find_user(state.db(), &username).await?;

    let lists = state
        .db()
        .todo_lists()
        .list_by_creator(user.username())
        .await
        .map_err(db_error)?;

    Ok(Json(project_all(&state, &lists).await?))
}

#[utoipa::path(
    post,
    path = "/api/user/{username}/todolists/",
    tag = "todolists",
    params(("username" = String, Path, description = "Username")),
    request_body = CreateTodoListRequest,
    responses(
        (status = 201, description = "List created for the user", body = TodoListView),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_user_todolist<D: Database>(
    State(state): State<AppState<D>>,
    Path(username): Path<String>,
    Json(req): Json<CreateTodoListRequest>,
) -> Result<(StatusCode, Json<TodoListView>), HandlerError> {
    let user = find_user(state.db(), &username).await?;

    create_list(&state, req.title, Some(user.username().to_string())).await
}

#[utoipa::path(
    get,
    path = "/api/user/{username}/todolist/{id}/",
    tag = "todolists",
    params(
        ("username" = String, Path, description = "Username"),
        ("id" = i64, Path, description = "TodoList ID")
    ),
    responses(
        (status = 200, description = "List found", body = TodoListView),
        (status = 404, description = "List not found or not owned by the user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user_todolist<D: Database>(
    State(state): State<AppState<D>>,
    Path((username, id)): Path<(String, Id)>,
) -> Result<Json<TodoListView>, HandlerError> {
    let list = find_owned_list(state.db(), &username, id).await?;
    Ok(Json(project(&state, &list).await?))
}

// =============================================================================
// Handlers
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/todolists/",
    tag = "todolists",
    responses(
        (status = 200, description = "All lists", body = Vec<TodoListView>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_todolists<D: Database>(
    State(state): State<AppState<D>>,
) -> Result<Json<Vec<TodoListView>>, HandlerError> {
    let lists = state.db().todo_lists().list().await.map_err(db_error)?;
    Ok(Json(project_all(&state, &lists).await?))
}

#[utoipa::path(
    post,
    path = "/api/todolists/",
    tag = "todolists",
    request_body = CreateTodoListRequest,
    responses(
        (status = 201, description = "Anonymous list created", body = TodoListView),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_todolist<D: Database>(
    State(state): State<AppState<D>>,
    Json(req): Json<CreateTodoListRequest>,
) -> Result<(StatusCode, Json<TodoListView>), HandlerError> {
    create_list(&state, req.title, None).await
}

#[utoipa::path(
    get,
    path = "/api/todolist/{id}/",
    tag = "todolists",
    params(("id" = i64, Path, description = "TodoList ID")),
    responses(
        (status = 200, description = "List found", body = TodoListView),
        (status = 404, description = "List not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_todolist<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<Id>,
) -> Result<Json<TodoListView>, HandlerError> {
    let list = find_list(state.db(), id).await?;
    Ok(Json(project(&state, &list).await?))
}

#[utoipa::path(
    put,
    path = "/api/todolist/{id}/",
    tag = "todolists",
    params(("id" = i64, Path, description = "TodoList ID")),
    request_body = UpdateTodoListRequest,
    responses(
        (status = 200, description = "Title changed", body = TodoListView),
        (status = 400, description = "Invalid title", body = ErrorResponse),
        (status = 404, description = "List not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_todolist<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<Id>,
    Json(req): Json<UpdateTodoListRequest>,
) -> Result<Json<TodoListView>, HandlerError> {
    let mut list = find_list(state.db(), id).await?;

    let outcome = state
        .db()
        .todo_lists()
        .change_title(&mut list, &req.title)
        .await
        .map_err(db_error)?;
    let list = saved(outcome)?;

    Ok(Json(project(&state, &list).await?))
}

#[utoipa::path(
    delete,
    path = "/api/todolist/{id}/",
    tag = "todolists",
    params(("id" = i64, Path, description = "TodoList ID")),
    security(("bearer" = [])),
    responses(
        (status = 204, description = "List deleted; its todos are kept"),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "List not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, admin))]
pub async fn delete_todolist<D: Database>(
    State(state): State<AppState<D>>,
    admin: AdminUser,
    Path(id): Path<Id>,
) -> Result<StatusCode, HandlerError> {
    state
        .db()
        .todo_lists()
        .delete(id)
        .await
        .map_err(|e| list_error(e, id))?;

    info!(id, by = admin.0.username(), "todo list deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Helpers
// =============================================================================

async fn create_list<D: Database>(
    state: &AppState<D>,
    title: Option<String>,
    creator: Option<String>,
) -> Result<(StatusCode, Json<TodoListView>), HandlerError> {
    let outcome = state
        .db()
        .todo_lists()
        .create_from(NewTodoList {
            title,
            creator,
            created_at: None,
        })
        .await
        .map_err(db_error)?;
    let list = saved(outcome)?;

    info!(id = list.id, title = list.title(), "todo list created");

    Ok((StatusCode::CREATED, Json(project(state, &list).await?)))
}

async fn project<D: Database>(
    state: &AppState<D>,
    list: &TodoList,
) -> Result<TodoListView, HandlerError> {
    TodoListView::project(list, state.db(), state.urls())
        .await
        .map_err(db_error)
}

async fn project_all<D: Database>(
    state: &AppState<D>,
    lists: &[TodoList],
) -> Result<Vec<TodoListView>, HandlerError> {
    let mut views = Vec::with_capacity(lists.len());
    for list in lists {
        views.push(project(state, list).await?);
    }
    Ok(views)
}

fn list_error(e: DbError, id: Id) -> HandlerError {
    match e {
        DbError::NotFound { .. } => error_response(
            StatusCode::NOT_FOUND,
            format!("TodoList '{}' not found", id),
        ),
        _ => db_error(e),
    }
}

pub(crate) async fn find_list<D: Database>(db: &D, id: Id) -> Result<TodoList, HandlerError> {
    db.todo_lists().get(id).await.map_err(|e| list_error(e, id))
}

/// A list reached through a user's URLs must have been created by that user.
pub(crate) async fn find_owned_list<D: Database>(
    db: &D,
    username: &str,
    id: Id,
) -> Result<TodoList, HandlerError> {
    let user = find_user(db, username).await?;
    let list = find_list(db, id).await?;

    if list.creator.as_deref() != Some(user.username()) {
        return Err(error_response(
            StatusCode::NOT_FOUND,
            format!("TodoList '{}' not found for user '{}'", id, username),
        ));
    }
    Ok(list)
}
