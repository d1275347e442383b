//! User handlers.

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
use crate::api::views::UserView;
use crate::db::{Database, DbError, NewUser, User, UserRepository};

use super::{ErrorResponse, HandlerError, db_error, error_response, saved};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "adam")]
    pub username: String,
    #[schema(example = "adam@example.com")]
    pub email: String,
    pub password: String,
}

// Password stays out of traces
impl std::fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Handlers
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/users/",
    tag = "users",
    responses(
        (status = 200, description = "All users", body = Vec<UserView>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_users<D: Database>(
    State(state): State<AppState<D>>,
) -> Result<Json<Vec<UserView>>, HandlerError> {
    let users = state.db().users().list().await.map_err(db_error)?;

    let mut views = Vec::with_capacity(users.len());
    for user in &users {
        views.push(
            UserView::project(user, state.db(), state.urls())
                .await
                .map_err(db_error)?,
        );
    }
    Ok(Json(views))
}

#[utoipa::path(
    post,
    path = "/api/users/",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User registered", body = UserView),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_user<D: Database>(
    State(state): State<AppState<D>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserView>), HandlerError> {
    let outcome = state
        .db()
        .users()
        .create_from(NewUser {
            username: req.username,
            email: req.email,
            password: req.password,
        })
        .await
        .map_err(db_error)?;
    let user = saved(outcome)?;

    info!(username = user.username(), "user registered");

    let view = UserView::project(&user, state.db(), state.urls())
        .await
        .map_err(db_error)?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(
    get,
    path = "/api/user/{username}/",
    tag = "users",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User found", body = UserView),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user<D: Database>(
    State(state): State<AppState<D>>,
    Path(username): Path<String>,
) -> Result<Json<UserView>, HandlerError> {
    let user = find_user(state.db(), &username).await?;

    let view = UserView::project(&user, state.db(), state.urls())
        .await
        .map_err(db_error)?;
    Ok(Json(view))
}

#[utoipa::path(
    delete,
    path = "/api/user/{username}/",
    tag = "users",
    params(("username" = String, Path, description = "Username")),
    security(("bearer" = [])),
    responses(
        (status = 204, description = "User deleted; their lists and todos are kept"),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, admin))]
pub async fn delete_user<D: Database>(
    State(state): State<AppState<D>>,
    admin: AdminUser,
    Path(username): Path<String>,
) -> Result<StatusCode, HandlerError> {
    let user = find_user(state.db(), &username).await?;
    let Some(id) = user.id else {
        return Err(error_response(
            StatusCode::NOT_FOUND,
            format!("User '{}' not found", username),
        ));
    };

    state.db().users().delete(id).await.map_err(db_error)?;

    info!(username = %username, by = admin.0.username(), "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/user/{username}/promote/",
    tag = "users",
    params(("username" = String, Path, description = "Username")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User is now an administrator", body = UserView),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, admin))]
pub async fn promote_user<D: Database>(
    State(state): State<AppState<D>>,
    admin: AdminUser,
    Path(username): Path<String>,
) -> Result<Json<UserView>, HandlerError> {
    let mut user = find_user(state.db(), &username).await?;

    let outcome = state
        .db()
        .users()
        .promote_to_admin(&mut user)
        .await
        .map_err(db_error)?;
    let user = saved(outcome)?;

    info!(username = %username, by = admin.0.username(), "user promoted to admin");

    let view = UserView::project(&user, state.db(), state.urls())
        .await
        .map_err(db_error)?;
    Ok(Json(view))
}

// =============================================================================
// Helpers
// =============================================================================

/// Look a user up by name, answering 404 with the name in the message.
pub(crate) async fn find_user<D: Database>(db: &D, username: &str) -> Result<User, HandlerError> {
    db.users()
        .get_by_username(username)
        .await
        .map_err(|e| match e {
            DbError::NotFound { .. } => error_response(
                StatusCode::NOT_FOUND,
                format!("User '{}' not found", username),
            ),
            _ => db_error(e),
        })
}
