//! Login and logout handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::api::AppState;
use crate::api::extract::{BearerToken, CurrentUser};
use crate::api::views::UserView;
use crate::db::Database;

use super::{ErrorResponse, HandlerError, db_error, error_response};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "adam")]
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header
    pub token: String,
    pub user: UserView,
}

// =============================================================================
// Handlers
// =============================================================================

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Wrong username or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn login<D: Database>(
    State(state): State<AppState<D>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HandlerError> {
    let Some((token, user)) = state
        .sessions()
        .login(&req.username, &req.password)
        .await
        .map_err(db_error)?
    else {
        return Err(error_response(
            StatusCode::UNAUTHORIZED,
            "invalid username or password",
        ));
    };

    info!(username = user.username(), "user logged in");

    let user = UserView::project(&user, state.db(), state.urls())
        .await
        .map_err(db_error)?;
    Ok(Json(LoginResponse { token, user }))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Session ended"),
        (status = 401, description = "Missing or unknown token", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn logout<D: Database>(
    State(state): State<AppState<D>>,
    BearerToken(token): BearerToken,
) -> Result<StatusCode, HandlerError> {
    if !state.sessions().logout(&token) {
        return Err(error_response(
            StatusCode::UNAUTHORIZED,
            "invalid or expired token",
        ));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The logged-in user", body = UserView),
        (status = 401, description = "Missing or unknown token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn me<D: Database>(
    State(state): State<AppState<D>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<UserView>, HandlerError> {
    let view = UserView::project(&user, state.db(), state.urls())
        .await
        .map_err(db_error)?;
    Ok(Json(view))
}
