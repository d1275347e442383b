//! V1 API handlers.

mod auth;
mod system;
mod todo_lists;
mod todos;
mod users;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod users_test;

use axum::{Json, http::StatusCode};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::db::{DbError, SaveOutcome};

pub use auth::*;
pub use system::*;
pub use todo_lists::*;
pub use todos::*;
pub use users::*;

/// Error response
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    #[schema(example = "User 'adam' not found")]
    pub error: String,
}

/// Error half of every handler result.
pub type HandlerError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Map a storage error onto a status code.
pub(crate) fn db_error(e: DbError) -> HandlerError {
    match e {
        DbError::NotFound { .. } => error_response(StatusCode::NOT_FOUND, e.to_string()),
        DbError::Validation(v) => error_response(StatusCode::BAD_REQUEST, v.to_string()),
        _ => {
            error!(error = %e, "storage failure");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Unwrap a save, turning a rejected write into 409 Conflict.
pub(crate) fn saved<T>(outcome: SaveOutcome<T>) -> Result<T, HandlerError> {
    match outcome {
        SaveOutcome::Saved(entity) => Ok(entity),
        SaveOutcome::Rejected(rejection) => Err(error_response(
            StatusCode::CONFLICT,
            format!(
                "{} could not be saved: {}",
                rejection.entity_type, rejection.reason
            ),
        )),
    }
}
