//! Request extractors for bearer-token authentication.

use axum::extract::FromRequestParts;
use axum::http::{StatusCode, header, request::Parts};

use super::state::AppState;
use super::v1::{HandlerError, db_error, error_response};
use crate::db::{Database, User};

/// The raw token from `Authorization: Bearer <token>`.
pub struct BearerToken(pub String);

/// The user behind a valid bearer token.
pub struct CurrentUser(pub User);

/// A logged-in user holding the admin flag.
pub struct AdminUser(pub User);

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = HandlerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split_once(' '))
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
            .map(|(_, token)| token.trim())
            .filter(|token| !token.is_empty())
            .map(|token| BearerToken(token.to_string()))
            .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "missing bearer token"))
    }
}

impl<D: Database> FromRequestParts<AppState<D>> for CurrentUser {
    type Rejection = HandlerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<D>,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;

        state
            .sessions()
            .resolve(&token)
            .await
            .map_err(db_error)?
            .map(CurrentUser)
            .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "invalid or expired token"))
    }
}

impl<D: Database> FromRequestParts<AppState<D>> for AdminUser {
    type Rejection = HandlerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<D>,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if !user.is_admin {
            return Err(error_response(
                StatusCode::FORBIDDEN,
                "administrator privileges required",
            ));
        }
        Ok(AdminUser(user))
    }
}
