//! Shared fixtures for the handler tests.

use axum::{
    Router,
    body::Body,
    http::{Request, header},
};
use http_body_util::BodyExt;
use serde_json::Value;

use crate::api::{AppState, UrlBuilder, routes};
use crate::db::{Database, SqliteDatabase, User, UserRepository};

pub(super) const BASE: &str = "http://test.local";

pub(super) async fn test_state() -> AppState<SqliteDatabase> {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create test database");
    db.migrate().await.expect("Failed to run migrations");
    AppState::new(db, UrlBuilder::new(BASE))
}

pub(super) fn app(state: &AppState<SqliteDatabase>) -> Router {
    routes::create_router(state.clone(), false)
}

pub(super) async fn test_app() -> (Router, AppState<SqliteDatabase>) {
    let state = test_state().await;
    (app(&state), state)
}

pub(super) async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

pub(super) fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub(super) fn send_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

pub(super) fn with_token(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

/// Store a user directly and return it.
pub(super) async fn seed_user(state: &AppState<SqliteDatabase>, username: &str, admin: bool) -> User {
    let mut user = User::new(username, &format!("{username}@example.com"), "pw").unwrap();
    if admin {
        user.grant_admin();
    }
    state
        .db()
        .users()
        .save(&user)
        .await
        .unwrap()
        .saved()
        .unwrap()
}

/// Store a user and open a session for them.
pub(super) async fn seed_session(
    state: &AppState<SqliteDatabase>,
    username: &str,
    admin: bool,
) -> String {
    let user = seed_user(state, username, admin).await;
    state.sessions().open(&user).unwrap()
}
