//! Integration tests for user endpoints.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

use super::test_support::*;
use crate::db::{Database, NewTodoList, TodoListRepository, UserRepository};

// =============================================================================
// POST /api/users/ - Register
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn register_returns_user_view() {
    let (app, _) = test_app().await;

    let response = app
        .oneshot(send_json(
            "POST",
            "/api/users/",
            json!({"username": "adam", "email": "adam@example.com", "password": "pw"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    assert_eq!(body["username"], "adam");
    assert_eq!(body["user_url"], format!("{BASE}/api/user/adam/"));
    assert_eq!(body["todolists"], format!("{BASE}/api/user/adam/todolists/"));
    assert_eq!(body["todolist_count"], 0);

    // Exactly the documented keys; nothing secret leaks
    let mut keys: Vec<_> = body.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(
        keys,
        [
            "last_seen",
            "member_since",
            "todolist_count",
            "todolists",
            "user_url",
            "username"
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn register_rejects_invalid_email() {
    let (app, _) = test_app().await;

    let response = app
        .oneshot(send_json(
            "POST",
            "/api/users/",
            json!({"username": "adam", "email": "nope", "password": "pw"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("nope"));
}

#[tokio::test(flavor = "multi_thread")]
async fn register_rejects_empty_password() {
    let (app, _) = test_app().await;

    let response = app
        .oneshot(send_json(
            "POST",
            "/api/users/",
            json!({"username": "adam", "email": "adam@example.com", "password": ""}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
async fn register_duplicate_is_conflict() {
    let (app, state) = test_app().await;
    seed_user(&state, "adam", false).await;

    let response = app
        .oneshot(send_json(
            "POST",
            "/api/users/",
            json!({"username": "adam", "email": "other@example.com", "password": "pw"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(state.db().users().list().await.unwrap().len(), 1);
}

// =============================================================================
// GET /api/users/, GET /api/user/{username}/
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn list_users_sorted_by_name() {
    let (app, state) = test_app().await;
    seed_user(&state, "zoe", false).await;
    seed_user(&state, "adam", false).await;

    let response = app.oneshot(get("/api/users/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["adam", "zoe"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn get_user_counts_lists() {
    let (app, state) = test_app().await;
    seed_user(&state, "adam", false).await;
    for title in ["a", "b"] {
        state
            .db()
            .todo_lists()
            .create_from(NewTodoList {
                title: Some(title.to_string()),
                creator: Some("adam".to_string()),
                created_at: None,
            })
            .await
            .unwrap();
    }

    let response = app.oneshot(get("/api/user/adam/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["todolist_count"], 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn get_unknown_user_is_not_found() {
    let (app, _) = test_app().await;

    let response = app.oneshot(get("/api/user/ghost/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "User 'ghost' not found");
}

// =============================================================================
// Admin routes
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn delete_user_requires_token() {
    let (app, state) = test_app().await;
    seed_user(&state, "adam", false).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/user/adam/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_user_forbidden_for_non_admin() {
    let (app, state) = test_app().await;
    seed_user(&state, "adam", false).await;
    let token = seed_session(&state, "eve", false).await;

    let response = app
        .oneshot(with_token("DELETE", "/api/user/adam/", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(state.db().users().get_by_username("adam").await.is_ok());
}

#[tokio::test(flavor = "multi_thread")]
async fn admin_deletes_user() {
    let (app, state) = test_app().await;
    seed_user(&state, "adam", false).await;
    let token = seed_session(&state, "root", true).await;

    let response = app
        .clone()
        .oneshot(with_token("DELETE", "/api/user/adam/", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(get("/api/user/adam/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn admin_promotes_user() {
    let (app, state) = test_app().await;
    seed_user(&state, "adam", false).await;
    let token = seed_session(&state, "root", true).await;

    let response = app
        .oneshot(with_token("POST", "/api/user/adam/promote/", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let adam = state.db().users().get_by_username("adam").await.unwrap();
    assert!(adam.is_admin);
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_token_is_unauthorized() {
    let (app, state) = test_app().await;
    seed_user(&state, "adam", false).await;

    let response = app
        .oneshot(with_token("POST", "/api/user/adam/promote/", "bogus"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
