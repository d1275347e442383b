//! API route configuration.

use axum::Router;
use axum::routing::{delete, get, post, put};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable};

use super::state::AppState;
use super::v1::{
    self, CreateTodoListRequest, CreateTodoRequest, CreateUserRequest, CreateUserTodoRequest,
    ErrorResponse, HealthResponse, LoginRequest, LoginResponse, UpdateTodoListRequest,
    UpdateTodoRequest,
};
use super::views::{TodoListView, TodoView, UserView};
use crate::db::Database;

/// Build routes with generic database type.
///
/// This macro reduces boilerplate when registering handlers that are generic
/// over the Database trait. It applies the turbofish operator automatically.
macro_rules! routes {
    ($D:ty => {
        $($method:ident $path:literal => $($handler:ident)::+),* $(,)?
    }) => {{
        let router = Router::new();
        $(
            let router = router.route($path, $method($($handler)::+::<$D>));
        )*
        router
    }};
}

/// Registers the bearer scheme referenced by the admin and session routes.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todolist API",
        version = "0.1.0",
        description = "Users, todo lists and todos",
        license(name = "GPL-2.0")
    ),
    modifiers(&BearerAuth),
    paths(
        v1::health,
        v1::login,
        v1::logout,
        v1::me,
        v1::list_users,
        v1::create_user,
        v1::get_user,
        v1::delete_user,
        v1::promote_user,
        v1::list_user_todolists,
        v1::create_user_todolist,
        v1::get_user_todolist,
        v1::list_todolists,
        v1::create_todolist,
        v1::get_todolist,
        v1::update_todolist,
        v1::delete_todolist,
        v1::list_user_todolist_todos,
        v1::create_user_todolist_todo,
        v1::list_todolist_todos,
        v1::create_todolist_todo,
        v1::get_todo,
        v1::update_todo,
        v1::delete_todo,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            LoginRequest,
            LoginResponse,
            CreateUserRequest,
            UserView,
            CreateTodoListRequest,
            UpdateTodoListRequest,
            TodoListView,
            CreateUserTodoRequest,
            CreateTodoRequest,
            UpdateTodoRequest,
            TodoView,
        )
    ),
    tags(
        (name = "system", description = "System health endpoints"),
        (name = "auth", description = "Bearer-token sessions"),
        (name = "users", description = "User registration and administration"),
        (name = "todolists", description = "Todo list endpoints"),
        (name = "todos", description = "Todo endpoints")
    )
)]
pub struct ApiDoc;

/// Create the API router. The Scalar UI is served at `/docs` when
/// `enable_docs` is set.
pub fn create_router<D: Database>(state: AppState<D>, enable_docs: bool) -> Router {
    let system_routes = Router::new().route("/health", get(v1::health));

    let auth_routes = routes!(D => {
        post "/api/auth/login" => v1::login,
        post "/api/auth/logout" => v1::logout,
        get "/api/auth/me" => v1::me,
    });

    let user_routes = routes!(D => {
        get "/api/users/" => v1::list_users,
        post "/api/users/" => v1::create_user,
        get "/api/user/{username}/" => v1::get_user,
        delete "/api/user/{username}/" => v1::delete_user,
        post "/api/user/{username}/promote/" => v1::promote_user,
    });

    let todo_list_routes = routes!(D => {
        get "/api/user/{username}/todolists/" => v1::list_user_todolists,
        post "/api/user/{username}/todolists/" => v1::create_user_todolist,
        get "/api/user/{username}/todolist/{id}/" => v1::get_user_todolist,
        get "/api/todolists/" => v1::list_todolists,
        post "/api/todolists/" => v1::create_todolist,
        get "/api/todolist/{id}/" => v1::get_todolist,
        put "/api/todolist/{id}/" => v1::update_todolist,
        delete "/api/todolist/{id}/" => v1::delete_todolist,
    });

    let todo_routes = routes!(D => {
        get "/api/user/{username}/todolist/{id}/todos/" => v1::list_user_todolist_todos,
        post "/api/user/{username}/todolist/{id}/todos/" => v1::create_user_todolist_todo,
        get "/api/todolist/{id}/todos/" => v1::list_todolist_todos,
        post "/api/todolist/{id}/todos/" => v1::create_todolist_todo,
        get "/api/todo/{id}/" => v1::get_todo,
        put "/api/todo/{id}/" => v1::update_todo,
        delete "/api/todo/{id}/" => v1::delete_todo,
    });

    let router = system_routes
        .merge(auth_routes)
        .merge(user_routes)
        .merge(todo_list_routes)
        .merge(todo_routes);

    let router = if enable_docs {
        router.merge(Scalar::with_url("/docs", ApiDoc::openapi()))
    } else {
        router
    };

    router.with_state(state)
}
