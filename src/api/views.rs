//! External representations of the entities.
//!
//! Each view carries exactly the keys clients see; counts come from scoped
//! repository queries and related resources are linked through [`UrlBuilder`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::urls::UrlBuilder;
use crate::db::{
    Database, DbError, DbResult, Id, Todo, TodoList, TodoListRepository, TodoRepository, User,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct UserView {
    #[schema(example = "adam")]
    pub username: String,
    #[schema(example = "http://localhost:3000/api/user/adam/")]
    pub user_url: String,
    pub member_since: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    /// URL of the user's todo lists
    #[schema(example = "http://localhost:3000/api/user/adam/todolists/")]
    pub todolists: String,
    #[schema(example = 2)]
    pub todolist_count: usize,
}

impl UserView {
    pub async fn project<D: Database>(user: &User, db: &D, urls: &UrlBuilder) -> DbResult<Self> {
        let todolist_count = db.todo_lists().count_by_creator(user.username()).await?;

        Ok(Self {
            username: user.username().to_string(),
            user_url: urls.user(user.username()),
            member_since: user.member_since,
            last_seen: user.last_seen,
            todolists: urls.user_todolists(user.username()),
            todolist_count,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TodoListView {
    #[schema(example = "groceries")]
    pub title: String,
    #[schema(example = "adam")]
    pub creator: Option<String>,
    pub created_at: DateTime<Utc>,
    #[schema(example = 3)]
    pub total_todo_count: usize,
    #[schema(example = 2)]
    pub open_todo_count: usize,
    #[schema(example = 1)]
    pub finished_todo_count: usize,
    /// URL of the list's todos; user-scoped when the list has a creator
    #[schema(example = "http://localhost:3000/api/user/adam/todolist/1/todos/")]
    pub todos: String,
}

impl TodoListView {
    pub async fn project<D: Database>(
        todo_list: &TodoList,
        db: &D,
        urls: &UrlBuilder,
    ) -> DbResult<Self> {
        let id = saved_id("TodoList", todo_list.id)?;
        let todos = db.todos();

        let total_todo_count = todos.count_for(id).await?;
        let open_todo_count = todos.count_by_status(id, false).await?;
        let finished_todo_count = todos.count_by_status(id, true).await?;

        let todos_url = match &todo_list.creator {
            Some(creator) => urls.user_todolist_todos(creator, id),
            None => urls.todolist_todos(id),
        };

        Ok(Self {
            title: todo_list.title().to_string(),
            creator: todo_list.creator.clone(),
            created_at: todo_list.created_at,
            total_todo_count,
            open_todo_count,
            finished_todo_count,
            todos: todos_url,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TodoView {
    #[schema(example = "buy milk")]
    pub description: String,
    #[schema(example = "adam")]
    pub creator: Option<String>,
    pub created_at: DateTime<Utc>,
    #[schema(example = "open")]
    pub status: String,
}

impl From<&Todo> for TodoView {
    fn from(todo: &Todo) -> Self {
        Self {
            description: todo.description().to_string(),
            creator: todo.creator.clone(),
            created_at: todo.created_at,
            status: todo.status().to_string(),
        }
    }
}

/// Views link to related resources by id, so the entity must be stored.
fn saved_id(entity_type: &str, id: Option<Id>) -> DbResult<Id> {
    id.ok_or_else(|| DbError::not_found(entity_type, "<unsaved>"))
}
