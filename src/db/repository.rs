//! Repository traits for data access abstraction.
//!
//! These traits define the contract for data access, allowing different
//! storage backends to be swapped without changing business logic. Every
//! method returns a `Send` future so the HTTP layer can stay generic over
//! the backend.

use std::future::Future;

use crate::db::{
    DbResult,
    models::{Id, NewTodo, NewTodoList, NewUser, SaveOutcome, Todo, TodoList, User},
};

/// Repository for User operations.
pub trait UserRepository: Send + Sync {
    /// Insert the user if it has no id yet, update it otherwise.
    fn save(&self, user: &User) -> impl Future<Output = DbResult<SaveOutcome<User>>> + Send;

    /// Build a user from registration fields and save it.
    fn create_from(
        &self,
        fields: NewUser,
    ) -> impl Future<Output = DbResult<SaveOutcome<User>>> + Send {
        async move {
            // Argon2 hashing is CPU-bound
            let user = tokio::task::spawn_blocking(move || User::try_from(fields)).await??;
            self.save(&user).await
        }
    }

    /// Get a user by numeric ID.
    fn get(&self, id: Id) -> impl Future<Output = DbResult<User>> + Send;

    /// Get a user by username.
    fn get_by_username(&self, username: &str) -> impl Future<Output = DbResult<User>> + Send;

    /// Get all users ordered by username.
    fn list(&self) -> impl Future<Output = DbResult<Vec<User>>> + Send;

    /// Count registered users.
    fn count(&self) -> impl Future<Output = DbResult<usize>> + Send;

    /// Delete a user by ID. Lists and todos referencing the user are kept.
    fn delete(&self, id: Id) -> impl Future<Output = DbResult<()>> + Send;

    /// Record activity: bump `last_seen` and persist only that column.
    fn seen(&self, user: &mut User) -> impl Future<Output = DbResult<SaveOutcome<User>>> + Send;

    /// Grant the admin flag and persist only that column.
    fn promote_to_admin(
        &self,
        user: &mut User,
    ) -> impl Future<Output = DbResult<SaveOutcome<User>>> + Send;
}

/// Repository for TodoList operations.
pub trait TodoListRepository: Send + Sync {
    /// Insert the list if it has no id yet, update it otherwise.
    fn save(
        &self,
        todo_list: &TodoList,
    ) -> impl Future<Output = DbResult<SaveOutcome<TodoList>>> + Send;

    /// Build a list from fields and save it.
    fn create_from(
        &self,
        fields: NewTodoList,
    ) -> impl Future<Output = DbResult<SaveOutcome<TodoList>>> + Send {
        async move { self.save(&TodoList::from(fields)).await }
    }

    /// Get a list by ID.
    fn get(&self, id: Id) -> impl Future<Output = DbResult<TodoList>> + Send;

    /// Get all lists, oldest first.
    fn list(&self) -> impl Future<Output = DbResult<Vec<TodoList>>> + Send;

    /// Get the lists created by a user, oldest first.
    fn list_by_creator(
        &self,
        username: &str,
    ) -> impl Future<Output = DbResult<Vec<TodoList>>> + Send;

    /// Count the lists created by a user.
    fn count_by_creator(&self, username: &str) -> impl Future<Output = DbResult<usize>> + Send;

    /// Delete a list by ID. Its todos are left in place.
    fn delete(&self, id: Id) -> impl Future<Output = DbResult<()>> + Send;

    /// Validate and apply a new title, then persist.
    fn change_title(
        &self,
        todo_list: &mut TodoList,
        title: &str,
    ) -> impl Future<Output = DbResult<SaveOutcome<TodoList>>> + Send {
        async move {
            todo_list.set_title(title)?;
            self.save(todo_list).await
        }
    }
}

/// Repository for Todo operations.
pub trait TodoRepository: Send + Sync {
    /// Insert the todo if it has no id yet, update it otherwise.
    fn save(&self, todo: &Todo) -> impl Future<Output = DbResult<SaveOutcome<Todo>>> + Send;

    /// Build a todo from fields and save it.
    fn create_from(
        &self,
        fields: NewTodo,
    ) -> impl Future<Output = DbResult<SaveOutcome<Todo>>> + Send {
        async move {
            let todo = Todo::try_from(fields)?;
            self.save(&todo).await
        }
    }

    /// Get a todo by ID.
    fn get(&self, id: Id) -> impl Future<Output = DbResult<Todo>> + Send;

    /// Get all todos in a list, oldest first.
    fn list_for(&self, todolist_id: Id) -> impl Future<Output = DbResult<Vec<Todo>>> + Send;

    /// Count all todos in a list.
    fn count_for(&self, todolist_id: Id) -> impl Future<Output = DbResult<usize>> + Send;

    /// Count the todos in a list with the given completion state.
    fn count_by_status(
        &self,
        todolist_id: Id,
        finished: bool,
    ) -> impl Future<Output = DbResult<usize>> + Send;

    /// Delete a todo by ID.
    fn delete(&self, id: Id) -> impl Future<Output = DbResult<()>> + Send;

    /// Mark the todo finished and persist.
    fn finished(&self, todo: &mut Todo) -> impl Future<Output = DbResult<SaveOutcome<Todo>>> + Send {
        async move {
            todo.mark_finished();
            self.save(todo).await
        }
    }

    /// Reopen the todo and persist.
    fn reopen(&self, todo: &mut Todo) -> impl Future<Output = DbResult<SaveOutcome<Todo>>> + Send {
        async move {
            todo.mark_open();
            self.save(todo).await
        }
    }
}

/// Combined database interface.
pub trait Database: Send + Sync + 'static {
    type Users<'a>: UserRepository
    where
        Self: 'a;
    type TodoLists<'a>: TodoListRepository
    where
        Self: 'a;
    type Todos<'a>: TodoRepository
    where
        Self: 'a;

    /// Run pending migrations.
    fn migrate(&self) -> impl Future<Output = DbResult<()>> + Send;

    /// Get the user repository.
    fn users(&self) -> Self::Users<'_>;

    /// Get the todo list repository.
    fn todo_lists(&self) -> Self::TodoLists<'_>;

    /// Get the todo repository.
    fn todos(&self) -> Self::Todos<'_>;
}
