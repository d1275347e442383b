//! Domain models for the to-do database.
//!
//! These models are storage-agnostic. Fields with a format constraint or an
//! invariant are private and only change through validating setters.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::validation::{
    PASSWORD_HASH_MAX_LEN, ValidationError, check_length, validate_description, validate_email,
    validate_title, validate_username,
};
use crate::auth::password::{Argon2Hasher, PasswordHasher};

/// Integer surrogate key used by every table.
pub type Id = i64;

pub const DEFAULT_TITLE: &str = "untitled";

// =============================================================================
// Save outcome
// =============================================================================

/// Result of an upsert.
///
/// A uniqueness violation is not an error: the write is rolled back and the
/// caller gets `Rejected` with the store's reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome<T> {
    Saved(T),
    Rejected(SaveRejection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRejection {
    pub entity_type: String,
    pub reason: String,
}

impl<T> SaveOutcome<T> {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_))
    }

    pub fn saved(self) -> Option<T> {
        match self {
            SaveOutcome::Saved(entity) => Some(entity),
            SaveOutcome::Rejected(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SaveOutcome<U> {
        match self {
            SaveOutcome::Saved(entity) => SaveOutcome::Saved(f(entity)),
            SaveOutcome::Rejected(rejection) => SaveOutcome::Rejected(rejection),
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered account.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: Option<Id>,
    username: String,
    email: String,
    password_hash: Option<String>,
    pub member_since: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub is_admin: bool,
}

impl User {
    /// Build a new, unsaved user. Every field is validated and the password
    /// is hashed with Argon2id.
    pub fn new(username: &str, email: &str, password: &str) -> Result<Self, ValidationError> {
        let now = Utc::now();
        let mut user = User {
            id: None,
            username: String::new(),
            email: String::new(),
            password_hash: None,
            member_since: now,
            last_seen: now,
            is_admin: false,
        };
        user.set_username(username)?;
        user.set_email(email)?;
        user.set_password(password)?;
        Ok(user)
    }

    /// Rebuild a user from stored columns without re-validating.
    pub(crate) fn from_row(
        id: Id,
        username: String,
        email: String,
        password_hash: Option<String>,
        member_since: DateTime<Utc>,
        last_seen: DateTime<Utc>,
        is_admin: bool,
    ) -> Self {
        User {
            id: Some(id),
            username,
            email,
            password_hash,
            member_since,
            last_seen,
            is_admin,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn set_username(&mut self, username: &str) -> Result<(), ValidationError> {
        validate_username(username)?;
        self.username = username.to_string();
        Ok(())
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: &str) -> Result<(), ValidationError> {
        validate_email(email)?;
        self.email = email.to_string();
        Ok(())
    }

    pub fn set_password(&mut self, password: &str) -> Result<(), ValidationError> {
        self.set_password_with(password, &Argon2Hasher)
    }

    pub fn set_password_with(
        &mut self,
        password: &str,
        hasher: &impl PasswordHasher,
    ) -> Result<(), ValidationError> {
        if password.is_empty() {
            return Err(ValidationError::EmptyPassword);
        }
        let hashed = hasher.hash(password).map_err(ValidationError::HashFailed)?;
        if !check_length(&hashed, PASSWORD_HASH_MAX_LEN) {
            return Err(ValidationError::HashTooLong);
        }
        self.password_hash = Some(hashed);
        Ok(())
    }

    pub fn verify_password(&self, password: &str) -> bool {
        self.verify_password_with(password, &Argon2Hasher)
    }

    pub fn verify_password_with(&self, password: &str, hasher: &impl PasswordHasher) -> bool {
        match &self.password_hash {
            Some(hash) => hasher.verify(password, hash),
            None => false,
        }
    }

    /// Stored hash, for the persistence layer only.
    pub(crate) fn password_hash(&self) -> Option<&str> {
        self.password_hash.as_deref()
    }

    pub fn mark_seen(&mut self) {
        self.last_seen = Utc::now();
    }

    pub fn grant_admin(&mut self) {
        self.is_admin = true;
    }
}

// The hash stays out of debug output.
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.is_admin { "Admin" } else { "User" };
        write!(f, "<{} {}>", kind, self.username)
    }
}

/// Fields accepted when registering a user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl TryFrom<NewUser> for User {
    type Error = ValidationError;

    fn try_from(fields: NewUser) -> Result<Self, Self::Error> {
        User::new(&fields.username, &fields.email, &fields.password)
    }
}

// =============================================================================
// TodoList
// =============================================================================

/// A titled collection of todos, optionally owned by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoList {
    pub id: Option<Id>,
    title: String,
    pub created_at: DateTime<Utc>,
    pub creator: Option<String>,
}

impl TodoList {
    /// Build a new, unsaved list. A missing or invalid title becomes
    /// [`DEFAULT_TITLE`].
    pub fn new(title: Option<&str>, creator: Option<String>) -> Self {
        let title = title
            .filter(|t| Self::is_valid_title(t))
            .unwrap_or(DEFAULT_TITLE);
        TodoList {
            id: None,
            title: title.to_string(),
            created_at: Utc::now(),
            creator,
        }
    }

    pub(crate) fn from_row(
        id: Id,
        title: String,
        created_at: DateTime<Utc>,
        creator: Option<String>,
    ) -> Self {
        TodoList {
            id: Some(id),
            title,
            created_at,
            creator,
        }
    }

    pub fn is_valid_title(title: &str) -> bool {
        validate_title(title).is_ok()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), ValidationError> {
        validate_title(title)?;
        self.title = title.to_string();
        Ok(())
    }
}

/// Fields accepted when creating a list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTodoList {
    pub title: Option<String>,
    pub creator: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<NewTodoList> for TodoList {
    fn from(fields: NewTodoList) -> Self {
        let mut list = TodoList::new(fields.title.as_deref(), fields.creator);
        if let Some(created_at) = fields.created_at {
            list.created_at = created_at;
        }
        list
    }
}

// =============================================================================
// Todo
// =============================================================================

/// Completion state of a todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoStatus {
    Open,
    Finished,
}

impl std::fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TodoStatus::Open => write!(f, "open"),
            TodoStatus::Finished => write!(f, "finished"),
        }
    }
}

/// A single item in a list.
///
/// `finished_at` is set exactly when `is_finished` is true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: Option<Id>,
    description: String,
    pub created_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    is_finished: bool,
    pub creator: Option<String>,
    pub todolist_id: Id,
}

impl Todo {
    pub fn new(
        description: &str,
        todolist_id: Id,
        creator: Option<String>,
    ) -> Result<Self, ValidationError> {
        validate_description(description)?;
        Ok(Todo {
            id: None,
            description: description.to_string(),
            created_at: Utc::now(),
            finished_at: None,
            is_finished: false,
            creator,
            todolist_id,
        })
    }

    pub(crate) fn from_row(
        id: Id,
        description: String,
        created_at: DateTime<Utc>,
        finished_at: Option<DateTime<Utc>>,
        is_finished: bool,
        creator: Option<String>,
        todolist_id: Id,
    ) -> Self {
        Todo {
            id: Some(id),
            description,
            created_at,
            finished_at,
            is_finished,
            creator,
            todolist_id,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_finished(&self) -> bool {
        self.is_finished
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn status(&self) -> TodoStatus {
        if self.is_finished {
            TodoStatus::Finished
        } else {
            TodoStatus::Open
        }
    }

    /// Move to `finished`, stamping `finished_at`. Allowed from either state.
    pub fn mark_finished(&mut self) {
        self.is_finished = true;
        self.finished_at = Some(Utc::now());
    }

    /// Move back to `open`, clearing `finished_at`.
    pub fn mark_open(&mut self) {
        self.is_finished = false;
        self.finished_at = None;
    }
}

/// Fields accepted when adding a todo to a list.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTodo {
    pub description: String,
    pub todolist_id: Id,
    pub creator: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl TryFrom<NewTodo> for Todo {
    type Error = ValidationError;

    fn try_from(fields: NewTodo) -> Result<Self, Self::Error> {
        let mut todo = Todo::new(&fields.description, fields.todolist_id, fields.creator)?;
        if let Some(created_at) = fields.created_at {
            todo.created_at = created_at;
        }
        Ok(todo)
    }
}
