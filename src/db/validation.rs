//! Field validation for the to-do entities.
//!
//! Rules are checked at assignment time, before anything reaches the store.

use std::sync::LazyLock;

use miette::Diagnostic;
use regex::Regex;
use thiserror::Error;

pub const USERNAME_MAX_LEN: usize = 64;
pub const EMAIL_MAX_LEN: usize = 64;
pub const PASSWORD_HASH_MAX_LEN: usize = 128;
pub const TITLE_MAX_LEN: usize = 128;
pub const DESCRIPTION_MAX_LEN: usize = 128;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid"));
static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+$").expect("username pattern is valid"));

/// A field failed its format or length constraint.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is not a valid username")]
    #[diagnostic(
        code(todolist::validation::username),
        help("usernames are 1 to 64 characters without whitespace")
    )]
    InvalidUsername(String),

    #[error("{0} is not a valid email address")]
    #[diagnostic(
        code(todolist::validation::email),
        help("expected something like name@example.com, at most 64 characters")
    )]
    InvalidEmail(String),

    #[error("no password given")]
    #[diagnostic(code(todolist::validation::empty_password))]
    EmptyPassword,

    #[error("not a valid password, hash is too long")]
    #[diagnostic(code(todolist::validation::hash_too_long))]
    HashTooLong,

    #[error("password could not be hashed: {0}")]
    #[diagnostic(code(todolist::validation::hash_failed))]
    HashFailed(String),

    #[error("{0} is not a valid title")]
    #[diagnostic(
        code(todolist::validation::title),
        help("titles are 1 to 128 characters")
    )]
    InvalidTitle(String),

    #[error("{0} is not a valid description")]
    #[diagnostic(
        code(todolist::validation::description),
        help("descriptions are 1 to 128 characters")
    )]
    InvalidDescription(String),
}

/// True iff `value` is non-empty and at most `max` characters long.
pub fn check_length(value: &str, max: usize) -> bool {
    !value.is_empty() && value.chars().count() <= max
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if check_length(username, USERNAME_MAX_LEN) && USERNAME_REGEX.is_match(username) {
        Ok(())
    } else {
        Err(ValidationError::InvalidUsername(username.to_string()))
    }
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if check_length(email, EMAIL_MAX_LEN) && EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if check_length(title, TITLE_MAX_LEN) {
        Ok(())
    } else {
        Err(ValidationError::InvalidTitle(title.to_string()))
    }
}

pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if check_length(description, DESCRIPTION_MAX_LEN) {
        Ok(())
    } else {
        Err(ValidationError::InvalidDescription(description.to_string()))
    }
}
