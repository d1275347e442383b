//! Absolute URLs for the resources embedded in API responses.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::db::Id;

/// Characters left alone inside a path segment (RFC 3986 "unreserved").
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Builds external resource locators from a fixed base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    base: String,
}

impl UrlBuilder {
    /// `base` is scheme + authority (and optional prefix), e.g.
    /// `http://localhost:3000`. A trailing slash is ignored.
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn user(&self, username: &str) -> String {
        format!("{}/api/user/{}/", self.base, segment(username))
    }

    pub fn user_todolists(&self, username: &str) -> String {
        format!("{}/api/user/{}/todolists/", self.base, segment(username))
    }

    pub fn user_todolist_todos(&self, username: &str, todolist_id: Id) -> String {
        format!(
            "{}/api/user/{}/todolist/{}/todos/",
            self.base,
            segment(username),
            todolist_id
        )
    }

    pub fn todolist_todos(&self, todolist_id: Id) -> String {
        format!("{}/api/todolist/{}/todos/", self.base, todolist_id)
    }
}

fn segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}
