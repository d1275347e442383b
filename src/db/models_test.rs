//! Tests for domain models.

use crate::auth::password::PasswordHasher;
use crate::db::models::*;
use crate::db::validation::ValidationError;

/// Produces hashes one character longer than the column allows.
struct OversizedHasher;

impl PasswordHasher for OversizedHasher {
    fn hash(&self, _password: &str) -> Result<String, String> {
        Ok("x".repeat(129))
    }

    fn verify(&self, _password: &str, _hash: &str) -> bool {
        false
    }
}

fn adam() -> User {
    User::new("adam", "adam@example.com", "correct horse").expect("valid user")
}

// =============================================================================
// User
// =============================================================================

#[test]
fn new_user_defaults() {
    let user = adam();
    assert_eq!(user.id, None);
    assert_eq!(user.username(), "adam");
    assert_eq!(user.email(), "adam@example.com");
    assert!(!user.is_admin);
    assert_eq!(user.member_since, user.last_seen);
}

#[test]
fn new_user_rejects_invalid_username() {
    let err = User::new("adam smith", "adam@example.com", "pw").unwrap_err();
    assert_eq!(
        err,
        ValidationError::InvalidUsername("adam smith".to_string())
    );
}

#[test]
fn new_user_rejects_invalid_email() {
    let err = User::new("adam", "not-an-email", "pw").unwrap_err();
    assert_eq!(err, ValidationError::InvalidEmail("not-an-email".to_string()));
}

#[test]
fn set_username_keeps_old_value_on_failure() {
    let mut user = adam();
    assert!(user.set_username(&"a".repeat(65)).is_err());
    assert_eq!(user.username(), "adam");
}

#[test]
fn empty_password_is_rejected() {
    assert_eq!(
        User::new("adam", "adam@example.com", "").unwrap_err(),
        ValidationError::EmptyPassword
    );

    let mut user = adam();
    assert_eq!(user.set_password(""), Err(ValidationError::EmptyPassword));
}

#[test]
fn password_is_hashed_not_stored() {
    let user = adam();
    let hash = user.password_hash().expect("hash is set");
    assert_ne!(hash, "correct horse");
    assert!(!hash.contains("correct horse"));
    assert!(hash.starts_with("$argon2id$"));
    assert!(hash.len() <= 128);
}

#[test]
fn verify_password_matches_only_original() {
    let user = adam();
    assert!(user.verify_password("correct horse"));
    assert!(!user.verify_password("correct horse "));
    assert!(!user.verify_password("wrong"));
    assert!(!user.verify_password(""));
}

#[test]
fn changing_password_invalidates_old_one() {
    let mut user = adam();
    user.set_password("battery staple").unwrap();
    assert!(user.verify_password("battery staple"));
    assert!(!user.verify_password("correct horse"));
}

#[test]
fn oversized_hash_is_rejected() {
    let mut user = adam();
    let err = user
        .set_password_with("anything", &OversizedHasher)
        .unwrap_err();
    assert_eq!(err, ValidationError::HashTooLong);
    // The previous hash survives
    assert!(user.verify_password("correct horse"));
}

#[test]
fn debug_output_hides_hash() {
    let mut user = adam();
    assert_eq!(format!("{user:?}"), "<User adam>");
    user.grant_admin();
    assert_eq!(format!("{user:?}"), "<Admin adam>");
}

#[test]
fn user_from_registration_fields() {
    let user = User::try_from(NewUser {
        username: "eve".to_string(),
        email: "eve@example.com".to_string(),
        password: "secret".to_string(),
    })
    .unwrap();
    assert_eq!(user.username(), "eve");
    assert!(user.verify_password("secret"));
}

// =============================================================================
// TodoList
// =============================================================================

#[test]
fn todo_list_without_title_is_untitled() {
    let list = TodoList::new(None, None);
    assert_eq!(list.title(), "untitled");
    assert_eq!(list.creator, None);
}

#[test]
fn todo_list_keeps_given_title() {
    let list = TodoList::new(Some("groceries"), Some("adam".to_string()));
    assert_eq!(list.title(), "groceries");
    assert_eq!(list.creator.as_deref(), Some("adam"));
}

#[test]
fn todo_list_invalid_title_falls_back_to_default() {
    assert_eq!(TodoList::new(Some(""), None).title(), DEFAULT_TITLE);
    assert_eq!(
        TodoList::new(Some(&"t".repeat(129)), None).title(),
        DEFAULT_TITLE
    );
}

#[test]
fn set_title_validates() {
    let mut list = TodoList::new(Some("groceries"), None);
    assert!(list.set_title("").is_err());
    assert_eq!(list.title(), "groceries");
    list.set_title("hardware store").unwrap();
    assert_eq!(list.title(), "hardware store");
}

#[test]
fn is_valid_title_checks_length() {
    assert!(TodoList::is_valid_title("a"));
    assert!(!TodoList::is_valid_title(""));
    assert!(!TodoList::is_valid_title(&"a".repeat(129)));
}

// =============================================================================
// Todo
// =============================================================================

#[test]
fn new_todo_is_open() {
    let todo = Todo::new("buy milk", 1, None).unwrap();
    assert_eq!(todo.status(), TodoStatus::Open);
    assert_eq!(todo.status().to_string(), "open");
    assert!(!todo.is_finished());
    assert_eq!(todo.finished_at(), None);
}

#[test]
fn finishing_and_reopening_keeps_timestamp_in_step() {
    let mut todo = Todo::new("buy milk", 1, None).unwrap();

    todo.mark_finished();
    assert!(todo.is_finished());
    assert!(todo.finished_at().is_some());
    assert_eq!(todo.status().to_string(), "finished");

    todo.mark_open();
    assert!(!todo.is_finished());
    assert_eq!(todo.finished_at(), None);
    assert_eq!(todo.status(), TodoStatus::Open);
}

#[test]
fn double_transitions_are_allowed() {
    let mut todo = Todo::new("buy milk", 1, None).unwrap();
    todo.mark_finished();
    todo.mark_finished();
    assert!(todo.is_finished());
    todo.mark_open();
    todo.mark_open();
    assert!(!todo.is_finished());
}

#[test]
fn todo_rejects_invalid_description() {
    assert!(Todo::new("", 1, None).is_err());
    assert!(Todo::new(&"d".repeat(129), 1, None).is_err());
}

// =============================================================================
// SaveOutcome
// =============================================================================

#[test]
fn save_outcome_helpers() {
    let saved: SaveOutcome<i64> = SaveOutcome::Saved(3);
    assert!(saved.is_saved());
    assert_eq!(saved.clone().map(|v| v * 2), SaveOutcome::Saved(6));
    assert_eq!(saved.saved(), Some(3));

    let rejected: SaveOutcome<i64> = SaveOutcome::Rejected(SaveRejection {
        entity_type: "User".to_string(),
        reason: "UNIQUE constraint failed".to_string(),
    });
    assert!(!rejected.is_saved());
    assert_eq!(rejected.saved(), None);
}
