//! Tests for field validation rules.

use crate::db::validation::*;

#[test]
fn check_length_rejects_empty_and_overlong() {
    assert!(!check_length("", 10));
    assert!(check_length("a", 10));
    assert!(check_length(&"a".repeat(10), 10));
    assert!(!check_length(&"a".repeat(11), 10));
}

#[test]
fn check_length_counts_characters_not_bytes() {
    // 64 two-byte characters is still 64 characters
    assert!(check_length(&"ü".repeat(64), 64));
}

#[test]
fn username_accepts_plain_names() {
    assert!(validate_username("adam").is_ok());
    assert!(validate_username("adam.smith_42").is_ok());
    assert!(validate_username(&"a".repeat(64)).is_ok());
}

#[test]
fn username_rejects_whitespace_empty_and_overlong() {
    for name in ["", "adam smith", " adam", "adam\t", "ad\nam"] {
        assert_eq!(
            validate_username(name),
            Err(ValidationError::InvalidUsername(name.to_string())),
            "{name:?} should be rejected"
        );
    }
    assert!(validate_username(&"a".repeat(65)).is_err());
}

#[test]
fn email_accepts_simple_addresses() {
    assert!(validate_email("adam@example.com").is_ok());
    assert!(validate_email("a@b.c").is_ok());
}

#[test]
fn email_rejects_malformed_addresses() {
    for email in [
        "",
        "adam",
        "adam@example",
        "@example.com",
        "adam@.com",
        "adam@example.",
        "adam smith@example.com",
    ] {
        assert!(validate_email(email).is_err(), "{email:?} should be rejected");
    }
}

#[test]
fn email_rejects_overlong_addresses() {
    let local = "a".repeat(60);
    assert!(validate_email(&format!("{local}@b.co")).is_err());
}

#[test]
fn title_limits() {
    assert!(validate_title("groceries").is_ok());
    assert!(validate_title(&"t".repeat(128)).is_ok());
    assert!(validate_title("").is_err());
    assert!(validate_title(&"t".repeat(129)).is_err());
}

#[test]
fn description_limits() {
    assert!(validate_description("buy milk").is_ok());
    assert!(validate_description("").is_err());
    assert!(validate_description(&"d".repeat(129)).is_err());
}
