//! Password hashing.
//!
//! Passwords are only ever stored as salted Argon2id PHC strings. The
//! [`PasswordHasher`] trait lets callers swap the algorithm (tests use it to
//! force oversized hashes).

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};

/// Hashes and verifies passwords.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing hash string.
    fn hash(&self, password: &str) -> Result<String, String>;

    /// Check a plaintext candidate against a stored hash.
    ///
    /// Mismatches and unparsable hashes both yield `false`.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id with the crate's default parameters and a random 16-byte salt.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| e.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
