//! Credentials and sessions.
//!
//! - `password`: Argon2id hashing behind the [`PasswordHasher`] trait
//! - `session`: bearer-token sessions resolved through a [`UserLoader`]

pub mod password;
pub mod session;

#[cfg(test)]
mod session_test;

pub use password::{Argon2Hasher, PasswordHasher};
pub use session::{SessionManager, UserLoader};
