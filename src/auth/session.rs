//! Token sessions.
//!
//! A session maps an opaque bearer token to a user's numeric id. Turning the
//! id back into a [`User`] (and looking users up at login) is delegated to the [`UserLoader`] handed to
//! [`SessionManager::new`], so the manager never touches storage directly.

use std::future::Future;
use std::sync::Arc;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use dashmap::DashMap;
use tracing::{debug, warn};

use crate::db::{Database, DbError, DbResult, Id, SaveOutcome, User, UserRepository};

const TOKEN_BYTES: usize = 32;

/// User lookups a session manager needs.
pub trait UserLoader: Send + Sync {
    /// Load the user behind a session. `Ok(None)` when no such user exists
    /// (any more).
    fn load_user(&self, user_id: Id) -> impl Future<Output = DbResult<Option<User>>> + Send;

    /// Find the user attempting to log in.
    fn find_user(&self, username: &str) -> impl Future<Output = DbResult<Option<User>>> + Send;

    /// Record a successful login.
    fn touch(&self, user: &mut User) -> impl Future<Output = DbResult<()>> + Send;
}

impl<D: Database> UserLoader for Arc<D> {
    async fn load_user(&self, user_id: Id) -> DbResult<Option<User>> {
        found(self.users().get(user_id).await)
    }

    async fn find_user(&self, username: &str) -> DbResult<Option<User>> {
        found(self.users().get_by_username(username).await)
    }

    async fn touch(&self, user: &mut User) -> DbResult<()> {
        // A rejected save only loses the last_seen bump
        if let SaveOutcome::Rejected(rejection) = self.users().seen(user).await? {
            warn!(reason = %rejection.reason, "could not record login");
        }
        Ok(())
    }
}

fn found(result: DbResult<User>) -> DbResult<Option<User>> {
    match result {
        Ok(user) => Ok(Some(user)),
        Err(DbError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// In-memory session table.
pub struct SessionManager<L: UserLoader> {
    loader: L,
    sessions: DashMap<String, Id>,
}

impl<L: UserLoader> SessionManager<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            sessions: DashMap::new(),
        }
    }

    /// Check credentials and start a session.
    ///
    /// Returns the token and the (freshly seen) user, or `None` when the
    /// username is unknown, the password does not match, or the user was
    /// deleted before the login was recorded.
    pub async fn login(&self, username: &str, password: &str) -> DbResult<Option<(String, User)>> {
        let Some(user) = self.loader.find_user(username).await? else {
            debug!(username, "login for unknown user");
            return Ok(None);
        };

        // Argon2 verification is CPU-bound
        let password = password.to_owned();
        let (mut user, verified) = tokio::task::spawn_blocking(move || {
            let verified = user.verify_password(&password);
            (user, verified)
        })
        .await?;
        if !verified {
            debug!(username, "login with wrong password");
            return Ok(None);
        }

        match self.loader.touch(&mut user).await {
            Ok(()) => {}
            Err(DbError::NotFound { .. }) => {
                debug!(username, "user deleted during login");
                return Ok(None);
            }
            Err(e) => return Err(e),
        }
        Ok(self.open(&user).map(|token| (token, user)))
    }

    /// Start a session for a saved user and return its token.
    ///
    /// Returns `None` for a user that has never been saved.
    pub fn open(&self, user: &User) -> Option<String> {
        let user_id = user.id?;
        let token = generate_token();
        self.sessions.insert(token.clone(), user_id);
        debug!(user_id, "session opened");
        Some(token)
    }

    /// Resolve a token to its user.
    ///
    /// Unknown tokens and tokens whose user has been deleted yield `None`;
    /// the latter are dropped from the table.
    pub async fn resolve(&self, token: &str) -> DbResult<Option<User>> {
        let Some(user_id) = self.sessions.get(token).map(|entry| *entry.value()) else {
            return Ok(None);
        };

        let user = self.loader.load_user(user_id).await?;
        if user.is_none() {
            self.sessions.remove(token);
        }
        Ok(user)
    }

    /// End a session. Returns whether the token was known.
    pub fn logout(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
