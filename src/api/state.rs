//! Application state for the API server.

use std::sync::Arc;

use super::urls::UrlBuilder;
use crate::auth::SessionManager;
use crate::db::Database;

/// Shared application state.
///
/// Generic over `D: Database` so tests can run against an in-memory store.
/// The session manager loads users from the same database handle.
pub struct AppState<D: Database> {
    db: Arc<D>,
    sessions: Arc<SessionManager<Arc<D>>>,
    urls: UrlBuilder,
}

// Manual Clone impl - only the Arcs are cloned, D need not be Clone
impl<D: Database> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            sessions: Arc::clone(&self.sessions),
            urls: self.urls.clone(),
        }
    }
}

impl<D: Database> AppState<D> {
    /// Create the state from a database and the URL builder used for
    /// resource links.
    pub fn new(db: D, urls: UrlBuilder) -> Self {
        let db = Arc::new(db);
        let sessions = Arc::new(SessionManager::new(Arc::clone(&db)));
        Self { db, sessions, urls }
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &D {
        &self.db
    }

    /// Get a reference to the session table.
    pub fn sessions(&self) -> &SessionManager<Arc<D>> {
        &self.sessions
    }

    /// Get a reference to the URL builder.
    pub fn urls(&self) -> &UrlBuilder {
        &self.urls
    }
}
