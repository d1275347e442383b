//! Tests for token sessions.

use std::sync::Arc;

use crate::auth::session::{SessionManager, UserLoader};
use crate::db::{Database, DbResult, Id, SqliteDatabase, User, UserRepository};

async fn setup() -> (Arc<SqliteDatabase>, User) {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");

    let user = User::new("adam", "adam@example.com", "pw").unwrap();
    let user = db.users().save(&user).await.unwrap().saved().unwrap();
    (Arc::new(db), user)
}

/// Loader that knows about nobody.
struct EmptyLoader;

impl UserLoader for EmptyLoader {
    async fn load_user(&self, _user_id: Id) -> DbResult<Option<User>> {
        Ok(None)
    }

    async fn find_user(&self, _username: &str) -> DbResult<Option<User>> {
        Ok(None)
    }

    async fn touch(&self, _user: &mut User) -> DbResult<()> {
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn open_and_resolve_session() {
    let (db, user) = setup().await;
    let sessions = SessionManager::new(Arc::clone(&db));

    let token = sessions.open(&user).expect("saved user gets a token");
    assert!(!token.is_empty());
    assert_eq!(sessions.len(), 1);

    let resolved = sessions
        .resolve(&token)
        .await
        .expect("resolve should succeed")
        .expect("token should resolve");
    assert_eq!(resolved.id, user.id);
    assert_eq!(resolved.username(), "adam");
}

#[tokio::test(flavor = "multi_thread")]
async fn tokens_are_unique() {
    let (db, user) = setup().await;
    let sessions = SessionManager::new(db);

    let first = sessions.open(&user).unwrap();
    let second = sessions.open(&user).unwrap();
    assert_ne!(first, second);
    assert_eq!(sessions.len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn unsaved_user_gets_no_session() {
    let (db, _) = setup().await;
    let sessions = SessionManager::new(db);

    let unsaved = User::new("eve", "eve@example.com", "pw").unwrap();
    assert_eq!(sessions.open(&unsaved), None);
    assert!(sessions.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_token_resolves_to_none() {
    let (db, _) = setup().await;
    let sessions = SessionManager::new(db);

    assert!(sessions.resolve("nope").await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn logout_ends_session() {
    let (db, user) = setup().await;
    let sessions = SessionManager::new(db);

    let token = sessions.open(&user).unwrap();
    assert!(sessions.logout(&token));
    assert!(!sessions.logout(&token));
    assert!(sessions.resolve(&token).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn session_of_deleted_user_is_dropped() {
    let (db, user) = setup().await;
    let sessions = SessionManager::new(Arc::clone(&db));

    let token = sessions.open(&user).unwrap();
    db.users().delete(user.id.unwrap()).await.unwrap();

    assert!(sessions.resolve(&token).await.unwrap().is_none());
    assert!(sessions.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn loader_is_the_only_source_of_users() {
    let (_, user) = setup().await;
    let sessions = SessionManager::new(EmptyLoader);

    let token = sessions.open(&user).unwrap();
    assert!(sessions.resolve(&token).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn login_with_right_password_issues_resolvable_token() {
    let (db, user) = setup().await;
    let sessions = SessionManager::new(Arc::clone(&db));

    let (token, logged_in) = sessions
        .login("adam", "pw")
        .await
        .unwrap()
        .expect("credentials are valid");
    assert_eq!(logged_in.id, user.id);

    let resolved = sessions.resolve(&token).await.unwrap().unwrap();
    assert_eq!(resolved.username(), "adam");
}

#[tokio::test(flavor = "multi_thread")]
async fn login_marks_user_as_seen() {
    let (db, user) = setup().await;
    let sessions = SessionManager::new(Arc::clone(&db));

    sessions.login("adam", "pw").await.unwrap().unwrap();

    let stored = db.users().get(user.id.unwrap()).await.unwrap();
    assert!(stored.last_seen >= user.last_seen);
}

#[tokio::test(flavor = "multi_thread")]
async fn login_rejects_bad_credentials() {
    let (db, _) = setup().await;
    let sessions = SessionManager::new(db);

    assert!(sessions.login("adam", "wrong").await.unwrap().is_none());
    assert!(sessions.login("nobody", "pw").await.unwrap().is_none());
    assert!(sessions.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn login_goes_through_the_loader() {
    let sessions = SessionManager::new(EmptyLoader);
    assert!(sessions.login("adam", "pw").await.unwrap().is_none());
}

/// Loader whose user is deleted right after it is looked up.
struct DeletingLoader(Arc<SqliteDatabase>);

impl UserLoader for DeletingLoader {
    async fn load_user(&self, user_id: Id) -> DbResult<Option<User>> {
        self.0.load_user(user_id).await
    }

    async fn find_user(&self, username: &str) -> DbResult<Option<User>> {
        let user = self.0.find_user(username).await?;
        if let Some(id) = user.as_ref().and_then(|u| u.id) {
            self.0.users().delete(id).await?;
        }
        Ok(user)
    }

    async fn touch(&self, user: &mut User) -> DbResult<()> {
        self.0.touch(user).await
    }
}

/// Loader whose user is promoted right after it is looked up.
struct PromotingLoader(Arc<SqliteDatabase>);

impl UserLoader for PromotingLoader {
    async fn load_user(&self, user_id: Id) -> DbResult<Option<User>> {
        self.0.load_user(user_id).await
    }

    async fn find_user(&self, username: &str) -> DbResult<Option<User>> {
        let user = self.0.find_user(username).await?;
        if let Some(mut other) = self.0.find_user(username).await? {
            self.0.users().promote_to_admin(&mut other).await?;
        }
        Ok(user)
    }

    async fn touch(&self, user: &mut User) -> DbResult<()> {
        self.0.touch(user).await
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn login_of_user_deleted_mid_login_fails_cleanly() {
    let (db, _) = setup().await;
    let sessions = SessionManager::new(DeletingLoader(Arc::clone(&db)));

    let outcome = sessions.login("adam", "pw").await.expect("no storage error");
    assert!(outcome.is_none());
    assert!(sessions.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn login_keeps_concurrent_promotion() {
    let (db, user) = setup().await;
    let sessions = SessionManager::new(PromotingLoader(Arc::clone(&db)));

    let (_, logged_in) = sessions.login("adam", "pw").await.unwrap().unwrap();
    assert!(!logged_in.is_admin);

    let stored = db.users().get(user.id.unwrap()).await.unwrap();
    assert!(stored.is_admin);
}

#[tokio::test]
async fn login_works_on_current_thread_runtime() {
    let (db, _) = setup().await;
    let sessions = SessionManager::new(db);

    assert!(sessions.login("adam", "pw").await.unwrap().is_some());
    assert!(sessions.login("adam", "wrong").await.unwrap().is_none());
}
