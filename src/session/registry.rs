//! Session Registry
//!
//! Tracks which account owns which connection. Two coupled maps form one
//! logical table: the durable `username -> User` store (all known accounts)
//! and the live `connection -> username` index (currently authenticated
//! connections only). Both sit behind a single lock so login, logout, and
//! register are atomic check-then-mutate transactions.

use std::collections::BTreeMap;

use tokio::sync::RwLock;
use tracing::debug;

/// Numeric identifier the transport assigns to each accepted connection.
pub type ConnectionId = u32;

/// An account record.
///
/// `token` and `connection` are `Some` exactly while the account holds a
/// live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique account name, immutable after creation.
    pub username: String,
    /// Plaintext credential, compared by exact match.
    pub password: String,
    /// Bearer token issued on login, cleared on logout.
    pub token: Option<String>,
    /// Connection bound while logged in.
    pub connection: Option<ConnectionId>,
}

impl User {
    /// Create an unauthenticated account record.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            token: None,
            connection: None,
        }
    }

    /// Compare a login attempt against the stored credential.
    ///
    /// The only place the password is inspected; swapping in a hashed
    /// scheme touches nothing outside this method.
    pub fn password_matches(&self, attempt: &str) -> bool {
        self.password == attempt
    }
}

/// Authentication failures. Each maps to exactly one protocol reply and
/// never propagates past the handler that observes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Username absent from the durable store.
    #[error("unknown username")]
    NoSuchUser,

    /// Password mismatch for a known username.
    #[error("password mismatch")]
    BadPassword,

    /// The account (or the connection) already holds a live session.
    #[error("already logged in")]
    DuplicateLogin,

    /// The connection holds no live session.
    #[error("not logged in")]
    NotLoggedIn,

    /// Username already exists in the durable store.
    #[error("username taken")]
    UsernameTaken,
}

#[derive(Debug, Default)]
struct RegistryInner {
    /// Durable identity store, superset of all known accounts.
    users: BTreeMap<String, User>,
    /// Live-session index, subset of authenticated connections.
    connected: BTreeMap<ConnectionId, String>,
}

/// The session registry and authentication state machine.
///
/// Per username the states are Anonymous (no live-index entry) and
/// Authenticated (bound to one connection and one token); only
/// [`SessionRegistry::login`], [`SessionRegistry::logout`], and
/// [`SessionRegistry::register`] transition between them.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    inner: RwLock<RegistryInner>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with accounts from the durable store.
    /// Loaded accounts start Anonymous regardless of persisted state.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let users = users
            .into_iter()
            .map(|mut user| {
                user.token = None;
                user.connection = None;
                (user.username.clone(), user)
            })
            .collect();
        Self {
            inner: RwLock::new(RegistryInner {
                users,
                connected: BTreeMap::new(),
            }),
        }
    }

    /// Authenticate `username` on `connection`.
    ///
    /// On success the account transitions Anonymous -> Authenticated and the
    /// fresh session token is returned. A duplicate attempt fails without
    /// disturbing the existing session.
    pub async fn login(
        &self,
        connection: ConnectionId,
        username: &str,
        password: &str,
    ) -> Result<String, AuthError> {
        let mut inner = self.inner.write().await;

        {
            let user = inner.users.get(username).ok_or(AuthError::NoSuchUser)?;
            if !user.password_matches(password) {
                return Err(AuthError::BadPassword);
            }
            if user.connection.is_some() {
                return Err(AuthError::DuplicateLogin);
            }
        }
        if inner.connected.contains_key(&connection) {
            return Err(AuthError::DuplicateLogin);
        }

        let token = issue_token();
        if let Some(user) = inner.users.get_mut(username) {
            user.token = Some(token.clone());
            user.connection = Some(connection);
        }
        inner.connected.insert(connection, username.to_string());
        debug!(connection, username, "session opened");
        Ok(token)
    }

    /// Terminate the session bound to `connection`.
    pub async fn logout(&self, connection: ConnectionId) -> Result<(), AuthError> {
        let mut inner = self.inner.write().await;

        let username = inner
            .connected
            .remove(&connection)
            .ok_or(AuthError::NotLoggedIn)?;
        if let Some(user) = inner.users.get_mut(&username) {
            user.token = None;
            user.connection = None;
        }
        debug!(connection, %username, "session closed");
        Ok(())
    }

    /// Create an account and authenticate it in one transaction.
    ///
    /// Registration and first login are atomic: no interleaving register or
    /// login for the same username can observe the account without its
    /// session.
    pub async fn register(
        &self,
        connection: ConnectionId,
        username: &str,
        password: &str,
    ) -> Result<String, AuthError> {
        let mut inner = self.inner.write().await;

        if inner.users.contains_key(username) {
            return Err(AuthError::UsernameTaken);
        }
        if inner.connected.contains_key(&connection) {
            return Err(AuthError::DuplicateLogin);
        }

        let token = issue_token();
        let mut user = User::new(username, password);
        user.token = Some(token.clone());
        user.connection = Some(connection);
        inner.users.insert(username.to_string(), user);
        inner.connected.insert(connection, username.to_string());
        debug!(connection, username, "account registered");
        Ok(token)
    }

    /// Whether `connection` currently holds a live session.
    pub async fn is_connected(&self, connection: ConnectionId) -> bool {
        self.inner.read().await.connected.contains_key(&connection)
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.inner.read().await.connected.len()
    }

    /// Live session token for `username`, if authenticated.
    pub async fn token_of(&self, username: &str) -> Option<String> {
        self.inner
            .read()
            .await
            .users
            .get(username)
            .and_then(|user| user.token.clone())
    }

    /// Snapshot of the durable store, for persistence at shutdown.
    pub async fn users(&self) -> Vec<User> {
        self.inner.read().await.users.values().cloned().collect()
    }
}

/// Issue a fresh session token: unpredictable, collision-free across
/// concurrently active sessions.
fn issue_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn seeded() -> SessionRegistry {
        SessionRegistry::with_users([User::new("ana", "1234"), User::new("jaime", "1234")])
    }

    #[tokio::test]
    async fn login_issues_token_and_binds_connection() {
        let registry = seeded();
        let token = registry.login(1, "ana", "1234").await.unwrap();
        assert!(!token.is_empty());
        assert!(registry.is_connected(1).await);
        assert_eq!(registry.token_of("ana").await, Some(token));
    }

    #[tokio::test]
    async fn unknown_user_and_bad_password_fail() {
        let registry = seeded();
        assert_eq!(
            registry.login(1, "nobody", "1234").await,
            Err(AuthError::NoSuchUser)
        );
        assert_eq!(
            registry.login(1, "ana", "wrong").await,
            Err(AuthError::BadPassword)
        );
        assert_eq!(registry.session_count().await, 0);
    }

    #[tokio::test]
    async fn duplicate_login_leaves_existing_session_untouched() {
        let registry = seeded();
        let token = registry.login(1, "ana", "1234").await.unwrap();

        // Same account from another connection.
        assert_eq!(
            registry.login(2, "ana", "1234").await,
            Err(AuthError::DuplicateLogin)
        );
        assert_eq!(registry.token_of("ana").await, Some(token));
        assert!(registry.is_connected(1).await);
        assert!(!registry.is_connected(2).await);
        assert_eq!(registry.session_count().await, 1);
    }

    #[tokio::test]
    async fn connection_cannot_hold_two_sessions() {
        let registry = seeded();
        registry.login(1, "ana", "1234").await.unwrap();
        assert_eq!(
            registry.login(1, "jaime", "1234").await,
            Err(AuthError::DuplicateLogin)
        );
    }

    #[tokio::test]
    async fn login_logout_login_cycle() {
        let registry = seeded();
        registry.login(1, "ana", "1234").await.unwrap();
        registry.logout(1).await.unwrap();
        assert_eq!(registry.token_of("ana").await, None);

        // Second login may arrive on a different connection.
        let token = registry.login(7, "ana", "1234").await.unwrap();
        assert!(registry.is_connected(7).await);
        assert_eq!(registry.token_of("ana").await, Some(token));
    }

    #[tokio::test]
    async fn logout_without_session_fails_and_preserves_index() {
        let registry = seeded();
        registry.login(1, "ana", "1234").await.unwrap();
        assert_eq!(registry.logout(99).await, Err(AuthError::NotLoggedIn));
        assert_eq!(registry.session_count().await, 1);
    }

    #[tokio::test]
    async fn register_authenticates_immediately() {
        let registry = seeded();
        let token = registry.register(3, "vico", "abcd").await.unwrap();
        assert!(registry.is_connected(3).await);
        assert_eq!(registry.token_of("vico").await, Some(token));
    }

    #[tokio::test]
    async fn register_taken_username_mutates_nothing() {
        let registry = seeded();
        let token = registry.login(1, "ana", "1234").await.unwrap();

        assert_eq!(
            registry.register(2, "ana", "hijacked").await,
            Err(AuthError::UsernameTaken)
        );

        // Existing credential and session both survive.
        let users = registry.users().await;
        let ana = users.iter().find(|u| u.username == "ana").unwrap();
        assert_eq!(ana.password, "1234");
        assert_eq!(ana.token.as_deref(), Some(token.as_str()));
        assert_eq!(registry.session_count().await, 1);
    }

    #[tokio::test]
    async fn concurrent_logins_exactly_one_wins() {
        for _ in 0..50 {
            let registry = Arc::new(seeded());

            let a = {
                let registry = registry.clone();
                tokio::spawn(async move { registry.login(1, "ana", "1234").await })
            };
            let b = {
                let registry = registry.clone();
                tokio::spawn(async move { registry.login(2, "ana", "1234").await })
            };

            let (ra, rb) = (a.await.unwrap(), b.await.unwrap());
            let oks = [&ra, &rb].iter().filter(|r| r.is_ok()).count();
            assert_eq!(oks, 1, "exactly one login must win: {ra:?} / {rb:?}");
            assert!(
                [&ra, &rb]
                    .iter()
                    .any(|r| **r == Err(AuthError::DuplicateLogin)),
                "the loser must observe a duplicate login"
            );
            assert_eq!(registry.session_count().await, 1);
        }
    }

    #[tokio::test]
    async fn concurrent_registrations_exactly_one_wins() {
        let registry = Arc::new(seeded());

        let a = {
            let registry = registry.clone();
            tokio::spawn(async move { registry.register(1, "dani", "x").await })
        };
        let b = {
            let registry = registry.clone();
            tokio::spawn(async move { registry.register(2, "dani", "y").await })
        };

        let (ra, rb) = (a.await.unwrap(), b.await.unwrap());
        let oks = [&ra, &rb].iter().filter(|r| r.is_ok()).count();
        assert_eq!(oks, 1);
        assert_eq!(registry.session_count().await, 1);
    }

    #[tokio::test]
    async fn tokens_are_unique_across_sessions() {
        let registry = seeded();
        let t1 = registry.login(1, "ana", "1234").await.unwrap();
        let t2 = registry.login(2, "jaime", "1234").await.unwrap();
        assert_ne!(t1, t2);
    }

    #[tokio::test]
    async fn loaded_users_start_anonymous() {
        let mut stale = User::new("ana", "1234");
        stale.token = Some("stale".to_string());
        stale.connection = Some(42);

        let registry = SessionRegistry::with_users([stale]);
        assert_eq!(registry.session_count().await, 0);
        assert_eq!(registry.token_of("ana").await, None);
    }
}
