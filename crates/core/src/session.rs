//! Mock authentication backed by a durable key/value session store.
//!
//! There is no credential check: any email and password, blank ones
//! included, log in as the demo user. The user record is written to the store under [`SESSION_KEY`] as
//! JSON and read back once at start-up.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Key under which the signed-in user is stored.
pub const SESSION_KEY: &str = "user";

pub const RESTORE_FAILED_MESSAGE: &str = "Authentication failed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl User {
    /// The mock account every login resolves to.
    pub fn demo(email: &str) -> Self {
        Self {
            id: "1".to_string(),
            name: "Demo User".to_string(),
            email: email.to_string(),
            role: "admin".to_string(),
        }
    }
}

/// Durable string key/value storage that survives restarts.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError>;
    async fn set(&self, key: &str, value: String) -> Result<(), CoreError>;
    async fn remove(&self, key: &str) -> Result<(), CoreError>;
}

/// Read the stored session. A record that is present but not valid JSON is
/// reported as a validation error.
pub async fn read_session(store: &dyn SessionStore) -> Result<Option<User>, CoreError> {
    match store.get(SESSION_KEY).await? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| CoreError::Validation(format!("Corrupt session record: {e}"))),
        None => Ok(None),
    }
}

pub async fn write_session(store: &dyn SessionStore, user: &User) -> Result<(), CoreError> {
    let raw = serde_json::to_string(user)
        .map_err(|e| CoreError::Internal(format!("Session serialisation failed: {e}")))?;
    store.set(SESSION_KEY, raw).await
}

pub async fn clear_session(store: &dyn SessionStore) -> Result<(), CoreError> {
    store.remove(SESSION_KEY).await
}

/// The signed-in user of this process, if any.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuthSession {
    user: Option<User>,
    error: Option<String>,
}

impl AuthSession {
    /// Restore the session from `store`. Read or decode failures leave the
    /// session signed out and record [`RESTORE_FAILED_MESSAGE`].
    pub async fn restore(store: &dyn SessionStore) -> Self {
        match read_session(store).await {
            Ok(user) => Self { user, error: None },
            Err(err) => {
                tracing::error!(error = %err, "Authentication error while restoring session");
                Self {
                    user: None,
                    error: Some(RESTORE_FAILED_MESSAGE.to_string()),
                }
            }
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Sign in as the demo user and persist the session.
    pub async fn login(
        &mut self,
        store: &dyn SessionStore,
        email: &str,
        _password: &str,
    ) -> Result<User, CoreError> {
        let user = User::demo(email.trim());
        if let Err(err) = write_session(store, &user).await {
            self.error = Some("Login failed".to_string());
            return Err(err);
        }

        tracing::info!(email = %user.email, "User logged in");
        self.user = Some(user.clone());
        self.error = None;
        Ok(user)
    }

    /// Sign out. The in-memory session is cleared even if the store fails.
    pub async fn logout(&mut self, store: &dyn SessionStore) -> Result<(), CoreError> {
        self.user = None;
        clear_session(store).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct MapStore(Mutex<HashMap<String, String>>);

    #[async_trait]
    impl SessionStore for MapStore {
        async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
            Ok(self.0.lock().await.get(key).cloned())
        }

        async fn set(&self, key: &str, value: String) -> Result<(), CoreError> {
            self.0.lock().await.insert(key.to_string(), value);
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<(), CoreError> {
            self.0.lock().await.remove(key);
            Ok(())
        }
    }

    #[tokio::test]
    async fn login_accepts_any_credentials_and_persists() {
        let store = MapStore::default();
        let mut session = AuthSession::restore(&store).await;
        assert!(!session.is_authenticated());

        let user = session.login(&store, "ana@example.com", "whatever").await.unwrap();

        assert_eq!(user, User::demo("ana@example.com"));
        assert_eq!(user.role, "admin");
        assert!(session.is_authenticated());
        assert!(store.0.lock().await.contains_key(SESSION_KEY));
    }

    #[tokio::test]
    async fn session_survives_restore() {
        let store = MapStore::default();
        let mut first = AuthSession::default();
        first.login(&store, "sam@example.com", "pw").await.unwrap();

        let restored = AuthSession::restore(&store).await;
        assert_eq!(restored.user().unwrap().email, "sam@example.com");
    }

    #[tokio::test]
    async fn logout_clears_store() {
        let store = MapStore::default();
        let mut session = AuthSession::default();
        session.login(&store, "a@b.c", "pw").await.unwrap();

        session.logout(&store).await.unwrap();

        assert!(!session.is_authenticated());
        assert!(read_session(&store).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_record_restores_signed_out_with_error() {
        let store = MapStore::default();
        store.set(SESSION_KEY, "{not json".into()).await.unwrap();

        let session = AuthSession::restore(&store).await;

        assert!(!session.is_authenticated());
        assert_eq!(session.error(), Some(RESTORE_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn blank_credentials_still_log_in() {
        let store = MapStore::default();
        let mut session = AuthSession::default();

        let user = session.login(&store, "  ", "").await.unwrap();

        assert_eq!(user, User::demo(""));
        assert!(session.is_authenticated());
        assert!(read_session(&store).await.unwrap().is_some());
    }
}
