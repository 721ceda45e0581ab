//! [`SessionStore`] implementations.
//!
//! `FileSessionStore` keeps a flat JSON object of string keys to string
//! values on disk, so a signed-in session survives a server restart.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use kickflip_core::error::CoreError;
use kickflip_core::session::SessionStore;

type Entries = HashMap<String, String>;

pub struct FileSessionStore {
    path: PathBuf,
    // Serialises read-modify-write cycles on the file.
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<Entries, CoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Entries::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                CoreError::Unavailable(format!(
                    "Session file {} is not a JSON object: {e}",
                    self.path.display()
                ))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(io_error(&self.path, e)),
        }
    }

    async fn write_entries(&self, entries: &Entries) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(parent, e))?;
        }
        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(|e| CoreError::Internal(format!("Session encoding failed: {e}")))?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| io_error(&self.path, e))
    }
}

fn io_error(path: &Path, err: std::io::Error) -> CoreError {
    tracing::error!(path = %path.display(), error = %err, "Session file I/O failed");
    CoreError::Unavailable(format!("Session storage unavailable: {err}"))
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_entries().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value);
        self.write_entries(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), CoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries).await?;
        }
        Ok(())
    }
}

/// Volatile store for tests and throwaway servers.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<Entries>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CoreError> {
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use kickflip_core::session::{AuthSession, RESTORE_FAILED_MESSAGE, SESSION_KEY};

    use super::*;

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        assert_eq!(store.get(SESSION_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn values_persist_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/session.json");

        FileSessionStore::new(&path)
            .set("theme", "dark".into())
            .await
            .unwrap();

        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.get("theme").await.unwrap().as_deref(), Some("dark"));

        reopened.remove("theme").await.unwrap();
        assert_eq!(reopened.get("theme").await.unwrap(), None);
    }

    #[tokio::test]
    async fn login_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileSessionStore::new(&path);
        let mut session = AuthSession::restore(&store).await;
        session.login(&store, "kay@example.com", "pw").await.unwrap();

        let restarted = AuthSession::restore(&FileSessionStore::new(&path)).await;
        assert_eq!(restarted.user().unwrap().email, "kay@example.com");
    }

    #[tokio::test]
    async fn garbage_file_fails_restore() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"[1, 2").unwrap();

        let store = FileSessionStore::new(&path);
        assert_matches!(store.get(SESSION_KEY).await, Err(CoreError::Unavailable(_)));

        let session = AuthSession::restore(&store).await;
        assert!(!session.is_authenticated());
        assert_eq!(session.error(), Some(RESTORE_FAILED_MESSAGE));
    }
}
