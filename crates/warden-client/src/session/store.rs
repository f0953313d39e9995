//! Persistent session storage.
//!
//! One serialized session record lives under a fixed location: a JSON file
//! for the CLI, an in-memory slot for tests and embedding.
//!
//! # Implementation Notes
//!
//! Implementations should:
//!
//! - Treat a record they cannot decode as "no session" rather than failing;
//!   a corrupt file must never lock an operator out
//! - Treat clearing an absent record as success
//! - Keep the record readable only by the owning user where the backend
//!   supports permissions

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tracing::warn;
use warden_core::{Result, WardenError};

use crate::session::Session;

/// Storage seam for the persisted session record.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads the persisted session.
    ///
    /// Returns `Ok(None)` when nothing is persisted or when the persisted
    /// record cannot be decoded.
    ///
    /// # Errors
    ///
    /// Returns an error only when the backing store itself fails.
    async fn load(&self) -> Result<Option<Session>>;

    /// Persists the session record, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Deletes the persisted session record.
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion fails. An already-absent record is
    /// not an error.
    async fn clear(&self) -> Result<()>;
}

/// Session store backed by one JSON file.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Creates a store over an explicit file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the store for a named profile under `~/.warden/`.
    ///
    /// # Errors
    ///
    /// Returns [`WardenError::Storage`] when the home directory cannot be
    /// determined or the config directory cannot be created.
    pub fn for_profile(profile: &str) -> Result<Self> {
        let dir = dirs::home_dir()
            .ok_or_else(|| WardenError::storage("cannot determine home directory"))?
            .join(".warden");
        fs::create_dir_all(&dir)
            .map_err(|err| WardenError::storage(format!("cannot create {}: {err}", dir.display())))?;
        Ok(Self {
            path: dir.join(format!("session.{profile}.json")),
        })
    }

}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(WardenError::storage(format!(
                    "cannot read {}: {err}",
                    self.path.display()
                )));
            }
        };

        match serde_json::from_str(&content) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "discarding malformed session record"
                );
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let content = serde_json::to_string_pretty(session)
            .map_err(|err| WardenError::storage(format!("cannot encode session: {err}")))?;
        fs::write(&self.path, content).map_err(|err| {
            WardenError::storage(format!("cannot write {}: {err}", self.path.display()))
        })
    }

    async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(WardenError::storage(format!(
                "cannot remove {}: {err}",
                self.path.display()
            ))),
        }
    }
}

/// Session store holding the record in memory.
///
/// Used by tests and by embedders that manage persistence themselves.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slot.clone())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> Session {
        Session {
            user: None,
            access_token: Some("acc".to_string()),
            refresh_token: Some("ref".to_string()),
            is_authenticated: true,
        }
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));

        assert!(store.load().await.unwrap().is_none());

        let session = sample_session();
        store.save(&session).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(session));

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_malformed_record_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileSessionStore::new(&path);
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        store.clear().await.unwrap();
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemorySessionStore::new();
        assert!(store.load().await.unwrap().is_none());

        store.save(&sample_session()).await.unwrap();
        assert!(store.load().await.unwrap().is_some());

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }
}
