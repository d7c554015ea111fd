use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::store::{StoreError, TokenStore};
use crate::api::ApiError;

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// On-disk shape of the session file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub saved_at: DateTime<Utc>,
}

/// Token store backed by a JSON file in the cache directory.
///
/// Survives restarts. A missing file means no active session. Nothing here
/// tracks expiry; the server decides whether a token is still good.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    cache_dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }

    /// Load the full session record, including when it was saved
    pub async fn load(&self) -> Result<Option<SessionData>, StoreError> {
        Self::read(&self.session_path()).await
    }

    async fn read(path: &Path) -> Result<Option<SessionData>, StoreError> {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self) -> Result<Option<String>, StoreError> {
        Ok(self.load().await?.map(|d| d.token))
    }

    async fn set(&self, token: &str) -> Result<(), StoreError> {
        let path = self.session_path();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let data = SessionData {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        let contents = serde_json::to_string_pretty(&data)?;
        // Write then rename so readers never see a half-written file
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(path = %path.display(), "Session saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.session_path()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Caller-side helpers around the token lifecycle.
///
/// The API client only ever reads the token and writes it on login;
/// logging out and reacting to a rejected token happen here.
pub struct Session<'a> {
    store: &'a dyn TokenStore,
}

impl<'a> Session<'a> {
    pub fn new(store: &'a dyn TokenStore) -> Self {
        Self { store }
    }

    /// Whether a token is present. Says nothing about server-side validity.
    pub async fn is_active(&self) -> Result<bool, StoreError> {
        self.store.has_token().await
    }

    pub async fn logout(&self) -> Result<(), StoreError> {
        self.store.clear().await?;
        info!("Logged out");
        Ok(())
    }

    /// Drop the stored token if `error` says the server rejected it.
    ///
    /// Returns true when the token was cleared.
    pub async fn handle_rejection(&self, error: &ApiError) -> Result<bool, StoreError> {
        if !error.is_unauthorized() {
            return Ok(false);
        }
        warn!("Token rejected by server, clearing session");
        self.store.clear().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;
    use reqwest::StatusCode;

    #[tokio::test]
    async fn test_file_store_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested"));

        assert_eq!(store.get().await.unwrap(), None);

        store.set("abc").await.unwrap();
        assert!(store.session_path().exists());
        assert_eq!(store.get().await.unwrap().as_deref(), Some("abc"));

        store.clear().await.unwrap();
        assert!(!store.session_path().exists());
        assert_eq!(store.get().await.unwrap(), None);

        // Clearing twice is fine
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_survives_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        FileTokenStore::new(dir.path()).set("persisted").await.unwrap();

        let reopened = FileTokenStore::new(dir.path());
        let data = reopened.load().await.unwrap().unwrap();
        assert_eq!(data.token, "persisted");
        assert!(data.saved_at <= Utc::now());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());
        std::fs::write(store.session_path(), "not json").unwrap();
        assert!(matches!(store.get().await, Err(StoreError::Corrupt(_))));
    }

    #[tokio::test]
    async fn test_handle_rejection_clears_only_on_401() {
        let store = MemoryTokenStore::with_token("T1");
        let session = Session::new(&store);

        let forbidden = ApiError::from_status(StatusCode::FORBIDDEN, "");
        assert!(!session.handle_rejection(&forbidden).await.unwrap());
        assert!(session.is_active().await.unwrap());

        let unauthorized = ApiError::from_status(StatusCode::UNAUTHORIZED, "");
        assert!(session.handle_rejection(&unauthorized).await.unwrap());
        assert!(!session.is_active().await.unwrap());
    }

    #[tokio::test]
    async fn test_logout() {
        let store = MemoryTokenStore::with_token("T1");
        let session = Session::new(&store);
        session.logout().await.unwrap();
        assert_eq!(store.get().await.unwrap(), None);
    }
}
