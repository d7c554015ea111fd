use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

/// Well-known key the bearer token is stored under in every backend
pub const TOKEN_KEY: &str = "token";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt session file: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Persistent holder of at most one bearer token.
///
/// Each operation is atomic on its own. Callers never need a
/// read-modify-write sequence, so implementations carry no extra locking
/// beyond what a single get/set/clear needs.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self) -> Result<Option<String>, StoreError>;

    async fn set(&self, token: &str) -> Result<(), StoreError>;

    async fn clear(&self) -> Result<(), StoreError>;

    async fn has_token(&self) -> Result<bool, StoreError> {
        Ok(self.get().await?.is_some())
    }
}

/// Process-local store, used by tests and short-lived tools
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> Result<Option<String>, StoreError> {
        Ok(self.token.read().await.clone())
    }

    async fn set(&self, token: &str) -> Result<(), StoreError> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.token.write().await = None;
        Ok(())
    }
}
