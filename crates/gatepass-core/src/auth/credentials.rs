use async_trait::async_trait;
use keyring::Entry;

use super::store::{StoreError, TokenStore, TOKEN_KEY};

const SERVICE_NAME: &str = "gatepass";

/// Token store backed by the OS keychain.
///
/// One entry is opened up front and reused for every call, so all reads
/// and writes go through the same credential.
pub struct KeyringTokenStore {
    entry: Entry,
}

impl KeyringTokenStore {
    pub fn new() -> Result<Self, StoreError> {
        Self::with_service(SERVICE_NAME)
    }

    pub fn with_service(service: &str) -> Result<Self, StoreError> {
        Ok(Self {
            entry: Entry::new(service, TOKEN_KEY)?,
        })
    }
}

#[async_trait]
impl TokenStore for KeyringTokenStore {
    async fn get(&self) -> Result<Option<String>, StoreError> {
        match self.entry.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, token: &str) -> Result<(), StoreError> {
        self.entry.set_password(token)?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_keyring_store_round_trip() {
        // In-process credential store, no OS keychain needed
        keyring::set_default_credential_builder(keyring::mock::default_credential_builder());

        let store = KeyringTokenStore::with_service("gatepass-test").unwrap();
        assert_eq!(store.get().await.unwrap(), None);

        store.set("T1").await.unwrap();
        assert_eq!(store.get().await.unwrap().as_deref(), Some("T1"));
        assert!(store.has_token().await.unwrap());

        store.set("T2").await.unwrap();
        assert_eq!(store.get().await.unwrap().as_deref(), Some("T2"));

        store.clear().await.unwrap();
        assert_eq!(store.get().await.unwrap(), None);
        store.clear().await.unwrap();
    }
}
