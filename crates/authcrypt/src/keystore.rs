//! KeyStore trait: where the packager finds its encryption keys.
//!
//! Keys are addressed by their key id, the base58 encoding of the public
//! key, which is also the `kid` written into envelope recipient blocks.

use std::collections::HashMap;

use async_trait::async_trait;
use authcrypt_core::{key_id, KeyPair};
use tokio::sync::RwLock;

use crate::error::KeyStoreError;

/// Result type for key store operations.
pub type Result<T> = std::result::Result<T, KeyStoreError>;

/// Async interface to a store of X25519 encryption key pairs.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Generate and store a new key pair, returning its key id.
    async fn create_encryption_key(&self) -> Result<String>;

    /// Look up a key pair by key id.
    async fn key_pair(&self, kid: &str) -> Result<Option<KeyPair>>;

    /// Store an existing key pair, returning its key id.
    ///
    /// Importing the same pair twice is idempotent.
    async fn import_key_pair(&self, key_pair: KeyPair) -> Result<String>;
}

/// In-memory key store.
///
/// All keys are lost when the store is dropped.
#[derive(Default)]
pub struct MemoryKeyStore {
    keys: RwLock<HashMap<String, KeyPair>>,
}

impl MemoryKeyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored key pairs.
    pub async fn len(&self) -> usize {
        self.keys.read().await.len()
    }

    /// Whether the store holds no keys.
    pub async fn is_empty(&self) -> bool {
        self.keys.read().await.is_empty()
    }
}

#[async_trait]
impl KeyStore for MemoryKeyStore {
    async fn create_encryption_key(&self) -> Result<String> {
        self.import_key_pair(KeyPair::generate()).await
    }

    async fn key_pair(&self, kid: &str) -> Result<Option<KeyPair>> {
        Ok(self.keys.read().await.get(kid).cloned())
    }

    async fn import_key_pair(&self, key_pair: KeyPair) -> Result<String> {
        if !key_pair.is_valid() {
            return Err(KeyStoreError::InvalidKeyPair);
        }
        let kid = key_id(&key_pair.public);
        self.keys.write().await.insert(kid.clone(), key_pair);
        Ok(kid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use authcrypt_core::key_id_to_bytes;

    #[tokio::test]
    async fn test_create_and_lookup() {
        let store = MemoryKeyStore::new();
        assert!(store.is_empty().await);

        let kid = store.create_encryption_key().await.unwrap();
        let pair = store.key_pair(&kid).await.unwrap().unwrap();

        assert_eq!(key_id_to_bytes(&kid).unwrap(), pair.public);
        assert_eq!(pair.private.len(), 32);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_kid() {
        let store = MemoryKeyStore::new();
        assert!(store.key_pair("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_import_is_idempotent() {
        let store = MemoryKeyStore::new();
        let pair = KeyPair::generate();

        let a = store.import_key_pair(pair.clone()).await.unwrap();
        let b = store.import_key_pair(pair).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_import_rejects_bad_pair() {
        let store = MemoryKeyStore::new();
        assert_eq!(
            store
                .import_key_pair(KeyPair::new(vec![1, 2, 3], vec![4, 5, 6]))
                .await
                .unwrap_err(),
            KeyStoreError::InvalidKeyPair
        );
        assert!(store.is_empty().await);
    }
}
