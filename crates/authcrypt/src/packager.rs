//! The Packager: authcrypt messaging addressed by key id.
//!
//! Packing looks the sender up in a [`KeyStore`] and encrypts to the
//! recipients' key ids. Unpacking finds which of the envelope's recipients
//! the store holds and decrypts with that key.

use std::sync::Arc;

use authcrypt_core::{key_id_to_bytes, ContentEncryption};
use authcrypt_jwe::{AuthCrypter, Crypter, Envelope};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PackError, Result};
use crate::keystore::KeyStore;

/// Configuration for the Packager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagerConfig {
    /// Content encryption for outgoing envelopes (`C20P` or `XC20P`).
    pub content_encryption: ContentEncryption,
}

impl PackagerConfig {
    /// Load from a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PackError::Config(e.to_string()))
    }
}

/// A decrypted message and the key it was opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackedMessage {
    /// The plaintext.
    pub message: Vec<u8>,
    /// Key id of the recipient key that opened the envelope.
    pub recipient_kid: String,
}

/// Packs and unpacks authcrypt envelopes with keys held in a [`KeyStore`].
pub struct Packager<K: KeyStore> {
    store: Arc<K>,
    crypter: AuthCrypter,
    config: PackagerConfig,
}

impl<K: KeyStore> Packager<K> {
    /// Create a packager over `store`.
    pub fn new(store: K, config: PackagerConfig) -> Self {
        Self::with_shared_store(Arc::new(store), config)
    }

    /// Create a packager over a store shared with other components.
    pub fn with_shared_store(store: Arc<K>, config: PackagerConfig) -> Self {
        Self {
            store,
            crypter: AuthCrypter::new(config.content_encryption),
            config,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &K {
        &self.store
    }

    /// Get the configuration.
    pub fn config(&self) -> &PackagerConfig {
        &self.config
    }

    /// Encrypt `message` from the key `sender_kid` to every key in `recipient_kids`.
    pub async fn pack<S: AsRef<str>>(
        &self,
        message: &[u8],
        sender_kid: &str,
        recipient_kids: &[S],
    ) -> Result<Vec<u8>> {
        let sender = self
            .store
            .key_pair(sender_kid)
            .await?
            .ok_or_else(|| PackError::UnknownSenderKey(sender_kid.to_string()))?;

        let recipients = recipient_kids
            .iter()
            .map(|kid| {
                let kid = kid.as_ref();
                key_id_to_bytes(kid).map_err(|_| PackError::InvalidKeyId(kid.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            sender = sender_kid,
            recipients = recipients.len(),
            enc = %self.config.content_encryption,
            "packing message"
        );

        Ok(self.crypter.encrypt(message, &sender, &recipients)?)
    }

    /// Decrypt an envelope with the first recipient key held by the store.
    pub async fn unpack(&self, envelope: &[u8]) -> Result<UnpackedMessage> {
        let parsed = Envelope::from_bytes(envelope)?;

        for kid in parsed.recipient_kids() {
            let Some(recipient) = self.store.key_pair(kid).await? else {
                continue;
            };

            debug!(recipient = kid, "unpacking message");
            let message = self.crypter.decrypt(envelope, &recipient)?;
            return Ok(UnpackedMessage {
                message,
                recipient_kid: kid.to_string(),
            });
        }

        debug!(
            recipients = parsed.recipients.len(),
            "no recipient key held"
        );
        Err(PackError::NoMatchingKey)
    }
}
