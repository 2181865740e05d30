//! Error types for the packager and key stores.

use authcrypt_jwe::AuthCryptError;
use thiserror::Error;

/// Errors raised by a [`KeyStore`](crate::KeyStore).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyStoreError {
    /// The key pair does not hold two 32-byte halves.
    #[error("invalid key pair")]
    InvalidKeyPair,

    /// Backend failure.
    #[error("key store backend error: {0}")]
    Backend(String),
}

/// Errors that can occur while packing or unpacking messages.
#[derive(Debug, Error)]
pub enum PackError {
    /// Envelope encryption or decryption failed.
    #[error("authcrypt error: {0}")]
    Crypt(#[from] AuthCryptError),

    /// Key store error.
    #[error("key store error: {0}")]
    KeyStore(#[from] KeyStoreError),

    /// The sender key id is not held by the key store.
    #[error("unknown sender key: {0}")]
    UnknownSenderKey(String),

    /// A recipient key id is not valid base58.
    #[error("invalid key id: {0}")]
    InvalidKeyId(String),

    /// None of the envelope's recipients is held by the key store.
    #[error("no matching key found for any recipient")]
    NoMatchingKey,

    /// Configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for packager operations.
pub type Result<T> = std::result::Result<T, PackError>;
