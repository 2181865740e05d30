//! Error types for the authcrypt primitives.

use thiserror::Error;

/// Errors raised by the primitive layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("bad nonce size: expected {expected}, got {actual}")]
    InvalidNonceLength { expected: usize, actual: usize },

    #[error("message authentication failed")]
    AuthenticationFailed,

    #[error("encryption failed")]
    EncryptionFailed,

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Result type for primitive operations.
pub type Result<T> = std::result::Result<T, CoreError>;
