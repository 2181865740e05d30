//! Error types for envelope operations.

use std::fmt;

use authcrypt_core::{ContentEncryption, CoreError};
use thiserror::Error;

/// The decryption layer an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The envelope itself or the shared content ciphertext.
    Message,
    /// The hidden-sender sub-envelope (`spk`).
    SenderKey,
    /// The per-recipient wrapped content key.
    SharedKey,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Message => f.write_str("message"),
            Stage::SenderKey => f.write_str("sender key"),
            Stage::SharedKey => f.write_str("shared key"),
        }
    }
}

/// Errors that can occur while encrypting or decrypting an envelope.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthCryptError {
    /// Unknown content encryption name.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Sender key pair is missing a half.
    #[error("invalid keypair")]
    InvalidKeypair,

    /// A key is present but has the wrong length.
    #[error("invalid key")]
    InvalidKey,

    /// A recipient public key has the wrong length (1-based index).
    #[error("invalid key - for recipient {0}")]
    InvalidRecipientKey(usize),

    /// Encrypt was called without recipients.
    #[error("empty recipients keys, must have at least one recipient")]
    EmptyRecipientList,

    /// Malformed base64 or JSON in a wire field.
    #[error("failed to decrypt {stage}: malformed {field}: {reason}")]
    Decode {
        stage: Stage,
        field: &'static str,
        reason: String,
    },

    /// The hidden-sender sub-envelope does not have the expected structure.
    #[error("failed to decrypt sender key: bad SPK format")]
    BadSenderKeyFormat,

    /// No recipient block is addressed to the caller's key.
    #[error("failed to decrypt message: recipient not found")]
    RecipientNotFound,

    /// An AEAD tag check failed.
    #[error("failed to decrypt {stage}: message authentication failed")]
    AuthenticationFailed { stage: Stage },

    /// A nonce of the wrong size reached the cipher.
    #[error("failed to decrypt {stage}: bad nonce size: expected {expected}, got {actual}")]
    InvalidNonceLength {
        stage: Stage,
        expected: usize,
        actual: usize,
    },

    /// The envelope was produced for a different content algorithm.
    #[error("failed to decrypt message: algorithm mismatch: expected {expected}, found {found}")]
    AlgorithmMismatch {
        expected: ContentEncryption,
        found: String,
    },

    /// Building the envelope failed.
    #[error("failed to encrypt message: {0}")]
    Encryption(String),
}

impl AuthCryptError {
    /// Attribute a primitive failure to a decryption stage.
    pub fn at(stage: Stage, err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed => AuthCryptError::AuthenticationFailed { stage },
            CoreError::InvalidNonceLength { expected, actual } => {
                AuthCryptError::InvalidNonceLength {
                    stage,
                    expected,
                    actual,
                }
            }
            CoreError::DecodingError(reason) => AuthCryptError::Decode {
                stage,
                field: "value",
                reason,
            },
            other => other.into(),
        }
    }

    /// The decryption stage this error belongs to, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            AuthCryptError::Decode { stage, .. }
            | AuthCryptError::AuthenticationFailed { stage }
            | AuthCryptError::InvalidNonceLength { stage, .. } => Some(*stage),
            AuthCryptError::BadSenderKeyFormat => Some(Stage::SenderKey),
            AuthCryptError::RecipientNotFound | AuthCryptError::AlgorithmMismatch { .. } => {
                Some(Stage::Message)
            }
            _ => None,
        }
    }
}

impl From<CoreError> for AuthCryptError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnsupportedAlgorithm(name) => AuthCryptError::UnsupportedAlgorithm(name),
            CoreError::InvalidKeyLength { .. } => AuthCryptError::InvalidKey,
            other => AuthCryptError::Encryption(other.to_string()),
        }
    }
}

/// Result type for envelope operations.
pub type Result<T> = std::result::Result<T, AuthCryptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_stage() {
        let err = AuthCryptError::AuthenticationFailed {
            stage: Stage::SharedKey,
        };
        assert_eq!(
            err.to_string(),
            "failed to decrypt shared key: message authentication failed"
        );

        let err = AuthCryptError::Decode {
            stage: Stage::Message,
            field: "iv",
            reason: "bad".into(),
        };
        assert_eq!(err.to_string(), "failed to decrypt message: malformed iv: bad");
        assert_eq!(
            AuthCryptError::InvalidRecipientKey(2).to_string(),
            "invalid key - for recipient 2"
        );
    }

    #[test]
    fn test_at_maps_core_errors() {
        assert_eq!(
            AuthCryptError::at(Stage::SenderKey, CoreError::AuthenticationFailed),
            AuthCryptError::AuthenticationFailed {
                stage: Stage::SenderKey
            }
        );
        assert_eq!(
            AuthCryptError::at(
                Stage::Message,
                CoreError::InvalidNonceLength {
                    expected: 24,
                    actual: 12
                }
            ),
            AuthCryptError::InvalidNonceLength {
                stage: Stage::Message,
                expected: 24,
                actual: 12
            }
        );
        assert_eq!(
            AuthCryptError::at(
                Stage::Message,
                CoreError::InvalidKeyLength {
                    expected: 32,
                    actual: 3
                }
            ),
            AuthCryptError::InvalidKey
        );
    }

    #[test]
    fn test_stage_lookup() {
        assert_eq!(
            AuthCryptError::BadSenderKeyFormat.stage(),
            Some(Stage::SenderKey)
        );
        assert_eq!(AuthCryptError::EmptyRecipientList.stage(), None);
    }
}
