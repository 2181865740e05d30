//! # Authcrypt Core
//!
//! Pure primitives for authcrypt envelopes: X25519 key agreement, the
//! ChaCha20-Poly1305 cipher selector, the Concat KDF, and the base64url /
//! base58 encodings used on the wire.
//!
//! This crate contains no I/O and no logging. It is pure computation over
//! key material, apart from drawing randomness from a caller-supplied
//! generator.
//!
//! ## Key Types
//!
//! - [`KeyPair`] - Caller-supplied X25519 key pair (raw bytes, validated per call)
//! - [`X25519PublicKey`] / [`X25519StaticSecret`] - Strongly typed curve keys
//! - [`ContentEncryption`] - The two supported content ciphers (`C20P`, `XC20P`)
//! - [`ContentCipher`] - One cipher bound to one key, with detached tags
//! - [`ContentKey`] - A zeroizing 256-bit symmetric key

pub mod aead;
pub mod crypto;
pub mod encoding;
pub mod error;
pub mod kdf;

pub use aead::{random_nonce, ContentCipher, ContentEncryption, ContentKey, KEY_SIZE, TAG_SIZE};
pub use crypto::{EphemeralKeyPair, KeyPair, SharedKey, X25519PublicKey, X25519StaticSecret};
pub use encoding::{b64_decode, b64_encode, key_id, key_id_to_bytes};
pub use error::{CoreError, Result};
pub use kdf::concat_kdf;
