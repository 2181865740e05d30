//! Content cipher selection.
//!
//! authcrypt supports two members of the ChaCha20-Poly1305 family:
//!
//! | name    | cipher             | nonce    |
//! |---------|--------------------|----------|
//! | `C20P`  | ChaCha20-Poly1305  | 96 bits  |
//! | `XC20P` | XChaCha20-Poly1305 | 192 bits |
//!
//! The same algorithm is used for content encryption and for key wrapping.
//! Tags are detached because the wire format carries them separately.

use chacha20poly1305::{
    aead::{AeadInPlace, KeyInit},
    ChaCha20Poly1305, Nonce, Tag, XChaCha20Poly1305, XNonce,
};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CoreError, Result};

/// Size of a content / key-wrap key in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// Size of a Poly1305 authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Content encryption algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentEncryption {
    /// ChaCha20-Poly1305 with a 96-bit nonce.
    #[serde(rename = "C20P")]
    ChaCha20Poly1305,

    /// XChaCha20-Poly1305 with a 192-bit nonce.
    #[serde(rename = "XC20P")]
    XChaCha20Poly1305,
}

impl ContentEncryption {
    /// Wire name (`enc` header value).
    pub const fn name(&self) -> &'static str {
        match self {
            ContentEncryption::ChaCha20Poly1305 => "C20P",
            ContentEncryption::XChaCha20Poly1305 => "XC20P",
        }
    }

    /// Nonce size in bytes.
    pub const fn nonce_size(&self) -> usize {
        match self {
            ContentEncryption::ChaCha20Poly1305 => 12,
            ContentEncryption::XChaCha20Poly1305 => 24,
        }
    }

    /// Key size in bytes.
    pub const fn key_size(&self) -> usize {
        KEY_SIZE
    }

    /// Key-wrap algorithm name, e.g. `XC20PKW`.
    pub fn key_wrap_name(&self) -> String {
        format!("{}KW", self.name())
    }
}

impl Default for ContentEncryption {
    fn default() -> Self {
        ContentEncryption::XChaCha20Poly1305
    }
}

impl fmt::Display for ContentEncryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContentEncryption {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "C20P" => Ok(ContentEncryption::ChaCha20Poly1305),
            "XC20P" => Ok(ContentEncryption::XChaCha20Poly1305),
            other => Err(CoreError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// A 256-bit symmetric key, zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ContentKey([u8; KEY_SIZE]);

impl ContentKey {
    /// Generate a new random key.
    pub fn generate_from_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, rejecting anything that is not 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| CoreError::InvalidKeyLength {
            expected: KEY_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentKey([REDACTED])")
    }
}

/// Fill a fresh nonce of `size` bytes.
pub fn random_nonce<R: RngCore + CryptoRng>(rng: &mut R, size: usize) -> Vec<u8> {
    let mut nonce = vec![0u8; size];
    rng.fill_bytes(&mut nonce);
    nonce
}

enum Inner {
    ChaCha(ChaCha20Poly1305),
    XChaCha(XChaCha20Poly1305),
}

/// One content algorithm bound to one key.
pub struct ContentCipher {
    alg: ContentEncryption,
    inner: Inner,
}

impl ContentCipher {
    /// Create a cipher for `alg` keyed with `key`.
    pub fn new(alg: ContentEncryption, key: &ContentKey) -> Self {
        let key = chacha20poly1305::Key::from_slice(key.as_bytes());
        let inner = match alg {
            ContentEncryption::ChaCha20Poly1305 => Inner::ChaCha(ChaCha20Poly1305::new(key)),
            ContentEncryption::XChaCha20Poly1305 => Inner::XChaCha(XChaCha20Poly1305::new(key)),
        };
        Self { alg, inner }
    }

    /// The algorithm this cipher runs.
    pub fn algorithm(&self) -> ContentEncryption {
        self.alg
    }

    /// Encrypt `plaintext`, returning `(ciphertext, tag)`.
    pub fn seal(&self, nonce: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
        self.check_nonce(nonce)?;

        let mut buffer = plaintext.to_vec();
        let tag = match &self.inner {
            Inner::ChaCha(cipher) => {
                cipher.encrypt_in_place_detached(Nonce::from_slice(nonce), aad, &mut buffer)
            }
            Inner::XChaCha(cipher) => {
                cipher.encrypt_in_place_detached(XNonce::from_slice(nonce), aad, &mut buffer)
            }
        }
        .map_err(|_| CoreError::EncryptionFailed)?;

        Ok((buffer, tag.to_vec()))
    }

    /// Decrypt `ciphertext` and verify its detached `tag`.
    pub fn open(&self, nonce: &[u8], ciphertext: &[u8], tag: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
        self.check_nonce(nonce)?;
        if tag.len() != TAG_SIZE {
            return Err(CoreError::AuthenticationFailed);
        }

        let tag = Tag::from_slice(tag);
        let mut buffer = ciphertext.to_vec();
        match &self.inner {
            Inner::ChaCha(cipher) => {
                cipher.decrypt_in_place_detached(Nonce::from_slice(nonce), aad, &mut buffer, tag)
            }
            Inner::XChaCha(cipher) => {
                cipher.decrypt_in_place_detached(XNonce::from_slice(nonce), aad, &mut buffer, tag)
            }
        }
        .map_err(|_| CoreError::AuthenticationFailed)?;

        Ok(buffer)
    }

    // The underlying ciphers panic on a mis-sized nonce; reject it here.
    fn check_nonce(&self, nonce: &[u8]) -> Result<()> {
        let expected = self.alg.nonce_size();
        if nonce.len() != expected {
            return Err(CoreError::InvalidNonceLength {
                expected,
                actual: nonce.len(),
            });
        }
        Ok(())
    }
}
