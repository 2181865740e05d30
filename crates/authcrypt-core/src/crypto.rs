//! X25519 key agreement.
//!
//! Strongly typed wrappers over x25519-dalek, plus the loosely typed
//! [`KeyPair`] that callers hand to the crypter on every call.

use rand::{rngs::OsRng, CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use x25519_dalek::{EphemeralSecret, PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::aead::{ContentKey, KEY_SIZE};
use crate::error::{CoreError, Result};
use crate::kdf::concat_kdf;

/// An X25519 public key (32 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct X25519PublicKey(pub [u8; 32]);

impl X25519PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, rejecting anything that is not 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| CoreError::InvalidKeyLength {
            expected: KEY_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Convert to x25519-dalek PublicKey.
    pub fn to_dalek(&self) -> PublicKey {
        PublicKey::from(self.0)
    }
}

impl fmt::Debug for X25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X25519Pub({})", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for X25519PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<PublicKey> for X25519PublicKey {
    fn from(pk: PublicKey) -> Self {
        Self(*pk.as_bytes())
    }
}

impl From<[u8; 32]> for X25519PublicKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// An X25519 static secret key.
///
/// Zeroized on drop by x25519-dalek.
pub struct X25519StaticSecret(StaticSecret);

impl X25519StaticSecret {
    /// Generate a new random secret.
    pub fn generate() -> Self {
        Self::generate_from_rng(&mut OsRng)
    }

    /// Generate a new secret from the given generator.
    pub fn generate_from_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self(StaticSecret::random_from_rng(rng))
    }

    /// Create from raw secret bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(StaticSecret::from(bytes))
    }

    /// Create from a slice, rejecting anything that is not 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| CoreError::InvalidKeyLength {
            expected: KEY_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self::from_bytes(arr))
    }

    /// Derive the public key.
    pub fn public_key(&self) -> X25519PublicKey {
        X25519PublicKey::from(PublicKey::from(&self.0))
    }

    /// Perform key agreement with a peer's public key.
    pub fn diffie_hellman(&self, peer_public: &X25519PublicKey) -> SharedKey {
        let shared = self.0.diffie_hellman(&peer_public.to_dalek());
        SharedKey(*shared.as_bytes())
    }

    /// Get the raw secret bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }
}

impl fmt::Debug for X25519StaticSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X25519Secret({:?})", self.public_key())
    }
}

/// The `Z` value of an X25519 agreement.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedKey([u8; 32]);

impl SharedKey {
    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Derive a 256-bit key from this shared secret with the Concat KDF.
    ///
    /// `alg_id` is the AlgorithmID and `apu` the PartyUInfo; PartyVInfo is
    /// always empty in authcrypt.
    pub fn derive_key(&self, alg_id: &str, apu: &[u8]) -> ContentKey {
        let okm = concat_kdf(&self.0, alg_id.as_bytes(), apu, &[], KEY_SIZE);
        let mut bytes = [0u8; KEY_SIZE];
        bytes.copy_from_slice(&okm);
        let key = ContentKey::from_bytes(bytes);
        bytes.zeroize();
        key
    }
}

/// Ephemeral key pair for one-time key agreement.
pub struct EphemeralKeyPair {
    secret: EphemeralSecret,
    public: X25519PublicKey,
}

impl EphemeralKeyPair {
    /// Generate a new ephemeral key pair.
    pub fn generate() -> Self {
        Self::generate_from_rng(&mut OsRng)
    }

    /// Generate a new ephemeral key pair from the given generator.
    pub fn generate_from_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let secret = EphemeralSecret::random_from_rng(rng);
        let public = X25519PublicKey::from(PublicKey::from(&secret));
        Self { secret, public }
    }

    /// Get the public key.
    pub fn public_key(&self) -> X25519PublicKey {
        self.public
    }

    /// Perform key agreement with a peer's public key.
    ///
    /// Consumes the ephemeral secret (can only be used once).
    pub fn diffie_hellman(self, peer_public: &X25519PublicKey) -> SharedKey {
        let shared = self.secret.diffie_hellman(&peer_public.to_dalek());
        SharedKey(*shared.as_bytes())
    }
}

/// A raw X25519 key pair as supplied by callers.
///
/// Nothing is validated at construction; the crypter checks lengths on
/// every call so that malformed keys surface as typed errors.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    pub public: Vec<u8>,
    pub private: Vec<u8>,
}

impl KeyPair {
    /// Wrap raw key bytes.
    pub fn new(public: impl Into<Vec<u8>>, private: impl Into<Vec<u8>>) -> Self {
        Self {
            public: public.into(),
            private: private.into(),
        }
    }

    /// Generate a new random key pair.
    pub fn generate() -> Self {
        Self::generate_from_rng(&mut OsRng)
    }

    /// Generate a new key pair from the given generator.
    pub fn generate_from_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let secret = X25519StaticSecret::generate_from_rng(rng);
        Self::new(secret.public_key().0.to_vec(), secret.to_bytes().to_vec())
    }

    /// Both halves are present (non-empty).
    pub fn is_present(&self) -> bool {
        !self.public.is_empty() && !self.private.is_empty()
    }

    /// Both halves are exactly 32 bytes.
    pub fn is_valid(&self) -> bool {
        self.public.len() == KEY_SIZE && self.private.len() == KEY_SIZE
    }

    /// Parse the public half.
    pub fn public_key(&self) -> Result<X25519PublicKey> {
        X25519PublicKey::from_slice(&self.public)
    }

    /// Parse the private half.
    pub fn secret(&self) -> Result<X25519StaticSecret> {
        X25519StaticSecret::from_slice(&self.private)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &hex::encode(&self.public))
            .field("private", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_x25519_key_agreement() {
        let alice_secret = X25519StaticSecret::generate();
        let alice_public = alice_secret.public_key();

        let bob_secret = X25519StaticSecret::generate();
        let bob_public = bob_secret.public_key();

        let alice_shared = alice_secret.diffie_hellman(&bob_public);
        let bob_shared = bob_secret.diffie_hellman(&alice_public);

        assert_eq!(alice_shared.as_bytes(), bob_shared.as_bytes());
    }

    #[test]
    fn test_ephemeral_key_agreement() {
        let bob_secret = X25519StaticSecret::generate();
        let bob_public = bob_secret.public_key();

        let alice_ephemeral = EphemeralKeyPair::generate();
        let alice_ephemeral_public = alice_ephemeral.public_key();

        let alice_shared = alice_ephemeral.diffie_hellman(&bob_public);
        let bob_shared = bob_secret.diffie_hellman(&alice_ephemeral_public);

        assert_eq!(alice_shared.as_bytes(), bob_shared.as_bytes());
    }

    #[test]
    fn test_keypair_from_seeded_rng_is_deterministic() {
        let kp1 = KeyPair::generate_from_rng(&mut StdRng::seed_from_u64(7));
        let kp2 = KeyPair::generate_from_rng(&mut StdRng::seed_from_u64(7));

        assert_eq!(kp1.public, kp2.public);
        assert_eq!(kp1.private, kp2.private);
        assert!(kp1.is_valid());
    }

    #[test]
    fn test_keypair_public_matches_secret() {
        let kp = KeyPair::generate();
        let derived = kp.secret().unwrap().public_key();
        assert_eq!(derived, kp.public_key().unwrap());
    }

    #[test]
    fn test_keypair_validity() {
        assert!(!KeyPair::default().is_present());
        assert!(!KeyPair::new(vec![1u8; 32], Vec::new()).is_present());

        let short = KeyPair::new(b"badkeysize".to_vec(), vec![1u8; 32]);
        assert!(short.is_present());
        assert!(!short.is_valid());
        assert_eq!(
            short.public_key().unwrap_err(),
            CoreError::InvalidKeyLength {
                expected: 32,
                actual: 10
            }
        );
    }

    #[test]
    fn test_keypair_debug_redacts_private() {
        let kp = KeyPair::new(vec![0xAB; 32], vec![0xCD; 32]);
        let rendered = format!("{:?}", kp);
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("cdcd"));
    }

    #[test]
    fn test_derive_key_deterministic() {
        let shared = SharedKey([0x42; 32]);

        let key1 = shared.derive_key("XC20P", b"apu");
        let key2 = shared.derive_key("XC20P", b"apu");
        assert_eq!(key1.as_bytes(), key2.as_bytes());

        let key3 = shared.derive_key("C20P", b"apu");
        assert_ne!(key1.as_bytes(), key3.as_bytes());

        let key4 = shared.derive_key("XC20P", b"other");
        assert_ne!(key1.as_bytes(), key4.as_bytes());
    }
}
