//! # Authcrypt
//!
//! Authenticated, sender-hiding messaging between agents that know each
//! other only by X25519 public keys.
//!
//! ## Overview
//!
//! - **Envelopes**: One ciphertext for many recipients, each able to verify
//!   the sender ([`authcrypt_jwe`])
//! - **Key stores**: Keys addressed by base58 key id ([`KeyStore`])
//! - **Packager**: Pack to key ids, unpack with whichever key the store holds
//!
//! ## Usage
//!
//! ```rust,no_run
//! use authcrypt::{KeyStore, MemoryKeyStore, Packager, PackagerConfig};
//!
//! async fn example() {
//!     let alice = Packager::new(MemoryKeyStore::new(), PackagerConfig::default());
//!     let bob = Packager::new(MemoryKeyStore::new(), PackagerConfig::default());
//!
//!     let alice_kid = alice.store().create_encryption_key().await.unwrap();
//!     let bob_kid = bob.store().create_encryption_key().await.unwrap();
//!
//!     let envelope = alice.pack(b"hello bob", &alice_kid, &[bob_kid]).await.unwrap();
//!     let unpacked = bob.unpack(&envelope).await.unwrap();
//!     assert_eq!(unpacked.message, b"hello bob");
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `authcrypt::core` - Key types, ciphers, and encodings
//! - `authcrypt::jwe` - The envelope format and [`AuthCrypter`]

pub mod error;
pub mod keystore;
pub mod packager;

// Re-export component crates
pub use authcrypt_core as core;
pub use authcrypt_jwe as jwe;

pub use error::{KeyStoreError, PackError, Result};
pub use keystore::{KeyStore, MemoryKeyStore};
pub use packager::{Packager, PackagerConfig, UnpackedMessage};

pub use authcrypt_core::{key_id, ContentEncryption, KeyPair};
pub use authcrypt_jwe::{AuthCryptError, AuthCrypter, Crypter, Stage};
