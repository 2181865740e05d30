//! # Authcrypt JWE
//!
//! The authcrypt envelope: one ciphertext readable by any number of
//! recipients, each of whom can authenticate the sender while the sender's
//! identity stays hidden from everyone else.
//!
//! ## Wire Format
//!
//! ```text
//! {
//!   "protected":  b64({"typ":"prs.hyperledger.aries-auth-message",
//!                      "alg":"ECDH-SS+<enc>KW","enc":"<enc>"}),
//!   "recipients": [{ "encrypted_key": ..., "header": {apu, iv, tag, kid, spk} }],
//!   "aad":        b64(SHA-256(sorted kids joined with ".")),
//!   "iv", "tag", "ciphertext"
//! }
//! ```
//!
//! - `kid` is the base58 recipient public key.
//! - `spk` is a compact JWE that hides the sender key from non-recipients.
//! - The content is authenticated against `protected + "." + aad`.
//!
//! ## Usage
//!
//! ```rust
//! use authcrypt_core::{ContentEncryption, KeyPair};
//! use authcrypt_jwe::{AuthCrypter, Crypter};
//!
//! let crypter = AuthCrypter::new(ContentEncryption::XChaCha20Poly1305);
//! let sender = KeyPair::generate();
//! let recipient = KeyPair::generate();
//!
//! let envelope = crypter
//!     .encrypt(b"hello", &sender, &[recipient.public.clone()])
//!     .unwrap();
//! assert_eq!(crypter.decrypt(&envelope, &recipient).unwrap(), b"hello");
//! ```

pub mod crypter;
pub mod envelope;
pub mod error;
pub mod keywrap;
pub mod spk;

pub use crypter::{AuthCrypter, Crypter};
pub use envelope::{
    compute_aad, Envelope, Jwk, ProtectedHeader, Recipient, RecipientHeaders, SenderKeyHeader,
};
pub use error::{AuthCryptError, Result, Stage};
