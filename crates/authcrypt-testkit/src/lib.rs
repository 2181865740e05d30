//! # Authcrypt Testkit
//!
//! Testing utilities for authcrypt.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Reference vectors**: Envelopes produced by other implementations, with the keys to open them
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Helper structs for setting up senders, recipients, and agents
//!
//! ## Reference Vectors
//!
//! ```rust
//! use authcrypt_testkit::vectors::verify_reference_vectors;
//!
//! for (name, matches, detail) in verify_reference_vectors() {
//!     assert!(matches, "{name}: {detail}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use authcrypt_jwe::{AuthCrypter, Crypter};
//! use authcrypt_testkit::generators::EnvelopeParams;
//!
//! proptest! {
//!     #[test]
//!     fn roundtrip(params: EnvelopeParams) {
//!         let crypter = AuthCrypter::new(params.alg);
//!         let envelope = crypter
//!             .encrypt(&params.payload, &params.sender, &params.recipient_public_keys())
//!             .unwrap();
//!         let opened = crypter.decrypt(&envelope, &params.recipients[0]).unwrap();
//!         prop_assert_eq!(opened, params.payload);
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, AgentFixture, TestFixture};
pub use generators::EnvelopeParams;
pub use vectors::{reference_vectors, verify_reference_vectors, ReferenceVector};
