//! Proptest generators for property-based testing.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use authcrypt_core::{ContentEncryption, KeyPair};

/// Generate a key pair from a random seed.
pub fn key_pair() -> impl Strategy<Value = KeyPair> {
    any::<[u8; 32]>().prop_map(|seed| KeyPair::generate_from_rng(&mut StdRng::from_seed(seed)))
}

/// Generate between one and `max` recipient key pairs.
pub fn recipients(max: usize) -> impl Strategy<Value = Vec<KeyPair>> {
    prop::collection::vec(key_pair(), 1..=max.max(1))
}

/// Generate a content encryption algorithm.
pub fn content_encryption() -> impl Strategy<Value = ContentEncryption> {
    prop_oneof![
        Just(ContentEncryption::ChaCha20Poly1305),
        Just(ContentEncryption::XChaCha20Poly1305),
    ]
}

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a byte string that is not 32 bytes long.
pub fn bad_key() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..64).prop_filter("not a 32-byte key", |k| k.len() != 32)
}

/// Parameters for one envelope.
#[derive(Debug, Clone)]
pub struct EnvelopeParams {
    pub alg: ContentEncryption,
    pub sender: KeyPair,
    pub recipients: Vec<KeyPair>,
    pub payload: Vec<u8>,
}

impl EnvelopeParams {
    /// Public keys of all recipients, in order.
    pub fn recipient_public_keys(&self) -> Vec<Vec<u8>> {
        self.recipients.iter().map(|k| k.public.clone()).collect()
    }
}

impl Arbitrary for EnvelopeParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (content_encryption(), key_pair(), recipients(4), payload(512))
            .prop_map(|(alg, sender, recipients, payload)| EnvelopeParams {
                alg,
                sender,
                recipients,
                payload,
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn key_pairs_are_valid(pair in key_pair()) {
            prop_assert!(pair.is_valid());
        }

        #[test]
        fn bad_keys_are_rejected(key in bad_key()) {
            prop_assert_ne!(key.len(), 32);
        }

        #[test]
        fn params_have_recipients(params: EnvelopeParams) {
            prop_assert!(!params.recipients.is_empty());
            prop_assert_eq!(params.recipient_public_keys().len(), params.recipients.len());
        }
    }
}
