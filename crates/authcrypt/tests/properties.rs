//! Property tests over randomly generated parties and payloads.

use authcrypt::{AuthCryptError, AuthCrypter, Crypter, KeyPair};
use authcrypt_testkit::generators::{bad_key, key_pair, payload, EnvelopeParams};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn every_recipient_reads_the_payload(params: EnvelopeParams) {
        let crypter = AuthCrypter::new(params.alg);
        let envelope = crypter
            .encrypt(&params.payload, &params.sender, &params.recipient_public_keys())
            .unwrap();

        for recipient in &params.recipients {
            prop_assert_eq!(crypter.decrypt(&envelope, recipient).unwrap(), params.payload.clone());
        }
    }

    #[test]
    fn outsiders_are_not_found(params: EnvelopeParams, outsider in key_pair()) {
        let crypter = AuthCrypter::new(params.alg);
        let envelope = crypter
            .encrypt(&params.payload, &params.sender, &params.recipient_public_keys())
            .unwrap();

        prop_assert_eq!(
            crypter.decrypt(&envelope, &outsider).unwrap_err(),
            AuthCryptError::RecipientNotFound
        );
    }

    #[test]
    fn bad_recipient_key_is_reported_at_its_index(
        params: EnvelopeParams,
        bad in bad_key(),
        position in any::<prop::sample::Index>(),
    ) {
        let mut recipients = params.recipient_public_keys();
        let index = position.index(recipients.len());
        recipients[index] = bad;

        let err = AuthCrypter::new(params.alg)
            .encrypt(&params.payload, &params.sender, &recipients)
            .unwrap_err();
        prop_assert_eq!(err, AuthCryptError::InvalidRecipientKey(index + 1));
    }

    #[test]
    fn mixed_key_pair_fails(params: EnvelopeParams, outsider in key_pair(), data in payload(64)) {
        let crypter = AuthCrypter::new(params.alg);
        let envelope = crypter
            .encrypt(&data, &params.sender, &params.recipient_public_keys())
            .unwrap();

        let mixed = KeyPair::new(params.recipients[0].public.clone(), outsider.private.clone());
        let err = crypter.decrypt(&envelope, &mixed).unwrap_err();
        prop_assert!(
            matches!(err, AuthCryptError::AuthenticationFailed { .. }),
            "unexpected error: {}",
            err
        );
    }
}
