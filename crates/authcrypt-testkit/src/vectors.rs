//! Interop vectors produced by other authcrypt implementations.
//!
//! Every implementation must decrypt these envelopes to the listed
//! plaintext and recover the listed sender key.

use authcrypt_core::{b64_decode, ContentEncryption, KeyPair, X25519PublicKey};
use authcrypt_jwe::{AuthCrypter, Crypter};

/// A known envelope with the key material needed to open it.
#[derive(Debug, Clone)]
pub struct ReferenceVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Content encryption the envelope was built with.
    pub alg: ContentEncryption,
    /// Recipient public key (base64url).
    pub recipient_public: &'static str,
    /// Recipient private key (base64url).
    pub recipient_private: &'static str,
    /// Sender public key carried in the `spk` (base64url).
    pub sender_public: &'static str,
    /// Expected plaintext.
    pub plaintext: &'static [u8],
    /// The envelope JSON.
    pub envelope: &'static str,
}

impl ReferenceVector {
    /// The recipient key pair.
    ///
    /// # Panics
    ///
    /// Panics if the vector's keys are not valid base64url.
    pub fn recipient_key_pair(&self) -> KeyPair {
        KeyPair::new(
            b64_decode(self.recipient_public).expect("recipient public key"),
            b64_decode(self.recipient_private).expect("recipient private key"),
        )
    }

    /// The sender public key.
    ///
    /// # Panics
    ///
    /// Panics if the vector's sender key is not a valid 32-byte key.
    pub fn sender_key(&self) -> X25519PublicKey {
        let bytes = b64_decode(self.sender_public).expect("sender public key");
        X25519PublicKey::from_slice(&bytes).expect("sender key length")
    }
}

/// Envelope produced by the PHP implementation: XC20P, one recipient.
pub const PHP_XC20P: &str = r#"{
    "protected": "eyJ0eXAiOiJwcnMuaHlwZXJsZWRnZXIuYXJpZXMtYXV0aC1tZXNzYWdlIiwiYWxnIjoiRUNESC1TUytYQzIwUEtXIiwiZW5jIjoiWEMyMFAifQ",
    "recipients": [
        {
            "encrypted_key": "46R0uW5KUbaZYt5PpIW5j1v_H8BS2SLrdPEzUaK8V0U",
            "header": {
                "apu": "tDzm-bgMblZUgzONI7NTHcSqObP9NX21Vkeid8RFf-PzbJrdU3ApC_f0fDfZVxTwyw-5OZQcTti1H1esIfBFvg",
                "iv": "5HTxplQx5sOfwWtfR5oK416ahbRChh-b",
                "tag": "qrtr29m4EKh5WV6l47fcCw",
                "kid": "18tUZoFCoRVEHdxTyNLRxzcKYV7ZyBm98gunvcChKr1",
                "spk": "eyJ0eXAiOiJqb3NlIiwiY3R5IjoiandrK2pzb24iLCJhbGciOiJFQ0RILUVTK1hDMjBQS1ciLCJlbmMiOiJYQzIwUCIsImVwayI6eyJrdHkiOiJPS1AiLCJjcnYiOiJYMjU1MTkiLCJ4IjoiT0ZkRlN3bTR5Sm5oZmxZNUNZZ1FSVG9ra2ExNHQ0VnNCM216M0N4XzZuayJ9LCJpdiI6Ik5SZkp6Z1N5UE9JU3dOMURSR3lTSERXcXVqdUVXQmgtIiwidGFnIjoibTFsekRSTTl5VEp5cEJOYkVnSE5adyJ9.KIcpv4hUlq0gAb8FpWkSWFnlcshrdNRz51iVoTFyy7E.53YTian9wG5u-S2J2YTjI1TayqW-YMuL.uw6ucr25OIZTfsGQRp8t9fllV0ClBmuhblnTHG6hlh0EEqAWal9jgd6jDbf6Xb_HPzpLSfX7uwYTA11Ui7jZloP8aRjnAKsiEO1-4d-R.GTwXUgcy89zjIAi1Z4WpIA"
            }
        }
    ],
    "aad": "rC0KS-IDOnn39WJvPXJQmP3M5qd_Ax4sYidWXdXSIek",
    "iv": "JS2FxjEKdndnt-J7QX5pEnVwyBTu0_3d",
    "tag": "2FqZMMQuNPYfL0JsSkj8LQ",
    "ciphertext": "qQyzvajdvCDJbwxM"
}"#;

/// Get all reference vectors.
pub fn reference_vectors() -> Vec<ReferenceVector> {
    vec![ReferenceVector {
        name: "PHP XC20P single recipient",
        alg: ContentEncryption::XChaCha20Poly1305,
        recipient_public: "AAjrHjiFLw6kf6CZ5zqH1ooG3y2aQhuqxmUvqJnIvDI",
        recipient_private: "c8CSJr_27PN9xWCpzXNmepRndD6neQcnO9DS0YWjhNs",
        sender_public: "4D8sOLpHSzvZ06SvvEOQCZU_ibb3ZtfW2N9ULKFgwm4",
        plaintext: b"Hello World!",
        envelope: PHP_XC20P,
    }]
}

/// Decrypt every reference vector.
///
/// Returns `(name, matches, detail)` per vector, where `detail` is the
/// decryption error when one occurred.
pub fn verify_reference_vectors() -> Vec<(String, bool, String)> {
    reference_vectors()
        .iter()
        .map(|v| {
            let crypter = AuthCrypter::new(v.alg);
            match crypter.decrypt(v.envelope.as_bytes(), &v.recipient_key_pair()) {
                Ok(plaintext) => (v.name.to_string(), plaintext == v.plaintext, String::new()),
                Err(e) => (v.name.to_string(), false, e.to_string()),
            }
        })
        .collect()
}
