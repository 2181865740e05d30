//! Wire codec for authcrypt envelopes.
//!
//! An envelope is a JSON object whose binary members are unpadded base64url:
//!
//! ```text
//! {
//!   "protected": b64({"typ","alg","enc"}),
//!   "recipients": [ { "encrypted_key", "header": { "apu", "iv", "tag", "kid", "spk" } } ],
//!   "aad": b64(sha256(sorted kids joined by ".")),
//!   "iv", "tag", "ciphertext"
//! }
//! ```
//!
//! Field order is part of the format; the structs below serialize in it.
//! The content cipher authenticates `protected + "." + aad` as associated data.

use authcrypt_core::{b64_decode, b64_encode, ContentEncryption, X25519PublicKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{AuthCryptError, Result, Stage};

/// `typ` of the outer protected header.
pub const AUTH_MESSAGE_TYPE: &str = "prs.hyperledger.aries-auth-message";

/// `typ` of the hidden-sender sub-envelope header.
pub const SENDER_KEY_TYPE: &str = "jose";

/// `cty` of the hidden-sender sub-envelope header.
pub const SENDER_KEY_CONTENT_TYPE: &str = "jwk+json";

/// Size of the random PartyUInfo drawn per recipient.
pub const APU_SIZE: usize = 64;

/// The outer protected header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedHeader {
    pub typ: String,
    pub alg: String,
    pub enc: String,
}

impl ProtectedHeader {
    /// Header for an envelope encrypted with `alg`.
    pub fn for_algorithm(alg: ContentEncryption) -> Self {
        Self {
            typ: AUTH_MESSAGE_TYPE.to_string(),
            alg: format!("ECDH-SS+{}", alg.key_wrap_name()),
            enc: alg.name().to_string(),
        }
    }

    /// Serialize and base64url-encode.
    pub fn encode(&self) -> Result<String> {
        let json =
            serde_json::to_vec(self).map_err(|e| AuthCryptError::Encryption(e.to_string()))?;
        Ok(b64_encode(json))
    }

    /// Decode the base64url form found on the wire.
    pub fn decode(encoded: &str) -> Result<Self> {
        let json = decode_field(Stage::Message, "protected", encoded)?;
        serde_json::from_slice(&json).map_err(|e| AuthCryptError::Decode {
            stage: Stage::Message,
            field: "protected",
            reason: e.to_string(),
        })
    }
}

/// Per-recipient header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientHeaders {
    /// PartyUInfo fed into the key-wrap KDF.
    pub apu: String,
    /// Key-wrap nonce.
    pub iv: String,
    /// Key-wrap tag.
    pub tag: String,
    /// Base58 recipient public key.
    pub kid: String,
    /// Hidden-sender sub-envelope (compact form).
    pub spk: String,
}

/// One recipient block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// The content key, wrapped for this recipient.
    pub encrypted_key: String,
    pub header: RecipientHeaders,
}

/// The authcrypt envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub protected: String,
    pub recipients: Vec<Recipient>,
    pub aad: String,
    pub iv: String,
    pub tag: String,
    pub ciphertext: String,
}

impl Envelope {
    /// Serialize to the JSON wire form.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| AuthCryptError::Encryption(e.to_string()))
    }

    /// Parse the JSON wire form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| AuthCryptError::Decode {
            stage: Stage::Message,
            field: "envelope",
            reason: e.to_string(),
        })
    }

    /// Find the recipient block addressed to `kid`.
    pub fn find_recipient(&self, kid: &str) -> Option<&Recipient> {
        self.recipients.iter().find(|r| r.header.kid == kid)
    }

    /// Key ids of all recipients, in envelope order.
    pub fn recipient_kids(&self) -> impl Iterator<Item = &str> {
        self.recipients.iter().map(|r| r.header.kid.as_str())
    }

    /// Decode the protected header.
    pub fn protected_header(&self) -> Result<ProtectedHeader> {
        ProtectedHeader::decode(&self.protected)
    }

    /// Associated data authenticated by the content cipher.
    pub fn content_aad(&self) -> Vec<u8> {
        content_aad(&self.protected, &self.aad)
    }
}

/// `protected + "." + aad`, exactly as transmitted.
pub fn content_aad(protected: &str, aad: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(protected.len() + 1 + aad.len());
    out.extend_from_slice(protected.as_bytes());
    out.push(b'.');
    out.extend_from_slice(aad.as_bytes());
    out
}

/// The envelope `aad` member for a set of recipient key ids.
pub fn compute_aad<S: AsRef<str>>(kids: &[S]) -> String {
    let mut sorted: Vec<&str> = kids.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();
    b64_encode(Sha256::digest(sorted.join(".").as_bytes()))
}

/// An OKP / X25519 JSON Web Key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    pub kty: String,
    pub crv: String,
    pub x: String,
}

impl Jwk {
    /// JWK for an X25519 public key.
    pub fn x25519(key: &X25519PublicKey) -> Self {
        Self {
            kty: "OKP".to_string(),
            crv: "X25519".to_string(),
            x: b64_encode(key.as_bytes()),
        }
    }

    /// The X25519 key, if this is a well-formed X25519 JWK.
    pub fn to_public_key(&self) -> Option<X25519PublicKey> {
        if self.kty != "OKP" || self.crv != "X25519" {
            return None;
        }
        let bytes = b64_decode(&self.x).ok()?;
        X25519PublicKey::from_slice(&bytes).ok()
    }
}

/// Protected header of the hidden-sender sub-envelope.
///
/// The nonce and tag of the wrapped sub-envelope key travel here rather
/// than in the compact parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderKeyHeader {
    pub typ: String,
    pub cty: String,
    pub alg: String,
    pub enc: String,
    pub epk: Jwk,
    pub iv: String,
    pub tag: String,
}

impl SenderKeyHeader {
    /// Header for a sub-envelope sealed with `alg` under ephemeral key `epk`.
    pub fn new(alg: ContentEncryption, epk: Jwk, iv: String, tag: String) -> Self {
        Self {
            typ: SENDER_KEY_TYPE.to_string(),
            cty: SENDER_KEY_CONTENT_TYPE.to_string(),
            alg: format!("ECDH-ES+{}", alg.key_wrap_name()),
            enc: alg.name().to_string(),
            epk,
            iv,
            tag,
        }
    }
}

/// Decode a base64url wire field, attributing failures to `stage`.
pub(crate) fn decode_field(stage: Stage, field: &'static str, value: &str) -> Result<Vec<u8>> {
    b64_decode(value).map_err(|e| AuthCryptError::Decode {
        stage,
        field,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Envelope {
        Envelope {
            protected: ProtectedHeader::for_algorithm(ContentEncryption::XChaCha20Poly1305)
                .encode()
                .unwrap(),
            recipients: vec![Recipient {
                encrypted_key: "ek".into(),
                header: RecipientHeaders {
                    apu: "apu".into(),
                    iv: "iv".into(),
                    tag: "tag".into(),
                    kid: "kid1".into(),
                    spk: "spk".into(),
                },
            }],
            aad: "aad".into(),
            iv: "iv".into(),
            tag: "tag".into(),
            ciphertext: "ct".into(),
        }
    }

    #[test]
    fn test_protected_header_bytes() {
        let header = ProtectedHeader::for_algorithm(ContentEncryption::XChaCha20Poly1305);
        assert_eq!(
            header.encode().unwrap(),
            "eyJ0eXAiOiJwcnMuaHlwZXJsZWRnZXIuYXJpZXMtYXV0aC1tZXNzYWdlIiwiYWxnIjoiRUNESC1TUytYQzIwUEtXIiwiZW5jIjoiWEMyMFAifQ"
        );

        let c20p = ProtectedHeader::for_algorithm(ContentEncryption::ChaCha20Poly1305);
        assert_eq!(c20p.alg, "ECDH-SS+C20PKW");
        assert_eq!(c20p.enc, "C20P");
    }

    #[test]
    fn test_field_order() {
        let json = String::from_utf8(sample().to_bytes().unwrap()).unwrap();
        let order = ["\"protected\"", "\"recipients\"", "\"aad\"", "\"iv\"", "\"tag\"", "\"ciphertext\""];
        let positions: Vec<usize> = order.iter().map(|k| json.rfind(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");

        assert!(json.contains(
            r#"{"encrypted_key":"ek","header":{"apu":"apu","iv":"iv","tag":"tag","kid":"kid1","spk":"spk"}}"#
        ));
    }

    #[test]
    fn test_parse_and_lookup() {
        let bytes = sample().to_bytes().unwrap();
        let parsed = Envelope::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, sample());
        assert!(parsed.find_recipient("kid1").is_some());
        assert!(parsed.find_recipient("kid2").is_none());
        assert_eq!(parsed.recipient_kids().collect::<Vec<_>>(), vec!["kid1"]);
    }

    #[test]
    fn test_malformed_json() {
        let err = Envelope::from_bytes(b"{badJWE}").unwrap_err();
        assert!(matches!(
            err,
            AuthCryptError::Decode {
                stage: Stage::Message,
                field: "envelope",
                ..
            }
        ));
    }

    #[test]
    fn test_compute_aad_sorts_kids() {
        let a = compute_aad(&["b", "a", "c"]);
        let b = compute_aad(&["c", "b", "a"]);
        assert_eq!(a, b);
        assert_eq!(a, b64_encode(Sha256::digest(b"a.b.c")));
    }

    #[test]
    fn test_reference_aad() {
        assert_eq!(
            compute_aad(&["18tUZoFCoRVEHdxTyNLRxzcKYV7ZyBm98gunvcChKr1"]),
            "rC0KS-IDOnn39WJvPXJQmP3M5qd_Ax4sYidWXdXSIek"
        );
    }

    #[test]
    fn test_content_aad() {
        assert_eq!(content_aad("p", "a"), b"p.a".to_vec());

        let envelope = sample();
        let expected = format!("{}.aad", envelope.protected);
        assert_eq!(envelope.content_aad(), expected.into_bytes());
    }

    #[test]
    fn test_jwk() {
        let key = X25519PublicKey::from_bytes([7u8; 32]);
        let jwk = Jwk::x25519(&key);
        assert_eq!(jwk.to_public_key(), Some(key));

        let json = serde_json::to_string(&jwk).unwrap();
        assert!(json.starts_with(r#"{"kty":"OKP","crv":"X25519","x":""#));

        let wrong_curve = Jwk {
            crv: "Ed25519".into(),
            ..jwk.clone()
        };
        assert_eq!(wrong_curve.to_public_key(), None);

        let short = Jwk {
            x: b64_encode([1u8; 8]),
            ..jwk
        };
        assert_eq!(short.to_public_key(), None);
    }

    #[test]
    fn test_protected_decode_errors() {
        assert!(matches!(
            ProtectedHeader::decode("!!"),
            Err(AuthCryptError::Decode {
                field: "protected",
                ..
            })
        ));
        assert!(matches!(
            ProtectedHeader::decode(&b64_encode(b"not json")),
            Err(AuthCryptError::Decode {
                field: "protected",
                ..
            })
        ));
    }
}
