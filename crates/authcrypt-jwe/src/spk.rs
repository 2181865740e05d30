//! Hidden-sender sub-envelope (`spk`).
//!
//! Each recipient block carries the sender's public key encrypted to that
//! recipient alone, as a five-part compact JWE:
//!
//! ```text
//! b64(header) . b64(wrapped sub-key) . b64(iv) . b64(ciphertext) . b64(tag)
//! ```
//!
//! The header names a fresh ephemeral X25519 key (`epk`). The sub-key is
//! wrapped under `ConcatKDF(X25519(eph_priv, recipient_pub), alg = "<enc>KW")`
//! with the wrap nonce and tag stored in the header. The ciphertext is the
//! sender's key as an OKP JWK, authenticated together with the encoded
//! header.

use authcrypt_core::{
    b64_encode, random_nonce, ContentCipher, ContentEncryption, ContentKey, EphemeralKeyPair,
    X25519PublicKey, X25519StaticSecret,
};
use rand::{CryptoRng, RngCore};

use crate::envelope::{decode_field, Jwk, SenderKeyHeader};
use crate::error::{AuthCryptError, Result, Stage};
use crate::keywrap::{unwrap_key, wrap_key, WrappedKey};

/// Encrypt `sender_public` so that only the holder of `recipient_public` can read it.
pub fn seal_sender_key<R: RngCore + CryptoRng>(
    alg: ContentEncryption,
    rng: &mut R,
    sender_public: &X25519PublicKey,
    recipient_public: &X25519PublicKey,
) -> Result<String> {
    let ephemeral = EphemeralKeyPair::generate_from_rng(rng);
    let epk = Jwk::x25519(&ephemeral.public_key());
    let kek = ephemeral
        .diffie_hellman(recipient_public)
        .derive_key(&alg.key_wrap_name(), &[]);

    let sub_key = ContentKey::generate_from_rng(rng);
    let wrapped = wrap_key(alg, rng, &kek, &sub_key)?;

    let header = SenderKeyHeader::new(alg, epk, b64_encode(&wrapped.iv), b64_encode(&wrapped.tag));
    let header_json =
        serde_json::to_vec(&header).map_err(|e| AuthCryptError::Encryption(e.to_string()))?;
    let header_b64 = b64_encode(header_json);

    let payload = serde_json::to_vec(&Jwk::x25519(sender_public))
        .map_err(|e| AuthCryptError::Encryption(e.to_string()))?;
    let iv = random_nonce(rng, alg.nonce_size());
    let (ciphertext, tag) =
        ContentCipher::new(alg, &sub_key).seal(&iv, &payload, header_b64.as_bytes())?;

    Ok([
        header_b64,
        b64_encode(&wrapped.encrypted_key),
        b64_encode(&iv),
        b64_encode(&ciphertext),
        b64_encode(&tag),
    ]
    .join("."))
}

/// Recover the sender's public key from a compact `spk`.
pub fn open_sender_key(
    alg: ContentEncryption,
    recipient_secret: &X25519StaticSecret,
    spk: &str,
) -> Result<X25519PublicKey> {
    let parts: Vec<&str> = spk.split('.').collect();
    let [header_b64, encrypted_key, iv, ciphertext, tag] = parts.as_slice() else {
        return Err(AuthCryptError::BadSenderKeyFormat);
    };

    let header_json = decode_field(Stage::SenderKey, "spk header", header_b64)?;
    let header: SenderKeyHeader =
        serde_json::from_slice(&header_json).map_err(|_| AuthCryptError::BadSenderKeyFormat)?;
    if header.enc != alg.name() {
        return Err(AuthCryptError::BadSenderKeyFormat);
    }
    let epk = header
        .epk
        .to_public_key()
        .ok_or(AuthCryptError::BadSenderKeyFormat)?;

    let wrapped = WrappedKey {
        encrypted_key: decode_field(Stage::SenderKey, "spk encrypted key", encrypted_key)?,
        iv: decode_field(Stage::SenderKey, "spk header iv", &header.iv)?,
        tag: decode_field(Stage::SenderKey, "spk header tag", &header.tag)?,
    };
    let iv = decode_field(Stage::SenderKey, "spk iv", iv)?;
    let ciphertext = decode_field(Stage::SenderKey, "spk ciphertext", ciphertext)?;
    let tag = decode_field(Stage::SenderKey, "spk tag", tag)?;

    let kek = recipient_secret
        .diffie_hellman(&epk)
        .derive_key(&alg.key_wrap_name(), &[]);
    let sub_key =
        unwrap_key(alg, &kek, &wrapped).map_err(|e| AuthCryptError::at(Stage::SenderKey, e))?;

    let payload = ContentCipher::new(alg, &sub_key)
        .open(&iv, &ciphertext, &tag, header_b64.as_bytes())
        .map_err(|e| AuthCryptError::at(Stage::SenderKey, e))?;

    let jwk: Jwk =
        serde_json::from_slice(&payload).map_err(|_| AuthCryptError::BadSenderKeyFormat)?;
    jwk.to_public_key().ok_or(AuthCryptError::BadSenderKeyFormat)
}
