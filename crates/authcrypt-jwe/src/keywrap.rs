//! Per-recipient key wrapping.
//!
//! The content key (CEK) is encrypted once per recipient under a key-wrap
//! key (KEK) derived from a static-static X25519 agreement:
//!
//! ```text
//! Z   = X25519(sender_priv, recipient_pub) = X25519(recipient_priv, sender_pub)
//! KEK = ConcatKDF-SHA256(Z, alg = enc, apu = 64 random bytes, apv = "")
//! encrypted_key || tag = AEAD(KEK).seal(iv, CEK, aad = "")
//! ```
//!
//! The recipient only learns `sender_pub` after opening the hidden-sender
//! sub-envelope, so the KEK cannot be rebuilt by anyone who is not a
//! recipient.

use authcrypt_core::{
    b64_encode, key_id, random_nonce, ContentCipher, ContentEncryption, ContentKey,
    X25519PublicKey, X25519StaticSecret,
};
use rand::{CryptoRng, RngCore};

use crate::envelope::{decode_field, Recipient, RecipientHeaders, APU_SIZE};
use crate::error::{AuthCryptError, Result, Stage};
use crate::spk;

/// A key encrypted under a KEK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedKey {
    pub encrypted_key: Vec<u8>,
    pub iv: Vec<u8>,
    pub tag: Vec<u8>,
}

/// Encrypt `key` under `kek` with a fresh nonce.
pub fn wrap_key<R: RngCore + CryptoRng>(
    alg: ContentEncryption,
    rng: &mut R,
    kek: &ContentKey,
    key: &ContentKey,
) -> authcrypt_core::Result<WrappedKey> {
    let iv = random_nonce(rng, alg.nonce_size());
    let (encrypted_key, tag) = ContentCipher::new(alg, kek).seal(&iv, key.as_bytes(), &[])?;

    Ok(WrappedKey {
        encrypted_key,
        iv,
        tag,
    })
}

/// Decrypt a wrapped key and check that it is a full-size key.
pub fn unwrap_key(
    alg: ContentEncryption,
    kek: &ContentKey,
    wrapped: &WrappedKey,
) -> authcrypt_core::Result<ContentKey> {
    let key_bytes = ContentCipher::new(alg, kek).open(
        &wrapped.iv,
        &wrapped.encrypted_key,
        &wrapped.tag,
        &[],
    )?;
    ContentKey::from_slice(&key_bytes)
}

/// Build the recipient block for one recipient.
///
/// Draws a fresh `apu`, a fresh wrap nonce, and a fresh ephemeral key for
/// the hidden-sender sub-envelope; nothing is shared with other recipients
/// except the CEK itself.
pub fn seal_recipient<R: RngCore + CryptoRng>(
    alg: ContentEncryption,
    rng: &mut R,
    cek: &ContentKey,
    sender_secret: &X25519StaticSecret,
    sender_public: &X25519PublicKey,
    recipient_public: &X25519PublicKey,
) -> Result<Recipient> {
    let spk = spk::seal_sender_key(alg, rng, sender_public, recipient_public)?;

    let mut apu = [0u8; APU_SIZE];
    rng.fill_bytes(&mut apu);

    let kek = sender_secret
        .diffie_hellman(recipient_public)
        .derive_key(alg.name(), &apu);
    let wrapped = wrap_key(alg, rng, &kek, cek)?;

    Ok(Recipient {
        encrypted_key: b64_encode(&wrapped.encrypted_key),
        header: RecipientHeaders {
            apu: b64_encode(apu),
            iv: b64_encode(&wrapped.iv),
            tag: b64_encode(&wrapped.tag),
            kid: key_id(recipient_public.as_bytes()),
            spk,
        },
    })
}

/// Recover the CEK from a recipient block.
///
/// `sender_public` is the key recovered from the block's `spk`.
pub fn open_recipient(
    alg: ContentEncryption,
    recipient_secret: &X25519StaticSecret,
    sender_public: &X25519PublicKey,
    recipient: &Recipient,
) -> Result<ContentKey> {
    let header = &recipient.header;
    let apu = decode_field(Stage::SharedKey, "apu", &header.apu)?;
    let wrapped = WrappedKey {
        iv: decode_field(Stage::SharedKey, "iv", &header.iv)?,
        tag: decode_field(Stage::SharedKey, "tag", &header.tag)?,
        encrypted_key: decode_field(Stage::SharedKey, "encrypted_key", &recipient.encrypted_key)?,
    };

    let kek = recipient_secret
        .diffie_hellman(sender_public)
        .derive_key(alg.name(), &apu);

    unwrap_key(alg, &kek, &wrapped).map_err(|e| AuthCryptError::at(Stage::SharedKey, e))
}
