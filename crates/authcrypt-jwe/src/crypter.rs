//! The AuthCrypter: multi-recipient authenticated encryption.
//!
//! `encrypt` produces one content ciphertext shared by every recipient and
//! one independent recipient block per recipient key. `decrypt` selects the
//! caller's block by `kid`, recovers the sender key from its `spk`, unwraps
//! the content key, and opens the content.
//!
//! The crypter holds only its content algorithm, fixed at construction, so
//! one instance can be shared freely across threads.

use authcrypt_core::{
    b64_encode, key_id, random_nonce, ContentCipher, ContentEncryption, ContentKey, KeyPair,
    X25519PublicKey,
};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::envelope::{compute_aad, content_aad, decode_field, Envelope, ProtectedHeader};
use crate::error::{AuthCryptError, Result, Stage};
use crate::keywrap::{open_recipient, seal_recipient};
use crate::spk::open_sender_key;

/// Encrypt/decrypt capability consumed by the protocol layers.
pub trait Crypter: Send + Sync {
    /// Encrypt `plaintext` from `sender` to every key in `recipients`.
    fn encrypt(&self, plaintext: &[u8], sender: &KeyPair, recipients: &[Vec<u8>])
        -> Result<Vec<u8>>;

    /// Decrypt an envelope addressed to `recipient`.
    fn decrypt(&self, envelope: &[u8], recipient: &KeyPair) -> Result<Vec<u8>>;
}

/// Authcrypt envelope encrypter / decrypter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthCrypter {
    alg: ContentEncryption,
}

impl AuthCrypter {
    /// Create a crypter for `alg`.
    pub const fn new(alg: ContentEncryption) -> Self {
        Self { alg }
    }

    /// Create a crypter from a wire algorithm name (`C20P` or `XC20P`).
    pub fn from_name(name: &str) -> Result<Self> {
        Ok(Self::new(name.parse()?))
    }

    /// The content algorithm.
    pub const fn algorithm(&self) -> ContentEncryption {
        self.alg
    }

    /// Nonce size used for content and key wrapping.
    pub const fn nonce_size(&self) -> usize {
        self.alg.nonce_size()
    }

    /// Encrypt with randomness drawn from `rng`.
    pub fn encrypt_with_rng<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        plaintext: &[u8],
        sender: &KeyPair,
        recipients: &[Vec<u8>],
    ) -> Result<Vec<u8>> {
        if recipients.is_empty() {
            return Err(AuthCryptError::EmptyRecipientList);
        }
        if !sender.is_present() {
            return Err(AuthCryptError::InvalidKeypair);
        }
        let sender_public = sender.public_key()?;
        let sender_secret = sender.secret()?;

        let recipient_keys = recipients
            .iter()
            .enumerate()
            .map(|(i, key)| {
                X25519PublicKey::from_slice(key)
                    .map_err(|_| AuthCryptError::InvalidRecipientKey(i + 1))
            })
            .collect::<Result<Vec<_>>>()?;

        let protected = ProtectedHeader::for_algorithm(self.alg).encode()?;
        let kids: Vec<String> = recipient_keys
            .iter()
            .map(|key| key_id(key.as_bytes()))
            .collect();
        let aad = compute_aad(&kids);

        let cek = ContentKey::generate_from_rng(rng);
        let iv = random_nonce(rng, self.nonce_size());
        let (ciphertext, tag) = ContentCipher::new(self.alg, &cek).seal(
            &iv,
            plaintext,
            &content_aad(&protected, &aad),
        )?;

        let recipients = recipient_keys
            .iter()
            .map(|recipient_public| {
                seal_recipient(
                    self.alg,
                    rng,
                    &cek,
                    &sender_secret,
                    &sender_public,
                    recipient_public,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        Envelope {
            protected,
            recipients,
            aad,
            iv: b64_encode(&iv),
            tag: b64_encode(&tag),
            ciphertext: b64_encode(&ciphertext),
        }
        .to_bytes()
    }

    fn open_content(&self, envelope: &Envelope, cek: &ContentKey) -> Result<Vec<u8>> {
        decode_field(Stage::Message, "aad", &envelope.aad)?;
        let iv = decode_field(Stage::Message, "iv", &envelope.iv)?;
        let tag = decode_field(Stage::Message, "tag", &envelope.tag)?;
        let ciphertext = decode_field(Stage::Message, "ciphertext", &envelope.ciphertext)?;

        ContentCipher::new(self.alg, cek)
            .open(&iv, &ciphertext, &tag, &envelope.content_aad())
            .map_err(|e| AuthCryptError::at(Stage::Message, e))
    }
}

impl Default for AuthCrypter {
    fn default() -> Self {
        Self::new(ContentEncryption::default())
    }
}

impl Crypter for AuthCrypter {
    fn encrypt(
        &self,
        plaintext: &[u8],
        sender: &KeyPair,
        recipients: &[Vec<u8>],
    ) -> Result<Vec<u8>> {
        self.encrypt_with_rng(&mut OsRng, plaintext, sender, recipients)
    }

    fn decrypt(&self, envelope: &[u8], recipient: &KeyPair) -> Result<Vec<u8>> {
        let envelope = Envelope::from_bytes(envelope)?;
        if recipient.public.is_empty() {
            return Err(AuthCryptError::RecipientNotFound);
        }

        let header = envelope.protected_header()?;
        if header.enc != self.alg.name() {
            return Err(AuthCryptError::AlgorithmMismatch {
                expected: self.alg,
                found: header.enc,
            });
        }

        let block = envelope
            .find_recipient(&key_id(&recipient.public))
            .ok_or(AuthCryptError::RecipientNotFound)?;

        // The aad commits to the full recipient set.
        let kids: Vec<&str> = envelope.recipient_kids().collect();
        if compute_aad(&kids) != envelope.aad {
            return Err(AuthCryptError::AuthenticationFailed {
                stage: Stage::Message,
            });
        }
        let recipient_secret = recipient.secret()?;

        let sender_public = open_sender_key(self.alg, &recipient_secret, &block.header.spk)?;
        let cek = open_recipient(self.alg, &recipient_secret, &sender_public, block)?;

        self.open_content(&envelope, &cek)
    }
}
