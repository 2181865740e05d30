//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use authcrypt::{KeyStore, MemoryKeyStore, Packager, PackagerConfig};
use authcrypt_core::{ContentEncryption, KeyPair};
use authcrypt_jwe::{AuthCrypter, Crypter, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A sender and a set of recipients sharing one crypter.
pub struct TestFixture {
    pub crypter: AuthCrypter,
    pub sender: KeyPair,
    pub recipients: Vec<KeyPair>,
}

impl TestFixture {
    /// Create a fixture with random keys and `recipients` recipients.
    pub fn new(recipients: usize) -> Self {
        Self::with_algorithm(ContentEncryption::default(), recipients)
    }

    /// Create a fixture for a specific content algorithm.
    pub fn with_algorithm(alg: ContentEncryption, recipients: usize) -> Self {
        Self {
            crypter: AuthCrypter::new(alg),
            sender: KeyPair::generate(),
            recipients: (0..recipients).map(|_| KeyPair::generate()).collect(),
        }
    }

    /// Create with deterministic keys from seed.
    pub fn with_seed(seed: [u8; 32], recipients: usize) -> Self {
        let mut rng = StdRng::from_seed(seed);
        Self {
            crypter: AuthCrypter::default(),
            sender: KeyPair::generate_from_rng(&mut rng),
            recipients: (0..recipients)
                .map(|_| KeyPair::generate_from_rng(&mut rng))
                .collect(),
        }
    }

    /// Public keys of all recipients, in order.
    pub fn recipient_public_keys(&self) -> Vec<Vec<u8>> {
        self.recipients.iter().map(|k| k.public.clone()).collect()
    }

    /// Encrypt `payload` from the sender to every recipient.
    pub fn encrypt(&self, payload: &[u8]) -> Result<Vec<u8>> {
        self.crypter
            .encrypt(payload, &self.sender, &self.recipient_public_keys())
    }

    /// Decrypt as recipient `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn decrypt_as(&self, index: usize, envelope: &[u8]) -> Result<Vec<u8>> {
        self.crypter.decrypt(envelope, &self.recipients[index])
    }
}

/// Create several fixtures with distinct senders.
pub fn multi_party_fixtures(count: usize, recipients: usize) -> Vec<TestFixture> {
    (0..count).map(|_| TestFixture::new(recipients)).collect()
}

/// An agent with its own key store holding one encryption key.
pub struct AgentFixture {
    pub packager: Packager<MemoryKeyStore>,
    pub kid: String,
}

impl AgentFixture {
    /// Create an agent with the default configuration.
    pub async fn new() -> authcrypt::Result<Self> {
        Self::with_config(PackagerConfig::default()).await
    }

    /// Create an agent with a specific configuration.
    pub async fn with_config(config: PackagerConfig) -> authcrypt::Result<Self> {
        let packager = Packager::new(MemoryKeyStore::new(), config);
        let kid = packager.store().create_encryption_key().await?;
        Ok(Self { packager, kid })
    }
}
