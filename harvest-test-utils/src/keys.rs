use std::sync::OnceLock;

use openssl::{pkey::PKey, rsa::Rsa, symm::Cipher};

use crate::error::TestError;

/// Passphrase protecting every generated test key
pub const TEST_KEY_PASSPHRASE: &str = "harvest-test-passphrase";

static SHARED_KEY: OnceLock<TestKeyPair> = OnceLock::new();

/// RSA key pair in the shape Snowflake key-pair authentication expects
pub struct TestKeyPair {
    /// PKCS#8 PEM encrypted with [`TEST_KEY_PASSPHRASE`]
    pub private_key_pem: Vec<u8>,
    pub passphrase: String,
    /// SubjectPublicKeyInfo PEM used to verify issued tokens
    pub public_key_pem: Vec<u8>,
}

impl TestKeyPair {
    /// Generates a fresh 2048-bit key pair
    pub fn generate() -> Result<Self, TestError> {
        let rsa = Rsa::generate(2048)?;
        let pkey = PKey::from_rsa(rsa)?;

        let private_key_pem = pkey.private_key_to_pem_pkcs8_passphrase(
            Cipher::aes_256_cbc(),
            TEST_KEY_PASSPHRASE.as_bytes(),
        )?;
        let public_key_pem = pkey.public_key_to_pem()?;

        Ok(Self {
            private_key_pem,
            passphrase: TEST_KEY_PASSPHRASE.to_string(),
            public_key_pem,
        })
    }

    /// Key pair generated once per test binary; key generation is slow
    pub fn shared() -> &'static TestKeyPair {
        SHARED_KEY.get_or_init(|| Self::generate().expect("Failed to generate test RSA key"))
    }
}
