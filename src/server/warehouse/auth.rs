//! Key-pair JWT authentication for the Snowflake SQL API.
//!
//! Snowflake identifies the signing key by the SHA-256 fingerprint of its public key. The
//! token's issuer is `<ACCOUNT>.<USER>.SHA256:<fingerprint>` and its subject
//! `<ACCOUNT>.<USER>`, where the account is the bare account identifier without any region
//! suffix.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use openssl::{pkey::PKey, sha::sha256};
use serde::{Deserialize, Serialize};

use crate::server::error::{config::ConfigError, Error};

/// Lifetime of issued tokens; Snowflake rejects tokens valid for more than one hour
pub const TOKEN_LIFETIME_SECS: i64 = 59 * 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// A signed token and the instant it stops being accepted
#[derive(Clone, Debug)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs key-pair JWTs for one warehouse user
#[derive(Clone)]
pub struct KeyPairAuth {
    encoding_key: EncodingKey,
    qualified_user: String,
    fingerprint: String,
}

impl KeyPairAuth {
    /// Decrypts the PEM private key with `passphrase` and derives the public key fingerprint
    ///
    /// # Returns
    /// - `Ok(KeyPairAuth)` - Key decrypted and ready to sign tokens
    /// - `Err(Error::ConfigError(ConfigError::InvalidPrivateKey))` - Wrong passphrase, malformed
    ///   PEM, or a key that is not RSA
    pub fn new(account: &str, user: &str, private_key_pem: &[u8], passphrase: &str) -> Result<Self, Error> {
        let pkey = PKey::private_key_from_pem_passphrase(private_key_pem, passphrase.as_bytes())
            .map_err(|e| ConfigError::InvalidPrivateKey(e.to_string()))?;
        let rsa = pkey
            .rsa()
            .map_err(|e| ConfigError::InvalidPrivateKey(format!("expected an RSA key: {}", e)))?;

        let public_key_der = pkey.public_key_to_der()?;
        let fingerprint = format!("SHA256:{}", STANDARD.encode(sha256(&public_key_der)));
        let encoding_key = EncodingKey::from_rsa_der(&rsa.private_key_to_der()?);

        Ok(Self {
            encoding_key,
            qualified_user: format!("{}.{}", account_identifier(account), user.to_uppercase()),
            fingerprint,
        })
    }

    /// `SHA256:<base64>` fingerprint of the public key
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Signs a token valid from `now` for [`TOKEN_LIFETIME_SECS`]
    pub fn issue_token(&self, now: DateTime<Utc>) -> Result<IssuedToken, Error> {
        let expires_at = now + Duration::seconds(TOKEN_LIFETIME_SECS);
        let claims = Claims {
            iss: format!("{}.{}", self.qualified_user, self.fingerprint),
            sub: self.qualified_user.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)?;

        Ok(IssuedToken { token, expires_at })
    }
}

/// Upper-cased account identifier with any `.region` suffix removed
pub fn account_identifier(account: &str) -> String {
    account
        .split('.')
        .next()
        .unwrap_or(account)
        .to_uppercase()
}
