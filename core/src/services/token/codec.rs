//! Compact signed token encoding over `jsonwebtoken`.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sha2::{Digest, Sha256};

use crate::domain::entities::token::Claims;
use crate::errors::TokenError;

use super::config::TokenServiceConfig;

/// Signs and verifies session tokens
///
/// Stateless apart from key material. Only the configured HMAC algorithm is
/// ever accepted on verification; a token whose header names any other
/// algorithm fails with [`TokenError::InvalidSignature`].
pub struct TokenCodec {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Creates a codec from the service configuration
    ///
    /// # Errors
    /// * `TokenError::SigningFailed` - Empty secret or a non-HMAC algorithm
    pub fn new(config: &TokenServiceConfig) -> Result<Self, TokenError> {
        if config.jwt_secret.is_empty() {
            return Err(TokenError::SigningFailed {
                reason: "signing secret is empty".to_string(),
            });
        }

        if !matches!(
            config.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(TokenError::SigningFailed {
                reason: format!("unsupported signing algorithm {:?}", config.algorithm),
            });
        }

        let secret = config.jwt_secret.as_bytes();

        // Expiry is checked by hand with zero leeway, see `check_expiry`
        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.validate_exp = false;
        validation.leeway = 0;

        Ok(Self {
            algorithm: config.algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Signs `claims` into a compact token string
    pub fn issue(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key).map_err(|e| {
            TokenError::SigningFailed {
                reason: e.to_string(),
            }
        })
    }

    /// Verifies signature, issuer, audience and expiry
    ///
    /// # Errors
    /// * `TokenError::MalformedToken` - Cannot be parsed or registered claims are wrong
    /// * `TokenError::InvalidSignature` - Tampered, wrong key or unexpected algorithm
    /// * `TokenError::TokenExpired` - `exp <= now`
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.verify_ignoring_expiry(token)?;
        Self::check_expiry(&claims)?;
        Ok(claims)
    }

    /// Verifies everything but expiry, to recover the claims of a stale token
    pub fn verify_ignoring_expiry(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| map_decode_error(e.kind()))
    }

    /// Lowercase hex SHA-256 of the full token string
    ///
    /// Revocation entries are keyed by this digest so that no store ever
    /// holds a usable credential.
    pub fn hash_token(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }

    /// The one algorithm this codec signs with and accepts
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn check_expiry(claims: &Claims) -> Result<(), TokenError> {
        if claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::TokenExpired);
        }
        Ok(())
    }
}

fn map_decode_error(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::TokenExpired,
        _ => TokenError::MalformedToken,
    }
}
