//! JWT token issuance and verification.
//!
//! The accepted algorithm is fixed when the codec is built; the `alg` header
//! of an incoming token is never trusted to pick it.

use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::models::TokenClaims;

/// Token codec errors.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Empty token")]
    Empty,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Signing failed: {0}")]
    Signing(String),
}

/// Signs and verifies access tokens with a server-held secret.
#[derive(Clone)]
pub struct TokenCodec {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Build a codec for `algorithm` keyed by `secret`.
    ///
    /// Only the HMAC family can sign with a shared secret; any other
    /// algorithm makes `issue` fail with `TokenError::Signing`.
    pub fn new(secret: &str, algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign `claims` into a compact JWT.
    pub fn issue(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(format!("jwt encode: {e}")))
    }

    /// Verify signature, algorithm and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        if token.is_empty() {
            return Err(TokenError::Empty);
        }
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation())
            .map(|data| data.claims)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }

    fn validation(&self) -> Validation {
        // `Validation::new` accepts exactly this algorithm and requires `exp`.
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation
    }
}
