//! Token service
//!
//! Issues and verifies signed tokens binding an identity to one session.
//! Tokens are stateless — nothing is persisted and there is no revocation
//! list, which is why callers must re-check session existence on every
//! sensitive operation rather than trusting the token alone.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TokenError;
use crate::types::SessionCode;

/// How long an issued token stays valid
pub const TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

/// Claims carried inside a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Session code the token is bound to
    pub session: String,
    /// Identity of the holder
    pub sub: String,
    /// Issued-at, seconds since epoch
    pub iat: u64,
    /// Expiry, seconds since epoch
    pub exp: u64,
    /// Unique token id
    pub jti: String,
}

/// HMAC-signed session token issuer and verifier
///
/// Holds the process-wide secret; all instances sharing a secret accept each
/// other's tokens, so multiple service processes can front the same store.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    /// Create a service signing with the given secret
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a token binding `identity` to `code`
    pub fn issue(&self, code: &SessionCode, identity: &str) -> Result<String, TokenError> {
        let now = jsonwebtoken::get_current_timestamp();
        let claims = Claims {
            session: code.as_str().to_string(),
            sub: identity.to_string(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
            jti: Uuid::new_v4().to_string(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|_| TokenError::Malformed)
    }

    /// Verify signature and expiry, returning the embedded claims
    ///
    /// The session binding is the caller's to check against the resource it
    /// is authorizing; this method only vouches for authenticity.
    pub fn parse_and_verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::Invalid,
                _ => TokenError::Malformed,
            })
    }
}
