//! Error types for the session service
//!
//! Defines the application-level taxonomy and token verification errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

use crate::store::StoreError;

/// Token verification failures
///
/// Callers map all three to "unauthorized", but the cases stay distinct so
/// diagnostics (and tests) can tell a bad signature from a stale token.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Not parseable as a token at all
    #[error("malformed token")]
    Malformed,

    /// Well-formed but the signature does not verify
    #[error("invalid token signature")]
    Invalid,

    /// Signature verifies but the token is past its expiry
    #[error("token expired")]
    Expired,
}

/// Application-level errors
///
/// The core signals precise kinds; the API layer translates them to
/// user-facing responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Code space saturated: every creation attempt found its code taken
    #[error("no available session codes after {attempts} attempts")]
    ResourceExhausted { attempts: u32 },

    /// Session or resource absent
    #[error("session not found: {0}")]
    NotFound(String),

    /// Token rejected (malformed, bad signature, or expired)
    #[error("unauthorized: {0}")]
    Token(#[from] TokenError),

    /// Valid token, but bound to a different session than the one addressed
    #[error("token is bound to session '{bound}', not '{requested}'")]
    SessionMismatch { bound: String, requested: String },

    /// Valid token but insufficient privilege (e.g. non-creator destroy)
    #[error("forbidden")]
    Forbidden,

    /// Transient store failure; safe to retry with backoff upstream
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Serialization failure
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(reason) => AppError::StoreUnavailable(reason),
        }
    }
}
