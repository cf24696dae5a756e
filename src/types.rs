//! Basic type definitions for the session service
//!
//! Provides the `SessionCode` newtype: a short fixed-alphabet identifier
//! that doubles as the session's lookup key.

use serde::{Deserialize, Serialize};

/// Alphabet session codes are drawn from (single-case to avoid ambiguity)
pub const CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Fixed length of a session code
pub const CODE_LENGTH: usize = 4;

/// Session code (4-character lowercase alphanumeric)
///
/// Identifies a session and keys its store entries.
/// Incoming codes are lowercased so mixed-case input still resolves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionCode(pub String);

impl SessionCode {
    /// Create a SessionCode from a string (converts to lowercase)
    pub fn from_string(code: String) -> Self {
        Self(code.to_lowercase())
    }

    /// The code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
