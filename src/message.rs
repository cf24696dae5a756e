//! Message wire record
//!
//! The serialized field names and types are the wire contract for anything
//! reading the store's message lists directly.

use serde::{Deserialize, Serialize};

/// A single chat message within a session
///
/// Immutable once appended. `timestamp` is assigned by the server at append
/// time in milliseconds since the epoch; it is informational only — the
/// store's append order, not the timestamp, is the authoritative sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Identity of the sender (taken from the token subject)
    pub from: String,
    /// Opaque message payload
    pub text: String,
    /// Server-assigned epoch milliseconds at append time
    pub timestamp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let msg = Message {
            from: "alice".to_string(),
            text: "hi".to_string(),
            timestamp: 1_700_000_000_000,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"from\":\"alice\""));
        assert!(json.contains("\"text\":\"hi\""));
        assert!(json.contains("\"timestamp\":1700000000000"));
    }

    #[test]
    fn test_deserialize_roundtrip() {
        let json = r#"{"from":"bob","text":"hello","timestamp":42}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.from, "bob");
        assert_eq!(msg.text, "hello");
        assert_eq!(msg.timestamp, 42);
    }
}
