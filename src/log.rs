//! Message log
//!
//! A dumb append-only primitive over the store's list operations. It does not
//! check session existence — callers verify that before appending — and the
//! store's append order, not message timestamps, is the canonical sequence.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use crate::error::AppError;
use crate::message::Message;
use crate::store::{messages_key, Store};
use crate::types::SessionCode;

/// Append-only, ordered message storage per session
///
/// Exclusively owns the `session:{code}:messages` list entry.
pub struct MessageLog {
    store: Arc<dyn Store>,
}

impl MessageLog {
    /// Create a log over the given store
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Append a message with a server-assigned timestamp
    ///
    /// Concurrent appends from different callers are serialized by the
    /// store's list-append; no ordering logic lives here.
    pub async fn append(&self, code: &SessionCode, from: &str, text: &str) -> Result<(), AppError> {
        let msg = Message {
            from: from.to_string(),
            text: text.to_string(),
            timestamp: now_millis(),
        };
        let json = serde_json::to_string(&msg)?;
        self.store.push_back(&messages_key(code), &json).await?;
        debug!("Appended message from '{}' to session {}", from, code);
        Ok(())
    }

    /// Read the full message sequence in append order
    ///
    /// Best-effort: entries that fail to deserialize are skipped with a
    /// warning rather than failing the whole read. A fresh call always
    /// re-scans from the start; there is no cursor state.
    pub async fn read_all(&self, code: &SessionCode) -> Result<Vec<Message>, AppError> {
        let raw = self.store.read_list(&messages_key(code)).await?;
        let mut messages = Vec::with_capacity(raw.len());
        let mut skipped = 0usize;
        for entry in &raw {
            match serde_json::from_str::<Message>(entry) {
                Ok(msg) => messages.push(msg),
                Err(e) => {
                    skipped += 1;
                    warn!("Skipping malformed message record in session {}: {}", code, e);
                }
            }
        }
        if skipped > 0 {
            warn!(
                "Session {}: returned {} messages, skipped {} malformed records",
                code,
                messages.len(),
                skipped
            );
        }
        Ok(messages)
    }

    /// Delete the session's message list
    ///
    /// Idempotent; purging an absent list succeeds.
    pub async fn purge(&self, code: &SessionCode) -> Result<(), AppError> {
        self.store.delete(&messages_key(code)).await?;
        Ok(())
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn log_over(store: Arc<MemoryStore>) -> MessageLog {
        MessageLog::new(store)
    }

    #[tokio::test]
    async fn test_append_then_read_preserves_order_and_content() {
        let store = Arc::new(MemoryStore::new());
        let log = log_over(Arc::clone(&store));
        let code = SessionCode::from_string("ab12".to_string());

        log.append(&code, "alice", "first").await.unwrap();
        log.append(&code, "bob", "second").await.unwrap();
        log.append(&code, "alice", "third").await.unwrap();

        let msgs = log.read_all(&code).await.unwrap();
        assert_eq!(msgs.len(), 3);
        assert_eq!((msgs[0].from.as_str(), msgs[0].text.as_str()), ("alice", "first"));
        assert_eq!((msgs[1].from.as_str(), msgs[1].text.as_str()), ("bob", "second"));
        assert_eq!((msgs[2].from.as_str(), msgs[2].text.as_str()), ("alice", "third"));
    }

    #[tokio::test]
    async fn test_append_order_wins_over_timestamp_skew() {
        // Records written with deliberately out-of-order timestamps must come
        // back in list order regardless.
        let store = Arc::new(MemoryStore::new());
        let log = log_over(Arc::clone(&store));
        let code = SessionCode::from_string("ab12".to_string());
        let key = messages_key(&code);

        let skewed = [
            r#"{"from":"a","text":"one","timestamp":3000}"#,
            r#"{"from":"b","text":"two","timestamp":1000}"#,
            r#"{"from":"c","text":"three","timestamp":2000}"#,
        ];
        for record in skewed {
            store.push_back(&key, record).await.unwrap();
        }

        let msgs = log.read_all(&code).await.unwrap();
        let texts: Vec<&str> = msgs.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_malformed_records_are_skipped() {
        let store = Arc::new(MemoryStore::new());
        let log = log_over(Arc::clone(&store));
        let code = SessionCode::from_string("ab12".to_string());
        let key = messages_key(&code);

        store
            .push_back(&key, r#"{"from":"a","text":"ok1","timestamp":1}"#)
            .await
            .unwrap();
        store.push_back(&key, "{not json at all").await.unwrap();
        store
            .push_back(&key, r#"{"from":"b","text":"ok2","timestamp":2}"#)
            .await
            .unwrap();

        let msgs = log.read_all(&code).await.unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].text, "ok1");
        assert_eq!(msgs[1].text, "ok2");
    }

    #[tokio::test]
    async fn test_timestamps_are_server_assigned() {
        let store = Arc::new(MemoryStore::new());
        let log = log_over(Arc::clone(&store));
        let code = SessionCode::from_string("ab12".to_string());

        let before = now_millis();
        log.append(&code, "alice", "hi").await.unwrap();
        let after = now_millis();

        let msgs = log.read_all(&code).await.unwrap();
        assert!(msgs[0].timestamp >= before && msgs[0].timestamp <= after);
    }

    #[tokio::test]
    async fn test_purge_is_idempotent_and_empties_log() {
        let store = Arc::new(MemoryStore::new());
        let log = log_over(Arc::clone(&store));
        let code = SessionCode::from_string("ab12".to_string());

        log.append(&code, "alice", "hi").await.unwrap();
        log.purge(&code).await.unwrap();
        assert!(log.read_all(&code).await.unwrap().is_empty());

        log.purge(&code).await.unwrap();
    }
}
