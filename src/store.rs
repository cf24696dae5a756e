//! Key-value store collaborator contract
//!
//! The store is the single source of truth and the only shared state in the
//! system. The trait mirrors the atomic primitives the service relies on
//! (SETNX, GET, DEL, RPUSH, LRANGE); everything above it is stateless.
//!
//! `MemoryStore` is the in-process implementation used by the binary and by
//! tests. A networked backend (e.g. Redis) slots in behind the same trait.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::types::SessionCode;

/// Store-level failure
///
/// Transient infrastructure errors only; absence of a key is not an error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached or answered abnormally
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Atomic key-value/list operations required from the backend
///
/// Single-key atomicity is the consistency contract: `set_if_absent` resolves
/// racing creators, `push_back` serializes concurrent appends. Timeout and
/// retry policy belong to the implementation, not to callers.
#[async_trait]
pub trait Store: Send + Sync {
    /// Atomically set `key` to `value` if the key is absent.
    /// Returns true if this call claimed the key.
    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, StoreError>;

    /// Read a plain value, `None` if absent
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Remove a key (plain or list). Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Append a value to the tail of the list at `key`, creating it if absent
    async fn push_back(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Read the full list at `key` in append order; empty if absent
    async fn read_list(&self, key: &str) -> Result<Vec<String>, StoreError>;
}

/// Key holding a session's creator identity
///
/// The key layout is a wire contract: anything inspecting the store directly
/// (ops tooling, a future Redis backend) depends on these exact names.
pub fn creator_key(code: &SessionCode) -> String {
    format!("session:{}:creator", code)
}

/// Key holding a session's ordered message list
pub fn messages_key(code: &SessionCode) -> String {
    format!("session:{}:messages", code)
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    values: HashMap<String, String>,
    lists: HashMap<String, Vec<String>>,
}

/// In-process store implementation
///
/// A single `RwLock` over both keyspaces gives the same single-key atomicity
/// guarantees a real backend would: `set_if_absent` and `push_back` take the
/// write lock for their whole check-and-mutate step.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.values.contains_key(key) {
            Ok(false)
        } else {
            inner.values.insert(key.to_string(), value.to_string());
            Ok(true)
        }
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.values.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.values.remove(key);
        inner.lists.remove(key);
        Ok(())
    }

    async fn push_back(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner
            .lists
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
        Ok(())
    }

    async fn read_list(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.lists.get(key).cloned().unwrap_or_default())
    }
}
