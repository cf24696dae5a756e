//! Session registry
//!
//! Owns session existence and creator identity. Code allocation leans on the
//! store's atomic set-if-absent instead of any in-process locking: racing
//! creators that pick the same code are resolved by the store, and the loser
//! simply retries with a fresh one. This keeps allocation correct across
//! multiple service instances sharing one store.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::codegen::CodeGenerator;
use crate::error::AppError;
use crate::store::{creator_key, Store};
use crate::types::{SessionCode, CODE_LENGTH};

/// Upper bound on allocation attempts before reporting exhaustion
///
/// With 36^4 possible codes, hitting this bound means the code space is
/// saturated — a capacity signal, not a routine failure.
const MAX_CREATE_ATTEMPTS: u32 = 1000;

/// Registry of live sessions
///
/// Exclusively owns the `session:{code}:creator` entry per code. Stateless
/// apart from the injected store and code generator.
pub struct SessionRegistry {
    store: Arc<dyn Store>,
    codegen: Arc<dyn CodeGenerator>,
}

impl SessionRegistry {
    /// Create a registry over the given store and code generator
    pub fn new(store: Arc<dyn Store>, codegen: Arc<dyn CodeGenerator>) -> Self {
        Self { store, codegen }
    }

    /// Allocate a fresh session owned by `creator`
    ///
    /// Generates random codes and claims the first unclaimed one atomically.
    /// Fails with `ResourceExhausted` if no free code is found within the
    /// attempt bound.
    pub async fn create_session(&self, creator: &str) -> Result<SessionCode, AppError> {
        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            let code = SessionCode(self.codegen.generate(CODE_LENGTH));
            let claimed = self
                .store
                .set_if_absent(&creator_key(&code), creator)
                .await?;
            if claimed {
                info!("Session {} created by '{}'", code, creator);
                return Ok(code);
            }
            debug!("Code {} already claimed (attempt {}), retrying", code, attempt);
        }

        warn!(
            "Session code space exhausted after {} attempts",
            MAX_CREATE_ATTEMPTS
        );
        Err(AppError::ResourceExhausted {
            attempts: MAX_CREATE_ATTEMPTS,
        })
    }

    /// Whether a session with this code currently exists
    pub async fn exists(&self, code: &SessionCode) -> Result<bool, AppError> {
        Ok(self.store.get(&creator_key(code)).await?.is_some())
    }

    /// Creator identity of a session, `None` if the session is absent
    pub async fn get_creator(&self, code: &SessionCode) -> Result<Option<String>, AppError> {
        Ok(self.store.get(&creator_key(code)).await?)
    }

    /// Remove the session's creator entry
    ///
    /// Idempotent: destroying an already-absent session succeeds, so a
    /// supervisory retry can heal a partial destroy. The message list is
    /// purged separately by the orchestrating layer (see `MessageLog::purge`).
    pub async fn destroy(&self, code: &SessionCode) -> Result<(), AppError> {
        self.store.delete(&creator_key(code)).await?;
        info!("Session {} destroyed", code);
        Ok(())
    }
}
