//! Ephemeral Chat Session Service Library
//!
//! A small HTTP chat service where short-lived rooms are identified by
//! 4-character join codes and all shared state lives in an external
//! key-value store.
//!
//! # Features
//! - Collision-free session code allocation via atomic set-if-absent
//! - Bearer tokens bound to a specific session and identity
//! - Ordered, append-only message logs (clients poll for new messages)
//! - Creator-only session teardown
//!
//! # Architecture
//! The core components are stateless; the injected [`Store`] is the single
//! point of coordination, so multiple service instances can share one
//! backend:
//! - [`SessionRegistry`] owns session existence and creator identity
//! - [`MessageLog`] owns the ordered message list per session
//! - [`TokenService`] signs and verifies session-bound credentials
//! - The axum router in [`api`] wires them together per request
//!
//! # Example
//! ```ignore
//! use std::sync::Arc;
//! use tinychat::{api, AppState, MemoryStore, MessageLog, RandomCodeGenerator,
//!                SessionRegistry, TokenService};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store: Arc<dyn tinychat::Store> = Arc::new(MemoryStore::new());
//!     let state = AppState {
//!         registry: Arc::new(SessionRegistry::new(
//!             Arc::clone(&store),
//!             Arc::new(RandomCodeGenerator),
//!         )),
//!         log: Arc::new(MessageLog::new(Arc::clone(&store))),
//!         tokens: Arc::new(TokenService::new("secret")),
//!     };
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     axum::serve(listener, api::router(state)).await.unwrap();
//! }
//! ```

pub mod api;
pub mod codegen;
pub mod error;
pub mod log;
pub mod message;
pub mod registry;
pub mod store;
pub mod token;
pub mod types;

// Re-export main types for convenience
pub use api::AppState;
pub use codegen::{CodeGenerator, RandomCodeGenerator};
pub use error::{AppError, TokenError};
pub use log::MessageLog;
pub use message::Message;
pub use registry::SessionRegistry;
pub use store::{MemoryStore, Store, StoreError};
pub use token::TokenService;
pub use types::{SessionCode, CODE_ALPHABET, CODE_LENGTH};
