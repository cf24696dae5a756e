//! Ephemeral Chat Session Service - Entry Point
//!
//! Wires the store, registry, log, and token service together and serves the
//! HTTP API.

use std::env;
use std::sync::Arc;

use rand::distributions::Alphanumeric;
use rand::Rng;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tinychat::{
    api, AppState, MemoryStore, MessageLog, RandomCodeGenerator, SessionRegistry, Store,
    TokenService,
};

/// Default server address
const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Environment variable holding the token-signing secret
const SECRET_ENV: &str = "TINYCHAT_SECRET";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=tinychat=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tinychat=info")),
        )
        .init();

    // Get bind address from command line or use default
    let addr = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ADDR.to_string());

    // Token-signing secret: shared across instances via the environment.
    // A generated secret means tokens die with this process.
    let secret = env::var(SECRET_ENV).unwrap_or_else(|_| {
        warn!(
            "{} not set; generating a random secret, tokens will not survive restarts",
            SECRET_ENV
        );
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect()
    });

    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let state = AppState {
        registry: Arc::new(SessionRegistry::new(
            Arc::clone(&store),
            Arc::new(RandomCodeGenerator),
        )),
        log: Arc::new(MessageLog::new(Arc::clone(&store))),
        tokens: Arc::new(TokenService::new(&secret)),
    };

    let listener = TcpListener::bind(&addr).await?;
    info!("Chat session service listening on {}", addr);

    axum::serve(listener, api::router(state)).await?;
    Ok(())
}
