//! HTTP API layer
//!
//! Thin orchestration over the registry, log, and token service: extract,
//! authorize, delegate, translate errors. All business rules live below;
//! the one rule owned here is re-checking session existence on sensitive
//! operations, since tokens outlive destroyed sessions.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::error::{AppError, TokenError};
use crate::log::MessageLog;
use crate::registry::SessionRegistry;
use crate::token::TokenService;
use crate::types::SessionCode;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    pub log: Arc<MessageLog>,
    pub tokens: Arc<TokenService>,
}

/// Response to session creation
#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session: String,
}

/// Connect request body
#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    pub username: String,
}

/// Response to a successful connect
#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub token: String,
}

/// Post-message request body
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

/// Build the API router over the given state
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{code}/connect", post(connect))
        .route(
            "/api/sessions/{code}/messages",
            post(post_message).get(get_messages),
        )
        .route("/api/sessions/{code}/destroy", delete(destroy))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// POST /api/sessions — create a session (header X-User identifies creator)
async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let Some(creator) = headers.get("x-user").and_then(|v| v.to_str().ok()) else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "missing X-User header" })),
        )
            .into_response());
    };

    let code = state.registry.create_session(creator).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session: code.to_string(),
        }),
    )
        .into_response())
}

/// POST /api/sessions/{code}/connect — issue a token bound to (code, username)
async fn connect(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<ConnectRequest>,
) -> Result<Json<ConnectResponse>, AppError> {
    let code = SessionCode::from_string(code);
    if !state.registry.exists(&code).await? {
        return Err(AppError::NotFound(code.to_string()));
    }

    let token = state.tokens.issue(&code, &req.username)?;
    Ok(Json(ConnectResponse { token }))
}

/// POST /api/sessions/{code}/messages — append a message as the token subject
async fn post_message(
    State(state): State<AppState>,
    Path(code): Path<String>,
    headers: HeaderMap,
    Json(req): Json<MessageRequest>,
) -> Result<StatusCode, AppError> {
    let code = SessionCode::from_string(code);
    let claims = state.tokens.parse_and_verify(bearer_token(&headers)?)?;

    if claims.session != code.as_str() {
        return Err(AppError::SessionMismatch {
            bound: claims.session,
            requested: code.to_string(),
        });
    }

    // Tokens stay cryptographically valid after destroy; existence is the
    // authority here.
    if !state.registry.exists(&code).await? {
        return Err(AppError::NotFound(code.to_string()));
    }

    // Sender identity comes from the token subject, never the request body.
    state.log.append(&code, &claims.sub, &req.text).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/sessions/{code}/messages — read the full log (unauthenticated)
async fn get_messages(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Vec<crate::message::Message>>, AppError> {
    let code = SessionCode::from_string(code);
    if !state.registry.exists(&code).await? {
        return Err(AppError::NotFound(code.to_string()));
    }

    let messages = state.log.read_all(&code).await?;
    Ok(Json(messages))
}

/// DELETE /api/sessions/{code}/destroy — creator-only teardown
async fn destroy(
    State(state): State<AppState>,
    Path(code): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let code = SessionCode::from_string(code);
    let claims = state.tokens.parse_and_verify(bearer_token(&headers)?)?;

    let Some(creator) = state.registry.get_creator(&code).await? else {
        return Err(AppError::NotFound(code.to_string()));
    };
    if creator != claims.sub {
        return Err(AppError::Forbidden);
    }

    // Two independent idempotent deletes; a crash in between leaves an
    // orphaned list that a retried destroy cleans up.
    state.registry.destroy(&code).await?;
    state.log.purge(&code).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Extract the token from an `Authorization: Bearer ...` header
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AppError::Token(TokenError::Malformed))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::ResourceExhausted { .. } | AppError::StoreUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Token(_) | AppError::SessionMismatch { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!("Request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
