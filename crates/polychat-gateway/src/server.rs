//! Router, handlers, and error mapping for the HTTP surface.
//!
//! Routes:
//! - `GET  /` — service banner
//! - `GET  /api/providers` — supported provider catalog
//! - `GET  /api/models/{provider}` — per-provider model catalog
//! - `POST /api/chat` — normalized chat request → normalized reply
//! - `POST /api/auth/login`, `POST /api/auth/register` — mock auth

use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

use polychat_core::config::{Config, GatewayConfig};
use polychat_core::error::DispatchError;
use polychat_core::types::{ChatReply, ChatRequest};
use polychat_providers::registry::{lookup, Provider};
use polychat_providers::Dispatcher;

use crate::auth::{CredentialStore, MemoryCredentialStore, UserProfile};

// ─────────────────────────────────────────────
// State and wiring
// ─────────────────────────────────────────────

/// Shared request state: the dispatcher plus the credential store boundary.
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub users: Arc<dyn CredentialStore>,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, users: Arc<dyn CredentialStore>) -> Self {
        AppState { dispatcher, users }
    }
}

/// Build the router with CORS from the gateway config.
pub fn router(state: Arc<AppState>, config: &GatewayConfig) -> Router {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/api/providers", get(list_providers))
        .route("/api/models/{provider}", get(list_models))
        .route("/api/chat", post(chat))
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(
        Dispatcher::new(),
        Arc::new(MemoryCredentialStore::new()),
    ));
    let app = router(state, &config.gateway);

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("gateway listening on {addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

// ─────────────────────────────────────────────
// Error mapping
// ─────────────────────────────────────────────

/// Renders a [`DispatchError`] as `(status, {"detail": ...})`.
///
/// Upstream rejections pass their status and raw body through so the caller
/// can diagnose the provider failure; everything else gets the error's
/// display message.
pub struct ApiError(DispatchError);

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
        let detail = match self.0 {
            DispatchError::Upstream { body, .. } => body,
            other => other.to_string(),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

// ─────────────────────────────────────────────
// Catalog handlers
// ─────────────────────────────────────────────

async fn root() -> Json<serde_json::Value> {
    let ids: Vec<&str> = Provider::ALL.iter().map(|p| p.id()).collect();
    Json(json!({
        "message": "Polychat — provider-agnostic chat proxy",
        "version": env!("CARGO_PKG_VERSION"),
        "supported_providers": ids,
    }))
}

async fn list_providers() -> Json<serde_json::Value> {
    let providers: Vec<_> = Provider::ALL
        .iter()
        .map(|p| {
            let descriptor = p.descriptor();
            json!({"id": descriptor.id, "name": descriptor.display_name})
        })
        .collect();
    Json(json!({ "providers": providers }))
}

async fn list_models(
    Path(provider): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let descriptor = lookup(&provider).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": format!("Provider '{provider}' not found") })),
        )
    })?;

    Ok(Json(json!({
        "provider": descriptor.id,
        "models": descriptor.models,
    })))
}

// ─────────────────────────────────────────────
// Chat handler
// ─────────────────────────────────────────────

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    let reply = state
        .dispatcher
        .dispatch(&request.config, &request.history, &request.message)
        .await?;
    Ok(Json(reply))
}

// ─────────────────────────────────────────────
// Auth handlers
// ─────────────────────────────────────────────

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct RegisterRequest {
    email: String,
    password: String,
    username: String,
}

#[derive(Serialize)]
struct AuthResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<UserProfile>,
    message: String,
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Json<AuthResponse> {
    match state.users.verify(&request.email, &request.password).await {
        Some(user) => Json(AuthResponse {
            success: true,
            user: Some(user),
            message: "Login successful".to_string(),
        }),
        None => Json(AuthResponse {
            success: false,
            user: None,
            message: "Invalid email or password".to_string(),
        }),
    }
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Json<AuthResponse> {
    match state
        .users
        .register(&request.email, &request.password, &request.username)
        .await
    {
        Some(user) => Json(AuthResponse {
            success: true,
            user: Some(user),
            message: "Registration successful".to_string(),
        }),
        None => Json(AuthResponse {
            success: false,
            user: None,
            message: "Email already exists".to_string(),
        }),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
