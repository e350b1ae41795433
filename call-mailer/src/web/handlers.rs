//! Webhook endpoint handlers.
//!
//! The webhook handler only hands the raw body to a detached task and
//! answers 200. Parsing, rendering and delivery all happen after the
//! response has been written.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tracing::info;

use crate::processor::CallProcessor;
use crate::Config;

/// Body returned to the platform for every webhook delivery.
pub const WEBHOOK_ACK: &str = "Webhook received";

/// Body of `GET /`.
pub const ROOT_MESSAGE: &str = "Call report server is running.";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub processor: Arc<CallProcessor>,
}

impl AppState {
    pub fn new(config: Config, processor: CallProcessor) -> Self {
        Self {
            config: Arc::new(config),
            processor: Arc::new(processor),
        }
    }
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Structured health check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Plain-text liveness message.
pub async fn root() -> &'static str {
    ROOT_MESSAGE
}

/// Call event webhook.
///
/// The body is taken as raw bytes so that malformed JSON is still
/// acknowledged; the background task reports it instead.
pub async fn webhook(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    info!(
        body_length = body.len(),
        recipient = %state.config.recipient,
        "webhook_received"
    );

    state.processor.spawn(body);

    (StatusCode::OK, WEBHOOK_ACK)
}
