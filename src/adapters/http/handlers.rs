//! HTTP handlers for ingestion and one-shot reads.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::relay::{Relay, RelayError};

use super::dto::{AckResponse, ErrorResponse, HealthResponse, UpdateVcRequest};

/// Header the bot uses to present the shared secret.
pub const TRACKER_SECRET_HEADER: &str = "x-tracker-secret";

/// Shared state for all relay endpoints.
#[derive(Clone)]
pub struct RelayState {
    pub relay: Arc<Relay>,
}

impl RelayState {
    pub fn new(relay: Arc<Relay>) -> Self {
        Self { relay }
    }
}

/// POST /api/update-vc - Ingest one full-state update from the bot.
pub async fn update_vc(
    State(state): State<RelayState>,
    headers: HeaderMap,
    Json(req): Json<UpdateVcRequest>,
) -> Response {
    let credential = headers
        .get(TRACKER_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());

    match state.relay.submit_update(credential, req.into()).await {
        Ok(()) => (StatusCode::OK, Json(AckResponse::ok())).into_response(),
        Err(RelayError::Unauthorized) => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::unauthorized()),
        )
            .into_response(),
        // Contract: bare 400, empty body.
        Err(RelayError::MissingGuildId) => StatusCode::BAD_REQUEST.into_response(),
    }
}

/// GET /api/vc-list - Full store snapshot, keyed by guild id.
pub async fn vc_list(State(state): State<RelayState>) -> Response {
    let all = state.relay.read_all().await;
    (StatusCode::OK, Json(all)).into_response()
}

/// GET /health - Liveness probe with a couple of gauges.
pub async fn health(State(state): State<RelayState>) -> Response {
    let relay = &state.relay;
    let body = HealthResponse {
        status: "ok",
        subscribers: relay.subscriber_count().await,
        guilds: relay.read_all().await.len(),
    };
    (StatusCode::OK, Json(body)).into_response()
}
