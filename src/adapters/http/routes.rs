//! Router assembly for the relay endpoints.

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{health, update_vc, vc_list, RelayState};
use super::sse::events;

/// Creates the relay router with all endpoints and layers.
///
/// `cors_origins` empty means any origin may read the relay (the original
/// deployment fronts a public status page).
pub fn relay_routes(state: RelayState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/api/update-vc", post(update_vc))
        .route("/api/vc-list", get(vc_list))
        .route("/events", get(events))
        .route("/health", get(health))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        layer.allow_origin(parsed)
    }
}
