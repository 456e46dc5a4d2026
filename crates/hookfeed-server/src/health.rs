use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Structured health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub stored_events: usize,
    pub max_stored_events: usize,
    pub last_fetch: Option<String>,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (stored_events, last_fetch) = {
        let store = state.event_store.read().await;
        (store.len(), store.last_fetch())
    };

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        stored_events,
        max_stored_events: state.config.max_stored_events,
        last_fetch: last_fetch.map(|t| t.to_rfc3339()),
    })
}
