use axum::extract::State;
use axum::response::Json;

use hookfeed_core::events::RawEvent;

use crate::state::AppState;

/// GET /webhook/notifications: events stored since the previous call,
/// newest first.
pub async fn get_notifications(State(state): State<AppState>) -> Json<Vec<RawEvent>> {
    let fresh = state.event_store.write().await.take_new();
    if !fresh.is_empty() {
        tracing::debug!(count = fresh.len(), "Serving new notifications");
    }
    Json(fresh.iter().map(|e| e.to_raw()).collect())
}
