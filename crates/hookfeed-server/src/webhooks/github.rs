use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Json;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use hookfeed_core::events::Action;

use crate::error::AppError;
use crate::event_store::StoredEvent;
use crate::state::AppState;

/// Response from the webhook receiver.
#[derive(Debug, Serialize)]
pub struct ReceiverResponse {
    pub status: &'static str,
}

/// POST /webhook/receiver: normalize and store a GitHub webhook payload.
pub async fn receiver(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ReceiverResponse>, AppError> {
    let gh_event = headers
        .get("x-github-event")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty());
    let payload = serde_json::from_slice::<Value>(&body)
        .ok()
        .filter(|p| p.as_object().is_some_and(|o| !o.is_empty()));

    let (Some(gh_event), Some(payload)) = (gh_event, payload) else {
        return Err(AppError::BadRequest(
            "Invalid payload or event type".to_string(),
        ));
    };

    let event = transform_github_event(gh_event, &payload)?;
    tracing::info!(
        action = %event.action,
        author = %event.author,
        to_branch = %event.to_branch,
        "Event stored"
    );
    state.event_store.write().await.insert(event);

    Ok(Json(ReceiverResponse { status: "success" }))
}

/// Map a GitHub webhook to a stored event, or explain why it was refused.
pub fn transform_github_event(gh_event: &str, payload: &Value) -> Result<StoredEvent, AppError> {
    match gh_event {
        "push" => transform_push(payload),
        "pull_request" => transform_pull_request(payload),
        _ => Err(AppError::BadRequest("Unsupported event type".to_string())),
    }
}

fn transform_push(payload: &Value) -> Result<StoredEvent, AppError> {
    let author = non_empty(&payload["pusher"]["name"]);
    let to_branch = payload["ref"]
        .as_str()
        .and_then(|r| r.rsplit('/').next())
        .filter(|b| !b.is_empty());
    let timestamp = payload["head_commit"]["timestamp"]
        .as_str()
        .and_then(to_utc);

    let (Some(author), Some(to_branch), Some(timestamp)) = (author, to_branch, timestamp) else {
        return Err(AppError::BadRequest(
            "Missing required push event data".to_string(),
        ));
    };

    Ok(StoredEvent {
        request_id: non_empty(&payload["head_commit"]["id"]).map(String::from),
        author: author.to_string(),
        action: Action::Push,
        from_branch: None,
        to_branch: to_branch.to_string(),
        timestamp,
    })
}

fn transform_pull_request(payload: &Value) -> Result<StoredEvent, AppError> {
    let pr = &payload["pull_request"];
    let author = non_empty(&pr["user"]["login"]);
    let from_branch = non_empty(&pr["head"]["ref"]);
    let to_branch = non_empty(&pr["base"]["ref"]);

    let merged = payload["action"].as_str() == Some("closed") && pr["merged"].as_bool() == Some(true);
    let (action, timestamp) = if merged {
        (Action::Merge, pr["merged_at"].as_str().and_then(to_utc))
    } else {
        (Action::PullRequest, pr["created_at"].as_str().and_then(to_utc))
    };

    let (Some(author), Some(from_branch), Some(to_branch), Some(timestamp)) =
        (author, from_branch, to_branch, timestamp)
    else {
        return Err(AppError::BadRequest(
            "Missing required PR event data".to_string(),
        ));
    };

    let request_id = match &pr["id"] {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    };

    Ok(StoredEvent {
        request_id,
        author: author.to_string(),
        action,
        from_branch: Some(from_branch.to_string()),
        to_branch: to_branch.to_string(),
        timestamp,
    })
}

/// Parse a GitHub ISO-8601 timestamp into UTC. Naive timestamps are taken
/// as UTC.
pub fn to_utc(timestamp: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(dt.with_timezone(&Utc));
    }
    match NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => Some(naive.and_utc()),
        Err(e) => {
            tracing::warn!(timestamp, error = %e, "Unparseable webhook timestamp");
            None
        },
    }
}

fn non_empty(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}
