#[allow(dead_code)]
mod common;

use common::{TestServer, pull_request_payload, push_payload};

#[tokio::test]
async fn push_webhook_is_stored_and_served() {
    let server = TestServer::new().await;

    let resp = server
        .post_webhook("push", &push_payload("alice", "main", "2024-03-05T10:00:00Z"))
        .await;
    assert_eq!(resp.status(), 200);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "success");

    let events = server.notifications().await;
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["action"], "PUSH");
    assert_eq!(events[0]["author"], "alice");
    assert_eq!(events[0]["to_branch"], "main");
    assert!(events[0]["from_branch"].is_null());
    assert_eq!(events[0]["timestamp"], "2024-03-05T10:00:00+00:00");
    assert_eq!(events[0]["request_id"], "commit-alice");
}

#[tokio::test]
async fn merged_pull_request_is_served_as_merge() {
    let server = TestServer::new().await;

    let resp = server
        .post_webhook(
            "pull_request",
            &pull_request_payload("closed", "bob", true, "2024-03-05T12:00:00Z"),
        )
        .await;
    assert_eq!(resp.status(), 200);

    let events = server.notifications().await;
    assert_eq!(events[0]["action"], "MERGE");
    assert_eq!(events[0]["from_branch"], "feature");
    assert_eq!(events[0]["request_id"], "42");
}

#[tokio::test]
async fn notifications_only_return_new_events() {
    let server = TestServer::new().await;

    server
        .post_webhook("push", &push_payload("a", "main", "2024-03-05T09:00:00Z"))
        .await;
    server
        .post_webhook(
            "pull_request",
            &pull_request_payload("opened", "b", false, "2024-03-05T11:00:00Z"),
        )
        .await;

    let first = server.notifications().await;
    let authors: Vec<_> = first
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["author"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(authors, ["b", "a"]);

    assert_eq!(server.notifications().await, serde_json::json!([]));

    server
        .post_webhook("push", &push_payload("c", "dev", "2024-03-05T12:00:00Z"))
        .await;
    let third = server.notifications().await;
    assert_eq!(third.as_array().unwrap().len(), 1);
    assert_eq!(third[0]["author"], "c");
}

#[tokio::test]
async fn missing_push_data_is_rejected() {
    let server = TestServer::new().await;

    let payload = serde_json::json!({
        "ref": "refs/heads/main",
        "head_commit": {"id": "abc", "timestamp": "2024-03-05T10:00:00Z"}
    });
    let resp = server.post_webhook("push", &payload).await;
    assert_eq!(resp.status(), 400);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "Missing required push event data");

    assert_eq!(server.notifications().await, serde_json::json!([]));
}

#[tokio::test]
async fn unsupported_event_type_is_rejected() {
    let server = TestServer::new().await;

    let resp = server
        .post_webhook("issues", &serde_json::json!({"action": "opened"}))
        .await;
    assert_eq!(resp.status(), 400);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "Unsupported event type");
}

#[tokio::test]
async fn missing_event_header_is_rejected() {
    let server = TestServer::new().await;

    let resp = reqwest::Client::new()
        .post(format!("{}/webhook/receiver", server.base_url()))
        .header("content-type", "application/json")
        .body(serde_json::to_vec(&push_payload("a", "main", "2024-03-05T10:00:00Z")).unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "Invalid payload or event type");
}

#[tokio::test]
async fn non_json_body_is_rejected() {
    let server = TestServer::new().await;

    let resp = reqwest::Client::new()
        .post(format!("{}/webhook/receiver", server.base_url()))
        .header("x-github-event", "push")
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn store_is_bounded() {
    let server = TestServer::with_capacity(2).await;

    for (author, hour) in [("a", 9), ("b", 10), ("c", 11)] {
        server
            .post_webhook(
                "push",
                &push_payload(author, "main", &format!("2024-03-05T{hour:02}:00:00Z")),
            )
            .await;
    }

    let events = server.notifications().await;
    assert_eq!(events.as_array().unwrap().len(), 2);
    assert_eq!(events[0]["author"], "c");
    assert_eq!(events[1]["author"], "b");
}

#[tokio::test]
async fn health_reports_store_size() {
    let server = TestServer::new().await;
    server
        .post_webhook("push", &push_payload("a", "main", "2024-03-05T10:00:00Z"))
        .await;

    let json: serde_json::Value = reqwest::get(format!("{}/health", server.base_url()))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["stored_events"], 1);
    assert!(json["last_fetch"].is_null());
}

#[tokio::test]
async fn cors_headers_are_present() {
    let server = TestServer::new().await;

    let resp = reqwest::Client::new()
        .get(server.notifications_url())
        .header("origin", "http://localhost:3000")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.headers().contains_key("access-control-allow-origin"));
}
