use std::net::SocketAddr;
use std::time::Duration;

use hookfeed_server::build_app;
use hookfeed_server::config::ServerConfig;

pub struct TestServer {
    pub addr: SocketAddr,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn new() -> Self {
        Self::from_config(ServerConfig::default()).await
    }

    pub async fn with_capacity(max_stored_events: usize) -> Self {
        Self::from_config(ServerConfig {
            max_stored_events,
            ..ServerConfig::default()
        })
        .await
    }

    async fn from_config(config: ServerConfig) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (app, _state) = build_app(config);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            _shutdown: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn notifications_url(&self) -> String {
        format!("{}/webhook/notifications", self.base_url())
    }

    /// POST a webhook payload with the given `X-GitHub-Event` header.
    pub async fn post_webhook(&self, gh_event: &str, payload: &serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/webhook/receiver", self.base_url()))
            .header("x-github-event", gh_event)
            .header("content-type", "application/json")
            .body(serde_json::to_vec(payload).unwrap())
            .send()
            .await
            .unwrap()
    }

    pub async fn notifications(&self) -> serde_json::Value {
        reqwest::get(self.notifications_url())
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }
}

pub fn push_payload(author: &str, branch: &str, timestamp: &str) -> serde_json::Value {
    serde_json::json!({
        "ref": format!("refs/heads/{branch}"),
        "pusher": {"name": author},
        "head_commit": {"id": format!("commit-{author}"), "timestamp": timestamp},
        "repository": {"full_name": "test/repo"}
    })
}

pub fn pull_request_payload(
    action: &str,
    author: &str,
    merged: bool,
    timestamp: &str,
) -> serde_json::Value {
    let merged_at = if merged {
        serde_json::json!(timestamp)
    } else {
        serde_json::Value::Null
    };
    serde_json::json!({
        "action": action,
        "pull_request": {
            "id": 42,
            "user": {"login": author},
            "head": {"ref": "feature"},
            "base": {"ref": "main"},
            "created_at": timestamp,
            "merged_at": merged_at,
            "merged": merged
        },
        "repository": {"full_name": "test/repo"}
    })
}
