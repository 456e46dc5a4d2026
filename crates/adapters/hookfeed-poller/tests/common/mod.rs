use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;

use hookfeed_core::events::RawEvent;
use hookfeed_poller::PollerConfig;

struct Scripted {
    status: StatusCode,
    body: String,
    delay: Duration,
}

#[derive(Clone, Default)]
struct MockState {
    hits: Arc<AtomicUsize>,
    responses: Arc<Mutex<VecDeque<Scripted>>>,
}

/// Scripted notification endpoint. Queued responses are served in order;
/// once the queue is empty every request gets `200 []`.
pub struct MockEndpoint {
    pub addr: SocketAddr,
    state: MockState,
    _server: tokio::task::JoinHandle<()>,
}

impl MockEndpoint {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let state = MockState::default();
        let app = Router::new()
            .route("/webhook/notifications", axum::routing::get(notifications))
            .with_state(state.clone());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            state,
            _server: handle,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}/webhook/notifications", self.addr)
    }

    /// Poller config aimed at this endpoint with the given interval.
    pub fn config(&self, poll_interval_ms: u64) -> PollerConfig {
        PollerConfig {
            poll_interval_ms,
            ..PollerConfig::with_endpoint(self.url())
        }
    }

    pub fn push_events(&self, events: &[RawEvent]) {
        let body = serde_json::to_string(events).unwrap();
        self.push_response(StatusCode::OK, &body);
    }

    pub fn push_response(&self, status: StatusCode, body: &str) {
        self.push_delayed_response(status, body, Duration::ZERO);
    }

    /// Queue a response that is only sent after `delay`.
    pub fn push_delayed_response(&self, status: StatusCode, body: &str, delay: Duration) {
        self.state.responses.lock().unwrap().push_back(Scripted {
            status,
            body: body.to_string(),
            delay,
        });
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// Wait until at least `n` requests have been served (5s timeout).
    pub async fn wait_for_hits(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.hits() < n {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("Timed out waiting for poll requests");
    }
}

async fn notifications(State(state): State<MockState>) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let scripted = state.responses.lock().unwrap().pop_front();
    let Scripted {
        status,
        body,
        delay,
    } = scripted.unwrap_or_else(|| Scripted {
        status: StatusCode::OK,
        body: "[]".to_string(),
        delay: Duration::ZERO,
    });
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

/// URL of a port nothing is listening on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/webhook/notifications")
}

/// URL of a listener that accepts connections but never answers.
///
/// The returned task owns the listener and every accepted socket.
pub async fn stalled_url() -> (String, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let task = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    (format!("http://{addr}/webhook/notifications"), task)
}
