use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::{CancellationToken, DropGuard};

use hookfeed_core::FeedState;
use hookfeed_core::format::format_records;

use crate::config::PollerConfig;
use crate::error::{ConfigError, FetchError};

/// Polls the notification endpoint and maintains the feed state.
///
/// State is published through a watch channel; every mutation goes through
/// `send_modify`, so subscribers never observe a half-applied tick.
pub struct NotificationPoller {
    config: PollerConfig,
    client: reqwest::Client,
    state: watch::Sender<FeedState>,
}

impl NotificationPoller {
    pub fn new(config: PollerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        let (state, _) = watch::channel(FeedState::default());
        Ok(Self {
            config,
            client,
            state,
        })
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Subscribe to feed state changes.
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }

    /// Clone of the current feed state.
    pub fn snapshot(&self) -> FeedState {
        self.state.borrow().clone()
    }

    /// GET the endpoint and decode the record list, without touching state.
    ///
    /// Only the body as a whole has to be a JSON array; its elements are
    /// decoded one by one when the batch is formatted.
    pub async fn fetch_batch(&self) -> Result<Vec<Value>, FetchError> {
        fetch(self.client.clone(), self.config.endpoint.clone()).await
    }

    /// Run one tick: fetch, format, merge, and update loading/error status.
    pub async fn fetch_events(&self) {
        self.tick(&CancellationToken::new()).await;
    }

    /// One tick that gives up waiting once `cancel` fires. The request runs
    /// on its own task and is left to finish; its result is discarded.
    /// Returns `false` when the tick was abandoned.
    async fn tick(&self, cancel: &CancellationToken) -> bool {
        self.state.send_modify(FeedState::begin_fetch);
        let request = tokio::spawn(fetch(self.client.clone(), self.config.endpoint.clone()));

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!("Discarding in-flight poll after shutdown");
                self.state.send_modify(FeedState::finish_fetch);
                false
            },
            joined = request => {
                self.apply(joined.unwrap_or_else(|e| Err(FetchError::Task(e))));
                true
            },
        }
    }

    fn apply(&self, outcome: Result<Vec<Value>, FetchError>) {
        match outcome {
            Ok(records) => {
                let fetched = records.len();
                let batch = format_records(records);
                for (index, reason) in &batch.rejected {
                    tracing::debug!(index, %reason, "Dropping notification record");
                }
                tracing::debug!(
                    fetched,
                    accepted = batch.accepted.len(),
                    "Merged notification batch"
                );
                self.state.send_modify(|state| {
                    state.apply_batch(batch.accepted);
                    state.finish_fetch();
                });
            },
            Err(e) => {
                tracing::warn!(
                    endpoint = %self.config.endpoint,
                    kind = e.kind(),
                    error = %e,
                    "Failed to fetch notifications"
                );
                self.state.send_modify(|state| {
                    state.record_failure();
                    state.finish_fetch();
                });
            },
        }
    }

    /// Start polling on a background task: one tick now, then one per interval.
    pub fn spawn(self) -> PollerHandle {
        let cancel = CancellationToken::new();
        let state = self.subscribe();
        let task = tokio::spawn(self.run(cancel.clone()));
        PollerHandle {
            _guard: cancel.clone().drop_guard(),
            cancel,
            task,
            state,
        }
    }

    /// Poll until `cancel` fires.
    ///
    /// Ticks never overlap: the next tick is only awaited once the current
    /// fetch has been applied, and ticks missed meanwhile are skipped. A
    /// fetch still in flight when `cancel` fires is not waited for and its
    /// result never reaches the feed.
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.config.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            endpoint = %self.config.endpoint,
            interval_ms = self.config.poll_interval_ms,
            "Notification poller started"
        );

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {},
            }
            if !self.tick(&cancel).await {
                break;
            }
        }

        tracing::info!("Notification poller stopped");
    }
}

async fn fetch(client: reqwest::Client, endpoint: String) -> Result<Vec<Value>, FetchError> {
    let resp = client.get(&endpoint).send().await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus(status));
    }

    let body = resp.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Handle to a running poller. Dropping it stops the schedule.
pub struct PollerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
    state: watch::Receiver<FeedState>,
    _guard: DropGuard,
}

impl PollerHandle {
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> FeedState {
        self.state.borrow().clone()
    }

    /// Stop scheduling new ticks. Does not wait for the task to exit.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Stop scheduling and wait for the poll task to finish.
    pub async fn join(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Notification poller task failed");
        }
    }
}
