use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Endpoint served by the companion notification service on its default port.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/webhook/notifications";

/// Default interval between ticks, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 15_000;

/// Configuration for the notification poller. Fixed once the poller is built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Notification endpoint URL (GET, JSON array response).
    pub endpoint: String,
    /// Interval between ticks in milliseconds.
    pub poll_interval_ms: u64,
    /// Per-request timeout. `None` leaves it to the transport.
    pub request_timeout_ms: Option<u64>,
    pub user_agent: String,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            request_timeout_ms: None,
            user_agent: concat!("hookfeed-poller/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl PollerConfig {
    /// Config pointing at `endpoint`, defaults elsewhere.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
                reason: format!("unsupported scheme {:?}", url.scheme()),
            });
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.request_timeout_ms == Some(0) {
            return Err(ConfigError::ZeroRequestTimeout);
        }
        Ok(())
    }
}
