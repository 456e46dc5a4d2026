/// Why a single fetch of the notification endpoint failed.
///
/// Every variant surfaces to users as the same fixed message; the kind is
/// only used for logging.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to notification endpoint failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("notification endpoint returned {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("malformed notification payload: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("poll request task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl FetchError {
    /// Short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::HttpStatus(_) => "http_status",
            Self::Parse(_) => "parse",
            Self::Task(_) => "task",
        }
    }
}

/// Invalid poller configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid endpoint URL {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("poll_interval_ms must be > 0")]
    ZeroPollInterval,
    #[error("request_timeout_ms must be > 0 when set")]
    ZeroRequestTimeout,
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
