use std::path::Path;

use serde::Deserialize;

use crate::event_store::DEFAULT_MAX_STORED_EVENTS;

/// Config file read from the working directory when present.
pub const CONFIG_FILE: &str = "hookfeed-server.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("listen_addr {0:?} is not a valid socket address")]
    InvalidListenAddr(String),
    #[error("max_stored_events must be > 0")]
    ZeroMaxStoredEvents,
}

/// Top-level server configuration, loaded from `hookfeed-server.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub max_stored_events: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".to_string(),
            max_stored_events: DEFAULT_MAX_STORED_EVENTS,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::InvalidListenAddr(self.listen_addr.clone()));
        }
        if self.max_stored_events == 0 {
            return Err(ConfigError::ZeroMaxStoredEvents);
        }
        Ok(())
    }

    /// Load config from `path` if it exists, then apply env var overrides.
    pub fn load(path: &Path) -> Self {
        let mut config = match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<ServerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!(path = %path.display(), "Loaded configuration");
                    cfg
                },
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Failed to parse config: {e}, using defaults");
                    ServerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!(path = %path.display(), "No config file found, using defaults");
                ServerConfig::default()
            },
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = var("HOOKFEED_LISTEN_ADDR")
            && !addr.is_empty()
        {
            self.listen_addr = addr;
        }
        if let Some(val) = var("HOOKFEED_MAX_STORED_EVENTS")
            && let Ok(n) = val.parse::<usize>()
        {
            self.max_stored_events = n;
        }
    }
}
