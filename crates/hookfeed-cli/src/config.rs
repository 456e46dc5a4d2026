use std::path::Path;

use serde::Deserialize;

use hookfeed_poller::PollerConfig;

use crate::cli::Cli;

/// Client configuration, loaded from `hookfeed.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub poller: PollerConfig,
}

impl AppConfig {
    /// Load config from `path` if it exists, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!(path = %path.display(), "Loaded configuration");
                    cfg
                },
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Failed to parse config: {e}, using defaults");
                    AppConfig::default()
                },
            },
            Err(_) => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                AppConfig::default()
            },
        }
    }

    /// Apply command-line and environment overrides (clap resolves both).
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(endpoint) = &cli.endpoint
            && !endpoint.is_empty()
        {
            self.poller.endpoint = endpoint.clone();
        }
        if let Some(interval_ms) = cli.interval_ms {
            self.poller.poll_interval_ms = interval_ms;
        }
    }
}
