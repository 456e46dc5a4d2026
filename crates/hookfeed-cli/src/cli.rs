use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "hookfeed",
    version,
    about = "Poll a webhook notification endpoint and print the event feed"
)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "hookfeed.toml")]
    pub config: PathBuf,

    /// Notification endpoint URL (overrides the config file)
    #[arg(long, env = "HOOKFEED_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Poll interval in milliseconds (overrides the config file)
    #[arg(long, env = "HOOKFEED_POLL_INTERVAL_MS")]
    pub interval_ms: Option<u64>,

    /// Fetch once, print the feed, and exit
    #[arg(long)]
    pub once: bool,

    /// Print feed snapshots as JSON lines instead of text
    #[arg(long)]
    pub json: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}
