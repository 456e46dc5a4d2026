pub mod config;
pub mod error;
pub mod poller;

pub use config::PollerConfig;
pub use error::{ConfigError, FetchError};
pub use poller::{NotificationPoller, PollerHandle};
