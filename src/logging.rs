use crate::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Parses `RUST_LOG`-style directives such as `info` or
/// `fitlens_functions=debug,tower_http=info`.
pub fn env_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives)
        .map_err(|e| Error::config(format!("Invalid log filter '{}': {}", directives, e)))
}

/// Installs the global JSON subscriber.
pub fn init(filter: EnvFilter) {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .init();
}
