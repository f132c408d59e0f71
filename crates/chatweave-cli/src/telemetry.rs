//! Stderr logging for the CLI.
//!
//! Filter priority: `--log-level`, then `RUST_LOG`, then the config file's
//! `log_level`, then `warn`. Stdout stays reserved for command output.

use crate::types::LogLevel;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

pub fn filter_for(flag: Option<LogLevel>, configured: Option<LogLevel>) -> EnvFilter {
    if let Some(level) = flag {
        return EnvFilter::new(level.to_string());
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(
        configured
            .map(|level| level.to_string())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string()),
    )
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(flag: Option<LogLevel>, configured: Option<LogLevel>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(flag, configured))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
