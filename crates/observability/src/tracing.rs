//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, ObservabilityConfig};

/// Initialize tracing/logging for the process from the environment.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    init_with(&ObservabilityConfig::from_env());
}

/// Initialize tracing/logging with an explicit configuration.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_with(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = match config.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .with_target(config.with_target)
            .try_init()
            .is_ok(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .pretty()
            .with_target(config.with_target)
            .try_init()
            .is_ok(),
    };

    if installed {
        ::tracing::debug!(filter = %config.filter, format = ?config.format, "tracing initialised");
    }
    installed
}
