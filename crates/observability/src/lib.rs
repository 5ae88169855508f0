//! Tracing and logging setup shared by applications embedding the engine.

pub mod config;

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use config::{LogFormat, ObservabilityConfig};

/// Initialize process-wide tracing from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
