//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence over the configured filter.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, ServerConfig};

/// Failure to install the global subscriber.
#[derive(Debug, thiserror::Error)]
#[error("Failed to initialize tracing: {0}")]
pub struct TelemetryError(String);

/// Build the log filter: `RUST_LOG` if set and valid, else `fallback`.
pub fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Install the global tracing subscriber for the process.
///
/// # Errors
///
/// Returns `TelemetryError` if a global subscriber is already set.
pub fn init(config: &ServerConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(&config.log_level);

    let result = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(filter)
            .try_init(),
    };

    result.map_err(|e| TelemetryError(e.to_string()))
}
