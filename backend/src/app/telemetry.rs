//! Tracing subscriber installation.

use tracing_subscriber::{EnvFilter, fmt};

/// Failure to install the global subscriber.
#[derive(Debug, thiserror::Error)]
#[error("tracing subscriber already installed: {message}")]
pub struct TelemetryError {
    message: String,
}

/// Install a JSON formatter filtered by `RUST_LOG`.
///
/// # Errors
///
/// Returns [`TelemetryError`] when a global subscriber is already set, for
/// example on a second call.
pub fn init_tracing() -> Result<(), TelemetryError> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
        .map_err(|err| TelemetryError {
            message: err.to_string(),
        })
}
