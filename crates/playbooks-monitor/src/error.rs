//! Monitor errors.

use thiserror::Error;

/// Monitor error types.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Exposition address could not be parsed.
    #[error("Invalid metrics address: {0}")]
    InvalidAddress(String),

    /// Listener could not be bound.
    #[error("Failed to bind metrics server on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Server terminated with an error.
    #[error("Metrics server failed: {0}")]
    Serve(#[source] std::io::Error),

    /// Server did not stop in time.
    #[error("Metrics server did not shut down within {0:?}")]
    ShutdownTimeout(std::time::Duration),

    /// Server task panicked or was aborted.
    #[error("Metrics server task failed: {0}")]
    Join(String),
}
