//! Host service and collaborator errors.

use thiserror::Error;

/// Failure reported by a host-supplied capability.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Host service unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Custom(String),
}

/// Telemetry client failures.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Invalid telemetry credentials: {0}")]
    InvalidCredentials(String),

    #[error("Telemetry transport error: {0}")]
    Transport(String),
}

/// Command execution failures.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Command failed: {0}")]
    Failed(String),
}
