//! User-facing error returned to the host from hook callbacks.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error surfaced to the host with an internal error id and an HTTP status.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{location}: {id}, {detailed}")]
pub struct AppError {
    /// Where the error happened, e.g. `Playbooks.ExecuteCommand`.
    pub location: String,
    /// Translation id of the error.
    pub id: String,
    /// Details for logs; never shown verbatim to end users.
    pub detailed: String,
    /// HTTP status code.
    pub status_code: u16,
}

impl AppError {
    pub fn new(
        location: impl Into<String>,
        id: impl Into<String>,
        detailed: impl Into<String>,
        status_code: u16,
    ) -> Self {
        Self {
            location: location.into(),
            id: id.into(),
            detailed: detailed.into(),
            status_code,
        }
    }

    /// Internal server error at `location`.
    pub fn internal(location: impl Into<String>, id: impl Into<String>, detailed: impl Into<String>) -> Self {
        Self::new(location, id, detailed, 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_error() {
        let err = AppError::internal("Playbooks.ExecuteCommand", "app.command.execute.error", "boom");
        assert_eq!(err.status_code, 500);
        assert_eq!(
            err.to_string(),
            "Playbooks.ExecuteCommand: app.command.execute.error, boom"
        );
    }
}
