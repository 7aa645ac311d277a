//! Product analytics.

use crate::error::TelemetryError;

pub trait TelemetryClient: Send + Sync {
    fn track(&self, event: &str, properties: serde_json::Value);
    fn enable(&self) -> Result<(), TelemetryError>;
    fn disable(&self) -> Result<(), TelemetryError>;
}
