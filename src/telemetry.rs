//! Analytics client used when no credentials are configured, and the
//! diagnostics toggle.

use tracing::error;

use playbooks_protocols::domain::TelemetryClient;
use playbooks_protocols::error::TelemetryError;
use playbooks_protocols::types::HostConfig;

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetry;

impl TelemetryClient for NoopTelemetry {
    fn track(&self, _event: &str, _properties: serde_json::Value) {}

    fn enable(&self) -> Result<(), TelemetryError> {
        Ok(())
    }

    fn disable(&self) -> Result<(), TelemetryError> {
        Ok(())
    }
}

/// Enable `client` iff the host has diagnostics turned on.
pub fn toggle_telemetry(client: &dyn TelemetryClient, host_config: &HostConfig) {
    if host_config.diagnostics_enabled() {
        if let Err(e) = client.enable() {
            error!(error = %e, "telemetry could not be enabled");
        }
        return;
    }

    if let Err(e) = client.disable() {
        error!(error = %e, "telemetry could not be disabled");
    }
}
