//! Kernel configuration schema.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable tagging exported metrics with the installation id.
pub const INSTALLATION_ID_ENV: &str = "MM_CLOUD_INSTALLATION_ID";

/// Installation id from the environment; empty when unset.
pub fn installation_id() -> String {
    std::env::var(INSTALLATION_ID_ENV).unwrap_or_default()
}

/// Root kernel configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KernelConfig {
    #[serde(default)]
    pub product: ProductConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,

    #[serde(default)]
    pub bot: BotConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,

    #[serde(default)]
    pub cluster: ClusterConfig,
}

impl KernelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.product.id.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "product.id".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.metrics.address.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "metrics.address".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.metrics.refresh_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "metrics.refresh_interval_secs".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.cluster.migration_mutex.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "cluster.migration_mutex".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Product identity as registered with the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConfig {
    #[serde(default = "default_product_id")]
    pub id: String,

    /// Build hash reported in metrics and telemetry.
    #[serde(default = "default_build_hash")]
    pub build_hash: String,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            id: default_product_id(),
            build_hash: default_build_hash(),
        }
    }
}

fn default_product_id() -> String {
    "playbooks".to_string()
}

fn default_build_hash() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Metrics exposition settings. Whether metrics run at all is a host setting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Listen address of the exposition endpoint.
    #[serde(default = "default_metrics_address")]
    pub address: String,

    /// Gauge refresh period in seconds.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

impl MetricsConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            address: default_metrics_address(),
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

fn default_metrics_address() -> String {
    ":9093".to_string()
}

fn default_refresh_interval() -> u64 {
    15 * 60
}

/// Identity of the product bot account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_bot_username")]
    pub username: String,

    #[serde(default = "default_bot_display_name")]
    pub display_name: String,

    #[serde(default = "default_bot_description")]
    pub description: String,

    #[serde(default = "default_bot_username")]
    pub owner_id: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            username: default_bot_username(),
            display_name: default_bot_display_name(),
            description: default_bot_description(),
            owner_id: default_bot_username(),
        }
    }
}

fn default_bot_username() -> String {
    "playbooks".to_string()
}

fn default_bot_display_name() -> String {
    "Playbooks".to_string()
}

fn default_bot_description() -> String {
    "Playbooks bot.".to_string()
}

/// Analytics transport credentials; both must be set to enable analytics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub dataplane_url: String,

    #[serde(default)]
    pub write_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryCredentials {
    pub dataplane_url: String,
    pub write_key: String,
}

impl TelemetryConfig {
    /// Credentials, or `None` when either value is missing.
    pub fn credentials(&self) -> Option<TelemetryCredentials> {
        if self.dataplane_url.is_empty() || self.write_key.is_empty() {
            return None;
        }
        Some(TelemetryCredentials {
            dataplane_url: self.dataplane_url.clone(),
            write_key: self.write_key.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Name of the cluster mutex guarding schema migrations.
    #[serde(default = "default_migration_mutex")]
    pub migration_mutex: String,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            migration_mutex: default_migration_mutex(),
        }
    }
}

fn default_migration_mutex() -> String {
    "IR_dbMutex".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = KernelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bot.username, "playbooks");
        assert_eq!(config.bot.owner_id, "playbooks");
        assert_eq!(config.cluster.migration_mutex, "IR_dbMutex");
    }

    #[test]
    fn test_credentials_require_both_values() {
        let mut telemetry = TelemetryConfig::default();
        assert!(telemetry.credentials().is_none());

        telemetry.dataplane_url = "https://dp.example.com".to_string();
        assert!(telemetry.credentials().is_none());

        telemetry.write_key = "k".to_string();
        let creds = telemetry.credentials().unwrap();
        assert_eq!(creds.write_key, "k");
    }

    #[test]
    fn test_validate_empty_product_id() {
        let mut config = KernelConfig::default();
        config.product.id.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "product.id"
        ));
    }
}
