//! Host model types.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub team_id: String,
    pub name: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
}

/// A bot account owned by a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bot {
    pub user_id: String,
    pub username: String,
    pub display_name: String,
    pub description: String,
    pub owner_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub channel_id: String,
    pub user_id: String,
    pub root_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMember {
    pub channel_id: String,
    pub user_id: String,
}

/// Request context attached to hook callbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginContext {
    pub session_id: String,
    pub request_id: String,
    pub ip_address: String,
}

/// Arguments of a slash command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandArgs {
    pub user_id: String,
    pub channel_id: String,
    pub team_id: String,
    pub root_id: String,
    pub command: String,
    pub trigger_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub text: String,
}

/// Autocomplete entry for a registered command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompleteItem {
    pub trigger: String,
    pub hint: String,
    pub help_text: String,
    #[serde(default)]
    pub sub_commands: Vec<AutocompleteItem>,
}

/// Slash command registered with the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDefinition {
    pub trigger: String,
    pub display_name: String,
    pub description: String,
    pub auto_complete: bool,
    pub auto_complete_desc: String,
    pub auto_complete_hint: String,
    pub autocomplete_data: Option<AutocompleteItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSettings {
    pub enable: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    pub enable_diagnostics: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSettings {
    pub site_url: Option<String>,
    pub enable_testing: Option<bool>,
}

/// Snapshot of the host configuration as seen by the product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub metrics_settings: MetricsSettings,
    #[serde(default)]
    pub log_settings: LogSettings,
    #[serde(default)]
    pub service_settings: ServiceSettings,
    /// Per-product persisted configuration, keyed by product id.
    #[serde(default)]
    pub plugin_settings: HashMap<String, serde_json::Value>,
}

impl HostConfig {
    pub fn metrics_enabled(&self) -> bool {
        self.metrics_settings.enable.unwrap_or(false)
    }

    pub fn diagnostics_enabled(&self) -> bool {
        self.log_settings.enable_diagnostics.unwrap_or(false)
    }

    pub fn testing_enabled(&self) -> bool {
        self.service_settings.enable_testing.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub id: String,
    pub sku_short_name: String,
    pub is_trial: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudLimits {
    pub max_active_runs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    pub user_id: String,
    pub category: String,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub id: String,
    pub name: String,
    pub path: String,
    pub size: u64,
}

/// Options for a key-value write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KvSetOptions {
    /// Only write when the current value equals `old_value` (`None` = key absent).
    pub atomic: bool,
    pub old_value: Option<Vec<u8>>,
    /// Expire the key after this long.
    pub expire_in: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_config_flags_default_off() {
        let config = HostConfig::default();
        assert!(!config.metrics_enabled());
        assert!(!config.diagnostics_enabled());
        assert!(!config.testing_enabled());
    }

    #[test]
    fn test_host_config_deserialize_partial() {
        let config: HostConfig =
            serde_json::from_str(r#"{"metrics_settings":{"enable":true}}"#).unwrap();
        assert!(config.metrics_enabled());
        assert!(config.plugin_settings.is_empty());
    }
}
