//! Product runtime configuration.
//!
//! The configuration lives in the host's per-product settings. Writes go
//! through the host first and only update the local copy once persisted.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use playbooks_protocols::capability::ConfigService as HostConfigService;
use playbooks_protocols::types::HostConfig;

use crate::error::ConfigError;

/// Settings owned by the product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub bot_user_id: String,

    #[serde(default)]
    pub admin_log_level: String,

    #[serde(default)]
    pub enable_experimental_features: bool,
}

type ChangeListener = Arc<dyn Fn() + Send + Sync>;

pub struct ConfigService {
    product_id: String,
    host: Arc<dyn HostConfigService>,
    configuration: RwLock<Configuration>,
    listeners: RwLock<Vec<ChangeListener>>,
}

impl ConfigService {
    /// Create the service, reading the current product settings from the host.
    pub fn new(product_id: impl Into<String>, host: Arc<dyn HostConfigService>) -> Result<Self, ConfigError> {
        let product_id = product_id.into();
        let configuration = Self::read(&product_id, &host.config())?;
        Ok(Self {
            product_id,
            host,
            configuration: RwLock::new(configuration),
            listeners: RwLock::new(Vec::new()),
        })
    }

    fn read(product_id: &str, host_config: &HostConfig) -> Result<Configuration, ConfigError> {
        match host_config.plugin_settings.get(product_id) {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => Ok(Configuration::default()),
        }
    }

    /// Snapshot of the product configuration.
    pub fn configuration(&self) -> Configuration {
        self.configuration.read().clone()
    }

    /// Snapshot of the host configuration.
    pub fn host_config(&self) -> HostConfig {
        self.host.config()
    }

    /// Apply `update`, persist it through the host, then publish it locally.
    pub fn update_configuration<F>(&self, update: F) -> Result<(), ConfigError>
    where
        F: FnOnce(&mut Configuration),
    {
        let mut next = self.configuration();
        update(&mut next);

        let value = serde_json::to_value(&next)?;
        self.host.save_plugin_config(&self.product_id, value)?;

        *self.configuration.write() = next;
        Ok(())
    }

    pub fn register_config_change_listener<F>(&self, listener: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners.write().push(Arc::new(listener));
    }

    /// Reload from the host and notify listeners.
    pub fn on_configuration_change(&self) -> Result<(), ConfigError> {
        let reloaded = Self::read(&self.product_id, &self.host.config())?;
        *self.configuration.write() = reloaded;

        let listeners: Vec<ChangeListener> = self.listeners.read().clone();
        debug!(listeners = listeners.len(), "configuration changed");
        for listener in listeners {
            listener();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
