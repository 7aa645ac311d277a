//! Product-level error type.

use thiserror::Error;

use playbooks_config::ConfigError;
use playbooks_core::{CapabilityError, LifecycleError, MigrationError, MutexError, SchedulerError};
use playbooks_protocols::error::{ServiceError, StoreError, TelemetryError};

/// Failure to initialize or start the product. The host should treat any of
/// these as fatal for this product.
#[derive(Debug, Error)]
pub enum ProductError {
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("failed to ensure bot: {0}")]
    Bot(#[source] ServiceError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to init telemetry client: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("failed to create the SQL store: {0}")]
    Store(#[from] StoreError),

    #[error("failed to create cluster mutex: {0}")]
    Mutex(#[from] MutexError),

    #[error(transparent)]
    Migration(#[from] MigrationError),

    #[error("failed to register commands: {0}")]
    Command(#[source] ServiceError),

    #[error("failed to register hooks: {0}")]
    Hooks(#[source] ServiceError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}
