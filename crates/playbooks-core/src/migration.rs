//! One-time schema upgrade under the cluster mutex.

use std::time::Instant;

use thiserror::Error;
use tracing::{info, warn};

use playbooks_protocols::domain::SqlStore;
use playbooks_protocols::error::StoreError;

use crate::cluster::{ClusterMutex, MutexError};

#[cfg(test)]
#[path = "migration_tests.rs"]
mod tests;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("failed to acquire migration lock: {0}")]
    Lock(#[from] MutexError),

    #[error("failed to run migrations: {0}")]
    Store(#[source] StoreError),
}

/// Runs store migrations while holding the cluster mutex, so at most one
/// instance migrates at a time. Migrations themselves must be idempotent;
/// later instances find the schema current and do nothing.
pub struct MigrationGate {
    mutex: ClusterMutex,
}

impl MigrationGate {
    pub fn new(mutex: ClusterMutex) -> Self {
        Self { mutex }
    }

    pub async fn run(&self, store: &dyn SqlStore) -> Result<(), MigrationError> {
        let guard = self.mutex.lock().await?;
        let started = Instant::now();
        let result = store.run_migrations().await;

        if let Err(e) = guard.unlock().await {
            warn!(error = %e, "failed to release migration lock");
        }

        result.map_err(MigrationError::Store)?;
        info!(elapsed_ms = started.elapsed().as_millis() as u64, "store migrations complete");
        Ok(())
    }
}
