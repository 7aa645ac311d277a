//! Cluster-wide mutex over the host key-value store.
//!
//! The lock is a KV entry written with compare-and-set and an expiry. The
//! holder refreshes the expiry while it holds the lock, so a crashed holder
//! releases it after at most one TTL.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use playbooks_protocols::capability::KvStoreService;
use playbooks_protocols::error::ServiceError;
use playbooks_protocols::types::KvSetOptions;

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod tests;

pub const MUTEX_KEY_PREFIX: &str = "mutex_";
pub const MUTEX_TTL: Duration = Duration::from_secs(15);
const MIN_BACKOFF: Duration = Duration::from_millis(1);
const MAX_BACKOFF: Duration = Duration::from_secs(1);

static NEXT_HOLDER: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Error)]
pub enum MutexError {
    #[error("cluster mutex name must not be empty")]
    EmptyName,

    #[error("cluster mutex {key}: {source}")]
    Store {
        key: String,
        #[source]
        source: ServiceError,
    },
}

/// Named, non-reentrant, cluster-scoped lock.
pub struct ClusterMutex {
    kv: Arc<dyn KvStoreService>,
    key: String,
}

impl ClusterMutex {
    pub fn new(kv: Arc<dyn KvStoreService>, name: &str) -> Result<Self, MutexError> {
        if name.is_empty() {
            return Err(MutexError::EmptyName);
        }
        Ok(Self {
            kv,
            key: format!("{MUTEX_KEY_PREFIX}{name}"),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Wait until this process holds the lock. Store errors are logged and
    /// retried with the same backoff as contention.
    pub async fn lock(&self) -> Result<ClusterMutexGuard, MutexError> {
        let holder = format!(
            "{}-{}",
            std::process::id(),
            NEXT_HOLDER.fetch_add(1, Ordering::Relaxed)
        )
        .into_bytes();

        let mut backoff = MIN_BACKOFF;
        loop {
            match self.try_acquire(&holder).await {
                Ok(true) => {
                    debug!(key = %self.key, "cluster mutex acquired");
                    return Ok(ClusterMutexGuard::new(self.kv.clone(), self.key.clone(), holder));
                }
                Ok(false) => {}
                Err(e) => warn!(key = %self.key, error = %e, "failed to acquire cluster mutex, retrying"),
            }
            tokio::time::sleep(backoff).await;
            backoff = (backoff * 2).min(MAX_BACKOFF);
        }
    }

    async fn try_acquire(&self, holder: &[u8]) -> Result<bool, MutexError> {
        let options = KvSetOptions {
            atomic: true,
            old_value: None,
            expire_in: Some(MUTEX_TTL),
        };
        self.kv
            .set_with_options(&self.key, Some(holder.to_vec()), options)
            .await
            .map_err(|source| MutexError::Store {
                key: self.key.clone(),
                source,
            })
    }
}

/// Proof of holding a [`ClusterMutex`].
///
/// Call [`unlock`](Self::unlock) to release. Dropping the guard stops the
/// refresh and leaves the entry to expire.
pub struct ClusterMutexGuard {
    kv: Arc<dyn KvStoreService>,
    key: String,
    holder: Vec<u8>,
    refresh: CancellationToken,
}

impl ClusterMutexGuard {
    fn new(kv: Arc<dyn KvStoreService>, key: String, holder: Vec<u8>) -> Self {
        let refresh = CancellationToken::new();
        tokio::spawn(refresh_loop(
            kv.clone(),
            key.clone(),
            holder.clone(),
            refresh.clone(),
        ));
        Self {
            kv,
            key,
            holder,
            refresh,
        }
    }

    pub async fn unlock(self) -> Result<(), MutexError> {
        self.refresh.cancel();
        let options = KvSetOptions {
            atomic: true,
            old_value: Some(self.holder.clone()),
            expire_in: None,
        };
        let released = self
            .kv
            .set_with_options(&self.key, None, options)
            .await
            .map_err(|source| MutexError::Store {
                key: self.key.clone(),
                source,
            })?;
        if !released {
            warn!(key = %self.key, "cluster mutex was lost before unlock");
        }
        debug!(key = %self.key, "cluster mutex released");
        Ok(())
    }
}

impl Drop for ClusterMutexGuard {
    fn drop(&mut self) {
        self.refresh.cancel();
    }
}

async fn refresh_loop(
    kv: Arc<dyn KvStoreService>,
    key: String,
    holder: Vec<u8>,
    cancel: CancellationToken,
) {
    let period = MUTEX_TTL / 2;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(period) => {}
        }

        let options = KvSetOptions {
            atomic: true,
            old_value: Some(holder.clone()),
            expire_in: Some(MUTEX_TTL),
        };
        match kv.set_with_options(&key, Some(holder.clone()), options).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(key = %key, "cluster mutex lost while held");
                return;
            }
            Err(e) => warn!(key = %key, error = %e, "failed to refresh cluster mutex"),
        }
    }
}
