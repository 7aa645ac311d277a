//! Named recurring tasks.
//!
//! Each task runs its function on a fixed period in its own tokio task until
//! cancelled. At most one live task exists per name.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("recurring task {0} is already scheduled")]
    AlreadyScheduled(String),

    #[error("recurring task {0} needs a non-zero period")]
    ZeroPeriod(String),
}

/// Registry of live recurring tasks.
#[derive(Clone, Default)]
pub struct RecurringTasks {
    live: Arc<DashMap<String, CancellationToken>>,
}

impl RecurringTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` every `period`, first after one full period.
    pub fn schedule<F, Fut>(
        &self,
        name: impl Into<String>,
        period: Duration,
        task: F,
    ) -> Result<RecurringTask, SchedulerError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let name = name.into();
        if period.is_zero() {
            return Err(SchedulerError::ZeroPeriod(name));
        }

        let cancel = CancellationToken::new();
        match self.live.entry(name.clone()) {
            Entry::Occupied(_) => return Err(SchedulerError::AlreadyScheduled(name)),
            Entry::Vacant(slot) => {
                slot.insert(cancel.clone());
            }
        }

        let live = self.live.clone();
        let token = cancel.clone();
        let task_name = name.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        debug!(task = %task_name, "running recurring task");
                        task().await;
                    }
                }
            }
            live.remove_if(&task_name, |_, t| t.is_cancelled());
            debug!(task = %task_name, "recurring task exited");
        });

        info!(task = %name, period_secs = period.as_secs(), "recurring task scheduled");
        Ok(RecurringTask {
            name,
            cancel,
            live: self.live.clone(),
        })
    }

    pub fn is_scheduled(&self, name: &str) -> bool {
        self.live.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

/// Handle to a live recurring task.
pub struct RecurringTask {
    name: String,
    cancel: CancellationToken,
    live: Arc<DashMap<String, CancellationToken>>,
}

impl RecurringTask {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stop the task. An in-flight run finishes; no new run starts.
    pub fn cancel(&self) {
        self.cancel.cancel();
        self.live.remove_if(&self.name, |_, t| t.is_cancelled());
        debug!(task = %self.name, "recurring task cancelled");
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
