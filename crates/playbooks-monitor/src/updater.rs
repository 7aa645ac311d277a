//! Periodic gauge refresh.
//!
//! A table of (gauge, pull) pairs. Each pull is independent: a failing pull
//! is logged and the remaining gauges are still refreshed.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, error};

use playbooks_protocols::domain::{PlaybookRunStore, PlaybookStore};
use playbooks_protocols::error::StoreError;

use crate::playbooks::{
    PlaybooksMetrics, FOLLOWERS_ACTIVE_TOTAL, PARTICIPANTS_ACTIVE_TOTAL, PLAYBOOKS_ACTIVE_TOTAL,
    REMINDERS_OUTSTANDING_TOTAL, RETROS_OUTSTANDING_TOTAL, RUNS_ACTIVE_TOTAL,
};

#[cfg(test)]
#[path = "updater_tests.rs"]
mod tests;

type Pull = Box<dyn Fn() -> BoxFuture<'static, Result<i64, StoreError>> + Send + Sync>;

/// One gauge and the store query that feeds it.
pub struct GaugeSource {
    pub gauge: &'static str,
    pull: Pull,
}

impl GaugeSource {
    pub fn new<F>(gauge: &'static str, pull: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, Result<i64, StoreError>> + Send + Sync + 'static,
    {
        Self {
            gauge,
            pull: Box::new(pull),
        }
    }
}

/// The six store-backed gauges.
pub fn store_sources(
    playbooks: Arc<dyn PlaybookStore>,
    runs: Arc<dyn PlaybookRunStore>,
) -> Vec<GaugeSource> {
    macro_rules! run_source {
        ($gauge:expr, $method:ident) => {{
            let runs = runs.clone();
            GaugeSource::new($gauge, move || {
                let runs = runs.clone();
                async move { runs.$method().await }.boxed()
            })
        }};
    }

    vec![
        GaugeSource::new(PLAYBOOKS_ACTIVE_TOTAL, move || {
            let playbooks = playbooks.clone();
            async move { playbooks.get_playbooks_active_total().await }.boxed()
        }),
        run_source!(RUNS_ACTIVE_TOTAL, get_runs_active_total),
        run_source!(REMINDERS_OUTSTANDING_TOTAL, get_overdue_update_runs_total),
        run_source!(RETROS_OUTSTANDING_TOTAL, get_overdue_retro_runs_total),
        run_source!(FOLLOWERS_ACTIVE_TOTAL, get_followers_active_total),
        run_source!(PARTICIPANTS_ACTIVE_TOTAL, get_participants_active_total),
    ]
}

pub struct MetricsUpdater {
    metrics: Arc<PlaybooksMetrics>,
    sources: Vec<GaugeSource>,
}

impl MetricsUpdater {
    pub fn new(metrics: Arc<PlaybooksMetrics>, sources: Vec<GaugeSource>) -> Self {
        Self { metrics, sources }
    }

    /// Pull every source once. Returns how many gauges were updated.
    pub async fn refresh(&self) -> usize {
        let mut updated = 0;
        for source in &self.sources {
            match (source.pull)().await {
                Ok(value) => {
                    self.metrics.observe(source.gauge, value).await;
                    updated += 1;
                }
                Err(e) => error!(metric = source.gauge, error = %e, "error updating metrics"),
            }
        }
        debug!(updated, total = self.sources.len(), "metrics refreshed");
        updated
    }
}
