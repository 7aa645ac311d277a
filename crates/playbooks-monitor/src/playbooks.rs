//! Playbooks metric families.

use std::sync::Arc;

use crate::metrics::MetricsRegistry;

pub const PLAYBOOKS_ACTIVE_TOTAL: &str = "playbooks_playbooks_active_total";
pub const RUNS_ACTIVE_TOTAL: &str = "playbooks_runs_active_total";
pub const REMINDERS_OUTSTANDING_TOTAL: &str = "playbooks_reminders_outstanding_total";
pub const RETROS_OUTSTANDING_TOTAL: &str = "playbooks_retros_outstanding_total";
pub const FOLLOWERS_ACTIVE_TOTAL: &str = "playbooks_followers_active_total";
pub const PARTICIPANTS_ACTIVE_TOTAL: &str = "playbooks_participants_active_total";
pub const API_ERRORS_TOTAL: &str = "playbooks_api_errors_total";
pub const INSTANCE_INFO: &str = "playbooks_instance_info";

/// Labels identifying this instance in every scrape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceInfo {
    pub version: String,
    pub installation_id: String,
}

/// The product's metrics on top of a [`MetricsRegistry`].
pub struct PlaybooksMetrics {
    registry: Arc<MetricsRegistry>,
}

impl PlaybooksMetrics {
    pub async fn new(info: InstanceInfo) -> Self {
        let registry = Arc::new(MetricsRegistry::new());

        registry
            .register_labeled_gauge(
                INSTANCE_INFO,
                "Information about the Playbooks instance",
                vec![
                    ("version".to_string(), info.version),
                    ("installation_id".to_string(), info.installation_id),
                ],
            )
            .await;
        registry.set_gauge(INSTANCE_INFO, 1).await;

        for (name, help) in [
            (PLAYBOOKS_ACTIVE_TOTAL, "Total number of active playbooks"),
            (RUNS_ACTIVE_TOTAL, "Total number of active runs"),
            (REMINDERS_OUTSTANDING_TOTAL, "Total number of outstanding status update reminders"),
            (RETROS_OUTSTANDING_TOTAL, "Total number of outstanding retrospective reminders"),
            (FOLLOWERS_ACTIVE_TOTAL, "Total number of followers of active runs"),
            (PARTICIPANTS_ACTIVE_TOTAL, "Total number of participants in active runs"),
        ] {
            registry.register_gauge(name, help).await;
        }
        registry
            .register_counter(API_ERRORS_TOTAL, "Total number of API responses outside 2xx")
            .await;

        Self { registry }
    }

    pub fn registry(&self) -> &Arc<MetricsRegistry> {
        &self.registry
    }

    pub async fn observe(&self, gauge: &str, value: i64) {
        self.registry.set_gauge(gauge, value).await;
    }

    pub async fn increment_errors_count(&self, count: u64) {
        self.registry.add_counter(API_ERRORS_TOTAL, count).await;
    }

    pub async fn errors_count(&self) -> u64 {
        self.registry.get_counter(API_ERRORS_TOTAL).await.unwrap_or(0)
    }

    pub async fn gauge(&self, name: &str) -> Option<i64> {
        self.registry.get_gauge(name).await
    }

    pub async fn export(&self) -> String {
        self.registry.export().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_families_registered() {
        let metrics = PlaybooksMetrics::new(InstanceInfo {
            version: "abc123".to_string(),
            installation_id: "inst-1".to_string(),
        })
        .await;

        let output = metrics.export().await;
        for name in [
            PLAYBOOKS_ACTIVE_TOTAL,
            RUNS_ACTIVE_TOTAL,
            REMINDERS_OUTSTANDING_TOTAL,
            RETROS_OUTSTANDING_TOTAL,
            FOLLOWERS_ACTIVE_TOTAL,
            PARTICIPANTS_ACTIVE_TOTAL,
            API_ERRORS_TOTAL,
        ] {
            assert!(output.contains(&format!("# TYPE {name} ")), "{name} missing");
        }
        assert!(output.contains("playbooks_instance_info{version=\"abc123\",installation_id=\"inst-1\"} 1"));
    }

    #[tokio::test]
    async fn test_observe_and_count() {
        let metrics = PlaybooksMetrics::new(InstanceInfo::default()).await;
        metrics.observe(RUNS_ACTIVE_TOTAL, 7).await;
        metrics.increment_errors_count(1).await;

        assert_eq!(metrics.gauge(RUNS_ACTIVE_TOTAL).await, Some(7));
        assert_eq!(metrics.errors_count().await, 1);
    }
}
