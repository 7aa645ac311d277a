//! Prometheus-style metrics registry.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tokio::sync::RwLock;

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;

/// Metric type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    /// Counter (monotonically increasing).
    Counter,
    /// Gauge (can go up and down).
    Gauge,
}

/// A metric definition.
#[derive(Debug, Clone)]
pub struct MetricDef {
    pub name: String,
    pub metric_type: MetricType,
    pub help: String,
    /// Constant labels attached to every sample.
    pub labels: Vec<(String, String)>,
}

/// Metrics registry.
pub struct MetricsRegistry {
    definitions: RwLock<BTreeMap<String, MetricDef>>,
    counters: RwLock<BTreeMap<String, Arc<AtomicU64>>>,
    gauges: RwLock<BTreeMap<String, Arc<AtomicI64>>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self {
            definitions: RwLock::new(BTreeMap::new()),
            counters: RwLock::new(BTreeMap::new()),
            gauges: RwLock::new(BTreeMap::new()),
        }
    }

    async fn define(&self, name: &str, metric_type: MetricType, help: String, labels: Vec<(String, String)>) {
        let mut defs = self.definitions.write().await;
        defs.insert(
            name.to_string(),
            MetricDef {
                name: name.to_string(),
                metric_type,
                help,
                labels,
            },
        );
    }

    /// Register a counter.
    pub async fn register_counter(&self, name: impl Into<String>, help: impl Into<String>) {
        let name = name.into();
        self.define(&name, MetricType::Counter, help.into(), Vec::new()).await;
        let mut counters = self.counters.write().await;
        counters.insert(name, Arc::new(AtomicU64::new(0)));
    }

    /// Register a gauge.
    pub async fn register_gauge(&self, name: impl Into<String>, help: impl Into<String>) {
        self.register_labeled_gauge(name, help, Vec::new()).await;
    }

    /// Register a gauge whose samples carry constant labels.
    pub async fn register_labeled_gauge(
        &self,
        name: impl Into<String>,
        help: impl Into<String>,
        labels: Vec<(String, String)>,
    ) {
        let name = name.into();
        self.define(&name, MetricType::Gauge, help.into(), labels).await;
        let mut gauges = self.gauges.write().await;
        gauges.insert(name, Arc::new(AtomicI64::new(0)));
    }

    /// Add to a counter.
    pub async fn add_counter(&self, name: &str, value: u64) {
        let counters = self.counters.read().await;
        if let Some(counter) = counters.get(name) {
            counter.fetch_add(value, Ordering::SeqCst);
        }
    }

    pub async fn inc_counter(&self, name: &str) {
        self.add_counter(name, 1).await;
    }

    /// Set a gauge value.
    pub async fn set_gauge(&self, name: &str, value: i64) {
        let gauges = self.gauges.read().await;
        if let Some(gauge) = gauges.get(name) {
            gauge.store(value, Ordering::SeqCst);
        }
    }

    pub async fn get_counter(&self, name: &str) -> Option<u64> {
        let counters = self.counters.read().await;
        counters.get(name).map(|c| c.load(Ordering::SeqCst))
    }

    pub async fn get_gauge(&self, name: &str) -> Option<i64> {
        let gauges = self.gauges.read().await;
        gauges.get(name).map(|g| g.load(Ordering::SeqCst))
    }

    /// Export metrics in Prometheus text format, sorted by name.
    pub async fn export(&self) -> String {
        let defs = self.definitions.read().await;
        let counters = self.counters.read().await;
        let gauges = self.gauges.read().await;

        let mut output = String::new();

        for (name, def) in defs.iter() {
            let (type_str, value) = match def.metric_type {
                MetricType::Counter => (
                    "counter",
                    counters.get(name).map(|c| c.load(Ordering::SeqCst).to_string()),
                ),
                MetricType::Gauge => (
                    "gauge",
                    gauges.get(name).map(|g| g.load(Ordering::SeqCst).to_string()),
                ),
            };

            output.push_str(&format!("# HELP {} {}\n", name, def.help));
            output.push_str(&format!("# TYPE {} {}\n", name, type_str));

            if let Some(v) = value {
                output.push_str(&format!("{}{} {}\n", name, format_labels(&def.labels), v));
            }
        }

        output
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn format_labels(labels: &[(String, String)]) -> String {
    if labels.is_empty() {
        return String::new();
    }
    let pairs: Vec<String> = labels
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, v.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("{{{}}}", pairs.join(","))
}

/// Metrics endpoint handler.
#[derive(Clone)]
pub struct MetricsEndpoint {
    registry: Arc<MetricsRegistry>,
}

impl MetricsEndpoint {
    pub fn new(registry: Arc<MetricsRegistry>) -> Self {
        Self { registry }
    }

    /// Axum handler for metrics.
    pub async fn handler(&self) -> Response {
        let metrics = self.registry.export().await;
        (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            metrics,
        )
            .into_response()
    }
}
