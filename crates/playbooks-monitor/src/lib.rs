//! # Playbooks Monitor
//!
//! Metrics for the Playbooks product.
//!
//! ## Features
//!
//! - Prometheus format metrics registry and `GET /metrics` exposition server
//! - Periodic gauge refresh from the run and playbook stores
//! - API error counting middleware

pub mod error;
pub mod metrics;
pub mod middleware;
pub mod playbooks;
pub mod server;
pub mod updater;

pub use error::MonitorError;
pub use metrics::{MetricsEndpoint, MetricsRegistry};
pub use middleware::with_error_counter;
pub use playbooks::{InstanceInfo, PlaybooksMetrics};
pub use server::{router, MetricsServer};
pub use updater::{store_sources, GaugeSource, MetricsUpdater};
