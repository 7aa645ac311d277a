//! # Playbooks
//!
//! The Playbooks product kernel as hosted by the chat server.
//!
//! The host hands [`PlaybooksProduct::initialize`] a map of its services.
//! The kernel binds them, builds the domain collaborators through a
//! [`ServiceFactory`], migrates the store under a cluster-wide lock and
//! registers its collection types, HTTP router and slash command.
//! [`PlaybooksProduct::start`] then registers the host callbacks and, when
//! the host enables metrics, the metrics server and gauge refresh.

pub mod commands;
pub mod error;
pub mod factory;
pub mod hooks;
pub mod logging;
pub mod product;
pub mod telemetry;

pub use error::ProductError;
pub use factory::{
    DomainServices, RunServiceDeps, ServiceContext, ServiceFactory, Stores, TelemetryIdentity,
};
pub use hooks::PlaybooksHooks;
pub use product::{PlaybooksProduct, METRICS_UPDATER_TASK};
pub use telemetry::NoopTelemetry;

pub use playbooks_config::KernelConfig;
pub use playbooks_core::{KernelState, ServiceKey, ServiceMap};
