//! # Playbooks Core
//!
//! Kernel building blocks for the Playbooks product.
//!
//! ## Components
//!
//! - [`Capabilities`] - Host services bound through [`CapabilitiesBuilder`]
//! - [`Lifecycle`] - Forward-only kernel state machine
//! - [`ClusterMutex`] - Cluster-wide lock over the host key-value store
//! - [`MigrationGate`] - Store migrations under the cluster mutex
//! - [`RecurringTasks`] - Named periodic background tasks
//! - [`CollectionBridge`] - Runs exposed as host collections and topics

pub mod capability;
pub mod cluster;
pub mod collection;
pub mod lifecycle;
pub mod migration;
pub mod registry;
pub mod scheduler;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use capability::{CapabilityError, ServiceKey, ServiceMap, Unsatisfied, UnsatisfiedReason};
pub use cluster::{ClusterMutex, ClusterMutexGuard, MutexError};
pub use collection::{CollectionBridge, descriptors, register_descriptors};
pub use lifecycle::{KernelState, Lifecycle, LifecycleError};
pub use migration::{MigrationError, MigrationGate};
pub use registry::{Capabilities, CapabilitiesBuilder};
pub use scheduler::{RecurringTask, RecurringTasks, SchedulerError};
