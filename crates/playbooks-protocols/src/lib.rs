//! # Playbooks Protocols
//!
//! Trait and model definitions shared by the Playbooks product kernel.
//!
//! ## Modules
//!
//! - [`capability`] - Host-supplied services the kernel binds at construction
//! - [`domain`] - Domain collaborators (stores, run service, permissions, telemetry)
//! - [`hooks`] - Callbacks the host drives once the product is started
//! - [`types`] - Plain data exchanged across those seams
//! - [`error`] - Error taxonomy for every seam

pub mod capability;
pub mod domain;
pub mod error;
pub mod hooks;
pub mod types;

pub use hooks::ProductHooks;
