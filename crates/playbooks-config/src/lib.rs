//! # Playbooks Config
//!
//! Configuration for the Playbooks product kernel.
//!
//! - [`KernelConfig`] - static kernel settings, loaded from TOML by [`ConfigLoader`]
//! - [`ConfigService`] - the product's runtime configuration, persisted through
//!   the host and observed through change listeners

mod error;
mod loader;
mod schema;
mod service;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use service::{ConfigService, Configuration};
