//! Error types for the Playbooks protocol layer.

mod app;
mod collection;
mod service;
mod store;

pub use app::*;
pub use collection::*;
pub use service::*;
pub use store::*;
