//! Domain collaborators the kernel wires together but does not implement.
//!
//! Store bodies, run business rules, telemetry transport and command parsing
//! live behind these traits.

mod service;
mod store;
mod telemetry;

pub use service::*;
pub use store::*;
pub use telemetry::*;
