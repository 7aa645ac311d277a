//! Data types exchanged between the host, the kernel and its collaborators.

mod collection;
mod host;
mod playbook;

pub use collection::*;
pub use host::*;
pub use playbook::*;
