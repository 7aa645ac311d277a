//! # Playbooks API
//!
//! The product's HTTP surface: one mountable [`axum::Router`] the kernel
//! registers with the host under the product name. Handlers are thin and
//! delegate to the domain collaborators held in [`ApiState`].

pub mod error;
pub mod http;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use http::{create_router, UserId, USER_ID_HEADER};
pub use state::ApiState;
