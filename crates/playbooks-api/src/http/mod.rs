//! HTTP layer: routes, handlers and request extractors.

mod extract;
pub mod handlers;
mod routes;

pub use extract::{UserId, USER_ID_HEADER};
pub use routes::create_router;
