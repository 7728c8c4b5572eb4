//! # Item REST API
//!
//! HTTP endpoints for creating, listing, reading, updating and deleting
//! items. Handlers resolve the caller from request headers and delegate to
//! an `ItemService`.

pub mod context;
pub mod errors;
pub mod server;

pub use context::{extract_context, UserContext, USER_ID_HEADER};
pub use errors::{ErrorResponse, RestError, RestResult};
pub use server::{serve, HealthResponse, ItemServer};
