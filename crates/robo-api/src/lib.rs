//! # Robo API
//!
//! HTTP handlers, request DTOs, auth extractor, error mapping and router.

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
