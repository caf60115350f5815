//! # socialhub-api
//!
//! HTTP and WebSocket API layer for SocialHub. Defines the Axum router,
//! request/response DTOs, JWT authentication, and all handlers.

pub mod auth;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
