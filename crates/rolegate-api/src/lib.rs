//! # rolegate-api
//!
//! HTTP API layer for Rolegate built on Axum.
//!
//! Provides the auth and user endpoints, health checks, the `AuthUser`
//! extractor, request logging and CORS middleware, DTOs, and the mapping
//! from `AppError` to HTTP responses.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
