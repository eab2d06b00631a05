//! Spendlog REST API
//!
//! This crate provides the Axum-based HTTP surface for registration,
//! login, and token-protected account lookup.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
