//! API routes

mod auth;
mod health;
pub mod types;

use axum::Router;

use crate::state::AppState;

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .merge(health::routes())
        // Registration, login, and token-protected lookup
        .merge(auth::routes(&state))
        .with_state(state)
}
