//! Application state

use spendlog_auth::{Authenticator, JwtManager, UserService};
use spendlog_db::UserStore;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub authenticator: Authenticator,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    /// Wire the services over one credential store and token manager
    pub fn new(store: Arc<dyn UserStore>, jwt: Arc<JwtManager>) -> Self {
        Self {
            users: UserService::new(store.clone()),
            authenticator: Authenticator::new(store, jwt.clone()),
            jwt,
        }
    }
}
