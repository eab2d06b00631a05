//! User registration and lookup

use serde::Deserialize;
use spendlog_db::{DbError, NewUser, User, UserRole, UserStore};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::AuthError;
use crate::password::hash_password;

/// Caller-supplied registration data
///
/// There is no role field: every registered account gets the default role.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
}

/// Registration and lookup over a credential store
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Register a new user
    ///
    /// The returned record carries the password hash; callers must strip it
    /// before handing the record to a client.
    pub async fn register(&self, registration: Registration) -> Result<User, AuthError> {
        debug!("Registering user: {}", registration.email);

        let password_hash = hash_password(&registration.password)?;

        let user = self
            .store
            .save(NewUser {
                email: registration.email,
                password_hash,
                role: UserRole::default(),
            })
            .await
            .map_err(|e| match e {
                DbError::Duplicate(msg) => AuthError::DuplicateEmail(msg),
                other => AuthError::Database(other),
            })?;

        info!("Registered user: {}", user.email);
        Ok(user)
    }

    /// Look up a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        Ok(self.store.find_by_email(email).await?)
    }
}
