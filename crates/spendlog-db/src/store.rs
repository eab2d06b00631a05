//! Credential store trait

use async_trait::async_trait;

use crate::error::DbError;
use crate::models::{NewUser, User};

/// Persistence for user credential records
///
/// Implementations must enforce email uniqueness themselves and report a
/// violation as [`DbError::Duplicate`], so that concurrent registrations for
/// the same email leave exactly one record behind.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user, assigning its identity
    async fn save(&self, user: NewUser) -> Result<User, DbError>;

    /// Look up a user by email; absence is `Ok(None)`
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError>;
}
