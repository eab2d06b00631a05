//! Spendlog Authentication
//!
//! Password hashing, bearer token issuance and validation, user
//! registration, and the login flow that ties them together.

pub mod authenticator;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod service;

pub use authenticator::Authenticator;
pub use error::AuthError;
pub use jwt::{Claims, DEFAULT_TOKEN_TTL_HOURS, JwtManager, MAX_TOKEN_TTL_HOURS, TokenSecret};
pub use middleware::{AuthUser, require_auth};
pub use password::{hash_password, verify_password};
pub use service::{Registration, UserService};
