//! Spendlog Credential Store
//!
//! This crate provides persistence for user credential records,
//! using SQLite via sqlx.

pub mod error;
pub mod models;
pub mod repository;
pub mod store;
pub mod utils;

pub use error::DbError;
pub use models::*;
pub use repository::Database;
pub use store::UserStore;

