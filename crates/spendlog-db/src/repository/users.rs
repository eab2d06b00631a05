//! User operations

use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use tracing::debug;

use crate::error::DbError;
use crate::models::{NewUser, User};
use crate::repository::Database;
use crate::store::UserStore;

impl Database {
    // ==================== User Operations ====================

    /// Insert a new user
    ///
    /// Uniqueness is left to the `UNIQUE` constraint on `email` instead of a
    /// lookup-then-insert, so two racing inserts cannot both succeed.
    pub async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (email, password_hash, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from_insert(e, || format!("User '{}' already exists", user.email)))?;

        let id: i64 = result.get("id");
        debug!("Inserted user {} with id {}", user.email, id);

        Ok(User {
            id,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Count stored users
    pub async fn count_users(&self) -> Result<i64, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(result.get("count"))
    }
}

#[async_trait]
impl UserStore for Database {
    async fn save(&self, user: NewUser) -> Result<User, DbError> {
        self.insert_user(user).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        self.get_user_by_email(email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            role: UserRole::User,
        }
    }

    #[tokio::test]
    async fn test_save_assigns_id_and_finds_by_email() {
        let db = Database::in_memory().await.unwrap();

        let saved = db.save(new_user("a@x.com")).await.unwrap();
        assert!(saved.id > 0);

        let found = db.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, saved.id);
        assert_eq!(found.email, "a@x.com");
        assert_eq!(found.role, UserRole::User);
        assert_eq!(found.password_hash, saved.password_hash);
    }

    #[tokio::test]
    async fn test_find_missing_email_is_none() {
        let db = Database::in_memory().await.unwrap();
        assert!(db.find_by_email("nobody@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let db = Database::in_memory().await.unwrap();

        db.save(new_user("a@x.com")).await.unwrap();
        let err = db.save(new_user("a@x.com")).await.unwrap_err();

        assert!(matches!(err, DbError::Duplicate(_)));
        assert_eq!(db.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_ids_are_distinct() {
        let db = Database::in_memory().await.unwrap();

        let first = db.save(new_user("a@x.com")).await.unwrap();
        let second = db.save(new_user("b@x.com")).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(db.count_users().await.unwrap(), 2);
    }
}
