//! Credential login flow

use spendlog_db::UserStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::AuthError;
use crate::jwt::JwtManager;
use crate::password::verify_password;

/// Valid Argon2id hash of a random value, verified against when the email is
/// unknown so that both failure paths cost one Argon2 run
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$dGltaW5nX2F0dGFja19wcmV2ZW50aW9u$K8rI5T7VdQ8xkO0GqK5K2w";

/// Verifies email/password pairs and issues bearer tokens
#[derive(Clone)]
pub struct Authenticator {
    store: Arc<dyn UserStore>,
    jwt: Arc<JwtManager>,
}

impl Authenticator {
    pub fn new(store: Arc<dyn UserStore>, jwt: Arc<JwtManager>) -> Self {
        Self { store, jwt }
    }

    /// Log in with an email and password, returning a signed token
    ///
    /// Unknown email and wrong password both yield
    /// [`AuthError::InvalidCredentials`].
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        debug!("Login attempt for: {}", email);

        let user = self.store.find_by_email(email).await?;

        let user = match user {
            Some(user) if verify_password(password, &user.password_hash)? => user,
            Some(_) => {
                warn!("Failed login for: {}", email);
                return Err(AuthError::InvalidCredentials);
            }
            None => {
                // Outcome is irrelevant; only the time spent matters
                let _ = verify_password(password, DUMMY_HASH);
                warn!("Failed login for: {}", email);
                return Err(AuthError::InvalidCredentials);
            }
        };

        let token = self.jwt.issue(&user.email)?;

        info!("User {} logged in", user.email);
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::{DEFAULT_TOKEN_TTL_HOURS, TokenSecret};
    use crate::service::{Registration, UserService};
    use spendlog_db::Database;

    struct Fixture {
        users: UserService,
        auth: Authenticator,
        jwt: Arc<JwtManager>,
    }

    async fn fixture() -> Fixture {
        let db: Arc<dyn UserStore> = Arc::new(Database::in_memory().await.unwrap());
        let jwt = Arc::new(JwtManager::new(&TokenSecret::generate(), DEFAULT_TOKEN_TTL_HOURS));
        Fixture {
            users: UserService::new(db.clone()),
            auth: Authenticator::new(db, jwt.clone()),
            jwt,
        }
    }

    async fn register(f: &Fixture, email: &str, password: &str) {
        f.users
            .register(Registration {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_register_then_login_yields_token_for_email() {
        let f = fixture().await;
        register(&f, "a@x.com", "secret1").await;

        let token = f.auth.login("a@x.com", "secret1").await.unwrap();

        let claims = f.jwt.validate(&token).unwrap();
        assert_eq!(claims.sub, "a@x.com");
    }

    #[tokio::test]
    async fn test_wrong_password_is_invalid_credentials() {
        let f = fixture().await;
        register(&f, "a@x.com", "secret1").await;

        let err = f.auth.login("a@x.com", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_unknown_email_is_indistinguishable_from_wrong_password() {
        let f = fixture().await;
        register(&f, "a@x.com", "secret1").await;

        let unknown = f.auth.login("nobody@x.com", "secret1").await.unwrap_err();
        let wrong = f.auth.login("a@x.com", "wrong").await.unwrap_err();

        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert_eq!(unknown.status(), wrong.status());
    }

    #[tokio::test]
    async fn test_login_does_not_modify_user() {
        let f = fixture().await;
        register(&f, "a@x.com", "secret1").await;
        let before = f.users.find_by_email("a@x.com").await.unwrap().unwrap();

        f.auth.login("a@x.com", "secret1").await.unwrap();
        let _ = f.auth.login("a@x.com", "wrong").await;

        let after = f.users.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(before.password_hash, after.password_hash);
        assert_eq!(before.updated_at, after.updated_at);
    }

    #[test]
    fn test_dummy_hash_is_parseable() {
        assert!(!verify_password("anything", DUMMY_HASH).unwrap());
    }
}
