//! Authentication service
//!
//! Registration, credential checks, and the access/refresh token lifecycle.
//! Each user holds exactly one refresh token; logging in or exchanging the
//! token replaces it, so any earlier token stops working.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::models::{AuthTokensResponse, UpdateUserRequest, User};
use crate::store::{Store, StoreError, UserChanges};

use super::jwt::{generate_access_token, JwtError};
use super::password::{hash_password, verify_password};
use super::refresh::{generate_refresh_token, hash_refresh_token};

/// Auth service errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("A user with this email and password was not found")]
    InvalidCredentials,

    #[error("User does not exist")]
    InvalidRefreshToken,

    #[error("A user with this email already exists")]
    EmailTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    TokenError(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        AuthError::TokenError(e.to_string())
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    jwt_secret: String,
    access_token_ttl_seconds: i64,
    bcrypt_cost: u32,
    /// Hash checked when the email is unknown, so both login failures cost one bcrypt verify
    dummy_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn Store>,
        jwt_secret: String,
        access_token_ttl_seconds: i64,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            store,
            jwt_secret,
            access_token_ttl_seconds,
            bcrypt_cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Create an account and issue its first token pair
    pub async fn register(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthTokensResponse, AuthError> {
        let email = normalize_email(email);
        let password_hash = self.hash(password).await?;

        let user = self
            .store
            .create_user(&email, &password_hash)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Store(other),
            })?;

        tracing::info!(user_id = %user.id, "User registered");

        let refresh_token = self.rotate_refresh_token(&user).await?;
        self.token_response(&user, refresh_token)
    }

    /// Check credentials and issue a fresh token pair.
    ///
    /// Every failure reports the same generic error.
    pub async fn login(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<AuthTokensResponse, AuthError> {
        let (Some(email), Some(password)) = (email, password) else {
            return Err(AuthError::InvalidCredentials);
        };
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let Some(user) = self
            .store
            .find_user_by_email(&normalize_email(email))
            .await?
        else {
            let unknown_hash = self.unknown_account_hash().await?;
            self.verify(password, unknown_hash).await?;
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify(password, &user.password_hash).await? {
            tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let refresh_token = self.rotate_refresh_token(&user).await?;
        tracing::info!(user_id = %user.id, "User logged in");

        self.token_response(&user, refresh_token)
    }

    /// Exchange a refresh token for a new pair, superseding the submitted one
    pub async fn refresh_tokens(
        &self,
        refresh_token: &str,
    ) -> Result<AuthTokensResponse, AuthError> {
        let current_hash = hash_refresh_token(refresh_token);

        let user = self
            .store
            .find_user_by_refresh_hash(&current_hash)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        let new_refresh_token = generate_refresh_token();
        let swapped = self
            .store
            .swap_refresh_hash(
                user.id,
                &current_hash,
                &hash_refresh_token(&new_refresh_token),
            )
            .await?;

        // Another exchange or a login replaced the token since the lookup
        if !swapped {
            tracing::warn!(user_id = %user.id, "Refresh token superseded during exchange");
            return Err(AuthError::InvalidRefreshToken);
        }

        tracing::info!(user_id = %user.id, "Refresh token rotated");
        self.token_response(&user, new_refresh_token)
    }

    /// Generate a new refresh token and store it on the user, overwriting
    /// whatever was there
    pub async fn rotate_refresh_token(&self, user: &User) -> Result<String, AuthError> {
        let refresh_token = generate_refresh_token();
        self.store
            .set_refresh_hash(user.id, &hash_refresh_token(&refresh_token))
            .await?;
        Ok(refresh_token)
    }

    /// Issue a signed access token for a user
    pub fn issue_access_token(&self, user: &User) -> Result<String, AuthError> {
        Ok(generate_access_token(
            user,
            &self.jwt_secret,
            self.access_token_ttl_seconds,
        )?)
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, user_id: Uuid) -> Result<User, AuthError> {
        self.store
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Apply a partial update to the account
    pub async fn update_user(
        &self,
        user_id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<User, AuthError> {
        let password_hash = match request.password {
            Some(password) => Some(self.hash(&password).await?),
            None => None,
        };
        let password_changed = password_hash.is_some();
        let changes = UserChanges {
            email: request.email.as_deref().map(normalize_email),
            password_hash,
        };

        let user = self
            .store
            .update_user(user_id, changes)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Store(other),
            })?
            .ok_or(AuthError::UserNotFound)?;

        // A new password revokes the outstanding refresh token
        if password_changed {
            self.store.clear_refresh_hash(user.id).await?;
            tracing::info!(user_id = %user.id, "Refresh token revoked after password change");
        }

        tracing::info!(user_id = %user.id, "User updated");
        Ok(user)
    }

    /// Delete the account along with its profile and requisites
    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), AuthError> {
        if !self.store.delete_user(user_id).await? {
            return Err(AuthError::UserNotFound);
        }
        tracing::info!(user_id = %user_id, "User deleted");
        Ok(())
    }

    /// Get JWT secret (for middleware access)
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    fn token_response(
        &self,
        user: &User,
        refresh_token: String,
    ) -> Result<AuthTokensResponse, AuthError> {
        Ok(AuthTokensResponse {
            email: user.email.clone(),
            access_token: self.issue_access_token(user)?,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_ttl_seconds,
        })
    }

    async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let password = password.to_string();
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?
            .map_err(|e| AuthError::PasswordHash(e.to_string()))
    }

    async fn unknown_account_hash(&self) -> Result<&str, AuthError> {
        self.dummy_hash
            .get_or_try_init(|| self.hash("rmauth-unknown-account"))
            .await
            .map(String::as_str)
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::PasswordHash(e.to_string()))
    }
}

/// Emails are compared case-insensitively
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemoryStore::new()), "test-secret".to_string(), 900, 4)
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  User@Example.COM "), "user@example.com");
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let auth = service();
        let registered = auth.register("user@example.com", "password123").await.unwrap();
        assert_eq!(registered.email, "user@example.com");

        let tokens = auth
            .login(Some("USER@example.com"), Some("password123"))
            .await
            .unwrap();
        assert!(!tokens.access_token.is_empty());
        assert!(!tokens.refresh_token.is_empty());
        assert_eq!(tokens.token_type, "Bearer");
    }

    #[tokio::test]
    async fn test_login_failures_are_generic() {
        let auth = service();
        auth.register("user@example.com", "password123").await.unwrap();

        let cases = [
            (Some("user@example.com"), Some("wrong-password")),
            (Some("nobody@example.com"), Some("password123")),
            (None, Some("password123")),
            (Some("user@example.com"), None),
            (Some(""), Some("")),
        ];
        for (email, password) in cases {
            let err = auth.login(email, password).await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredentials));
        }
    }

    #[tokio::test]
    async fn test_unknown_email_costs_a_password_check() {
        use std::time::{Duration, Instant};

        // A cost high enough that a skipped bcrypt check is unmistakable
        let auth = AuthService::new(
            Arc::new(MemoryStore::new()),
            "test-secret".to_string(),
            900,
            10,
        );
        auth.register("user@example.com", "password123").await.unwrap();

        async fn timed(auth: &AuthService, email: &str) -> Duration {
            let started = Instant::now();
            let result = auth.login(Some(email), Some("wrong-password")).await;
            assert!(matches!(result, Err(AuthError::InvalidCredentials)));
            started.elapsed()
        }

        // Warm up both paths
        timed(&auth, "nobody@example.com").await;
        timed(&auth, "user@example.com").await;

        let mut unknown = Duration::ZERO;
        let mut wrong = Duration::ZERO;
        for _ in 0..3 {
            unknown += timed(&auth, "nobody@example.com").await;
            wrong += timed(&auth, "user@example.com").await;
        }

        assert!(
            unknown * 4 >= wrong,
            "unknown email {:?} vs wrong password {:?}",
            unknown,
            wrong
        );
    }

    #[tokio::test]
    async fn test_duplicate_registration() {
        let auth = service();
        auth.register("user@example.com", "password123").await.unwrap();
        let err = auth
            .register("User@Example.com", "password456")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn test_password_change_revokes_refresh_token() {
        let auth = service();
        let tokens = auth.register("user@example.com", "password123").await.unwrap();
        let user_id = crate::auth::verify_token(&tokens.access_token, "test-secret")
            .unwrap()
            .user_id()
            .unwrap();

        // Changing only the email keeps the session alive
        auth.update_user(
            user_id,
            UpdateUserRequest {
                email: Some("renamed@example.com".to_string()),
                password: None,
            },
        )
        .await
        .unwrap();
        let tokens = auth.refresh_tokens(&tokens.refresh_token).await.unwrap();

        auth.update_user(
            user_id,
            UpdateUserRequest {
                email: None,
                password: Some("new-password-456".to_string()),
            },
        )
        .await
        .unwrap();

        let err = auth.refresh_tokens(&tokens.refresh_token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRefreshToken));
    }

    #[tokio::test]
    async fn test_unknown_refresh_token() {
        let auth = service();
        let err = auth.refresh_tokens("deadbeef").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRefreshToken));
    }
}
