//! Authentication and user registration service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{AuthUser, LoginUser, RegisterUser, User, UserClaims},
    repository::Repository,
};

pub const ERROR_INVALID_CREDENTIALS: &str = "Invalid username or password";
pub const ERROR_UNAUTHORIZED: &str = "Unauthorized - Invalid or missing authentication token";

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new user and issue a token for the created account.
    ///
    /// A username collision is reported before an email collision when both
    /// exist. The existence checks are a fast path; the database unique
    /// constraints remain the guard against concurrent duplicates.
    pub async fn register(&self, payload: RegisterUser) -> AppResult<(User, String)> {
        payload.validate()?;

        self.register_inner(payload)
            .await
            .map_err(|e| e.mask_internal(AppError::Validation("Registration failed".to_string())))
    }

    async fn register_inner(&self, payload: RegisterUser) -> AppResult<(User, String)> {
        let username = payload.username.trim();
        let email = payload.email.trim();

        if self
            .repository
            .users
            .find_by_username(username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        if self.repository.users.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let password_hash = self.hash_password(&payload.password)?;

        let user = self
            .repository
            .users
            .create(username, email, &password_hash)
            .await?;

        tracing::info!(user_id = user.id, "user registered");

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    /// Authenticate by username and password.
    ///
    /// Every failure past payload validation collapses into the same
    /// generic message so callers cannot probe which usernames exist.
    pub async fn login(&self, payload: LoginUser) -> AppResult<(User, String)> {
        payload.validate()?;

        self.login_inner(payload).await.map_err(|e| {
            e.mask_internal(AppError::Authentication(ERROR_INVALID_CREDENTIALS.to_string()))
        })
    }

    async fn login_inner(&self, payload: LoginUser) -> AppResult<(User, String)> {
        let user = self
            .repository
            .users
            .find_by_username(payload.username.trim())
            .await?
            .ok_or_else(|| AppError::Authentication(ERROR_INVALID_CREDENTIALS.to_string()))?;

        if !self.verify_password(&user.password, &payload.password)? {
            return Err(AppError::Authentication(
                ERROR_INVALID_CREDENTIALS.to_string(),
            ));
        }

        tracing::debug!(user_id = user.id, "login succeeded");

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    /// Verify a bearer token, failing closed.
    ///
    /// Returns `None` for a missing, malformed, expired or tampered token.
    /// On success the user is re-fetched by id so tokens for deleted
    /// accounts stop verifying; callers absorb the extra lookup.
    pub async fn verify_token(&self, token: Option<&str>) -> Option<AuthUser> {
        let token = token?;
        let claims = UserClaims::from_token(token, &self.config.jwt_secret).ok()?;

        match self.repository.users.find_by_id(claims.user_id).await {
            Ok(Some(user)) => Some(AuthUser {
                user_id: user.id,
                username: user.username,
            }),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("token verification lookup failed: {:?}", e);
                None
            }
        }
    }

    /// Validate the presented token and acknowledge the logout.
    ///
    /// Tokens are stateless: nothing is revoked server-side, the token
    /// stays valid until its natural expiry.
    pub async fn logout(&self, token: Option<&str>) -> AppResult<i64> {
        let user = self
            .verify_token(token)
            .await
            .ok_or_else(|| AppError::Authentication(ERROR_UNAUTHORIZED.to_string()))?;

        Ok(user.user_id)
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Verify a password against a stored argon2 hash
    fn verify_password(&self, stored_hash: &str, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(stored_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    fn issue_token(&self, user: &User) -> AppResult<String> {
        let claims = UserClaims::new(user.id, &user.username, self.config.jwt_expiration_hours);
        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }
}
