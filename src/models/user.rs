//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Full user record from the database
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Public projection of a user for auth responses
#[derive(Debug, Clone, Serialize)]
pub struct UserPublic {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserPublic {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUser {
    #[validate(
        length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"),
        custom(function = "crate::validation::validate_username")
    )]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(
        length(max = 100, message = "Password must be at most 100 characters"),
        custom(function = "crate::validation::validate_password")
    )]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginUser {
    #[validate(custom(function = "crate::validation::validate_not_empty"))]
    pub username: String,
    #[validate(custom(function = "crate::validation::validate_not_empty"))]
    pub password: String,
}

/// Identity attached to a request after token verification
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
}

/// JWT claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i64,
    pub iat: i64,
    pub exp: i64,
}

impl UserClaims {
    /// Build a claims set expiring `expiration_hours` from now
    pub fn new(user_id: i64, username: &str, expiration_hours: u64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: username.to_string(),
            user_id,
            iat: now,
            exp: now + expiration_hours as i64 * 3600,
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse and verify a JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trip() {
        let claims = UserClaims::new(42, "alice", 24);
        let token = claims.create_token(SECRET).unwrap();
        let decoded = UserClaims::from_token(&token, SECRET).unwrap();
        assert_eq!(decoded.user_id, 42);
        assert_eq!(decoded.sub, "alice");
        assert_eq!(decoded.exp, decoded.iat + 24 * 3600);
    }

    #[test]
    fn tampered_secret_fails() {
        let token = UserClaims::new(1, "alice", 24).create_token(SECRET).unwrap();
        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn expired_token_fails() {
        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: "alice".to_string(),
            user_id: 1,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = claims.create_token(SECRET).unwrap();
        assert!(UserClaims::from_token(&token, SECRET).is_err());
    }

    #[test]
    fn garbage_token_fails() {
        assert!(UserClaims::from_token("not-a-token", SECRET).is_err());
    }
}
