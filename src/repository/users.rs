//! Users repository for database operations

use chrono::Utc;
use sqlx::error::{DatabaseError, ErrorKind};
use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::user::User,
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Sqlite>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Insert a new user and return the stored record.
    ///
    /// Unique-constraint violations map to `Conflict` here: the service
    /// existence checks are only a fast path, and a concurrent duplicate
    /// insert must surface as a conflict rather than a database error.
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> AppResult<User> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO users (username, email, password, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        let id = result.last_insert_rowid();

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("user {} vanished after insert", id)))
    }

    /// Get user by ID
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Get user by username (primary authentication lookup)
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Get user by email
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }
}

fn map_unique_violation(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        if matches!(db_err.kind(), ErrorKind::UniqueViolation) {
            let message = db_err.message();
            if message.contains("users.username") {
                return AppError::Conflict("Username already exists".to_string());
            }
            if message.contains("users.email") {
                return AppError::Conflict("Email already exists".to_string());
            }
            return AppError::Conflict("User already exists".to_string());
        }
    }
    AppError::Database(err)
}
