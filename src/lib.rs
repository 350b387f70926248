//! Libris Book Catalog Server
//!
//! A Rust REST API server for managing a book catalog with user
//! registration, token-based authentication and book CRUD operations.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Embedded migrations, applied at startup and by integration tests.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
